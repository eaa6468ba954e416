//! End-to-end invite flow tests against the mock ledger and shortener.
//!
//! Covers the full redemption FSM (resolve → balance → transfer), the
//! failure taxonomy, safe re-try behavior, and the create-invite →
//! redeem round trip.

#![cfg(feature = "mock-api")]

use std::sync::Arc;

use escrowlink::config::InviteConfig;
use escrowlink::core_types::{Address, RedemptionKey};
use escrowlink::invite::shortener::MockShortener;
use escrowlink::invite::{FailureReason, RedemptionOrchestrator, RedemptionOutcome, extract_key};
use escrowlink::ledger::{AccountHandle, MockLedger};
use escrowlink::token::TokenId;

const WEI: u128 = 1_000_000_000_000_000_000;

/// Key from the redemption flow's canonical test vector
const MOCK_KEY: &str = "0x1129eb2fbccdc663f4923a6495c35b096249812b589f7c4cd1dba01e1edaf724";

fn mock_key() -> RedemptionKey {
    MOCK_KEY.parse().unwrap()
}

fn destination() -> Address {
    "0x471ece3750da237f93b8e339c536989b8978a438".parse().unwrap()
}

fn setup() -> (Arc<MockLedger>, Arc<MockShortener>, RedemptionOrchestrator) {
    let ledger = Arc::new(MockLedger::new());
    let shortener = Arc::new(MockShortener::new());
    let orchestrator = RedemptionOrchestrator::new(
        ledger.clone(),
        shortener.clone(),
        InviteConfig {
            web_link: "https://valoraapp.com".into(),
            app_store_id: "1482389446".into(),
            bundle_id: "org.celo.mobile.alfajores".into(),
        },
    );
    (ledger, shortener, orchestrator)
}

#[tokio::test]
async fn redeem_with_funded_key_succeeds() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());

    // 10 cUSD on the key, 0.01 cUSD default mock fee
    ledger.fund(escrow, TokenId::StableDollar, 10 * WEI);

    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    match outcome {
        RedemptionOutcome::Succeeded {
            transferred,
            fee,
            receipt,
            destination: dest,
            ..
        } => {
            // transfer amount = 10 - 0.01 = 9.99 cUSD
            assert_eq!(fee, WEI / 100);
            assert_eq!(transferred, 9_990_000_000_000_000_000);
            assert!(receipt.status);
            assert_eq!(dest, destination());
        }
        other => panic!("expected success, got {:?}", other),
    }

    // Destination gained exactly balance - fee; escrow is drained
    assert_eq!(
        ledger.balance_of(destination(), TokenId::StableDollar),
        9_990_000_000_000_000_000
    );
    assert_eq!(ledger.balance_of(escrow, TokenId::StableDollar), 0);
}

#[tokio::test]
async fn empty_balance_key_fails_without_transfer() {
    let (ledger, _, orchestrator) = setup();

    // Key was never funded
    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    assert_eq!(outcome.failure_reason(), Some(FailureReason::EmptyBalance));
    assert_eq!(ledger.estimate_count(), 0);
    assert_eq!(ledger.transfer_count(), 0);
}

#[tokio::test]
async fn resolution_failure_short_circuits() {
    let (ledger, _, orchestrator) = setup();
    ledger.set_fail_unlock(true);

    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    assert_eq!(
        outcome.failure_reason(),
        Some(FailureReason::AccountCreationFailed)
    );
    // Neither balance query nor transfer happened
    assert_eq!(ledger.balance_count(), 0);
    assert_eq!(ledger.transfer_count(), 0);
}

#[tokio::test]
async fn balance_query_failure_reports_account_creation_failed() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());
    ledger.fund(escrow, TokenId::StableDollar, WEI);
    ledger.set_fail_balance(true);

    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    // Query failure is NOT EmptyBalance - the account never became usable
    assert_eq!(
        outcome.failure_reason(),
        Some(FailureReason::AccountCreationFailed)
    );
    assert_eq!(ledger.transfer_count(), 0);
}

#[tokio::test]
async fn already_redeemed_key_yields_empty_balance() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());
    ledger.fund(escrow, TokenId::StableDollar, 2 * WEI);

    let first = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;
    assert!(first.is_success());
    assert_eq!(ledger.transfer_count(), 1);

    // Same key again: balance is now zero, no duplicate transfer
    let second = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;
    assert_eq!(second.failure_reason(), Some(FailureReason::EmptyBalance));
    assert_eq!(ledger.transfer_count(), 1);
}

#[tokio::test]
async fn failed_transfer_leaves_key_redeemable() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());
    ledger.fund(escrow, TokenId::StableDollar, 5 * WEI);

    ledger.set_fail_transfer(true);
    let first = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;
    assert_eq!(first.failure_reason(), Some(FailureReason::TransferFailed));

    // Funds stayed on the escrow account
    assert_eq!(ledger.balance_of(escrow, TokenId::StableDollar), 5 * WEI);

    // A later attempt with the same key picks the balance back up
    ledger.set_fail_transfer(false);
    let second = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;
    assert!(second.is_success());
    assert_eq!(ledger.balance_of(escrow, TokenId::StableDollar), 0);
}

#[tokio::test]
async fn fee_estimation_failure_is_transfer_failed() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());
    ledger.fund(escrow, TokenId::StableDollar, WEI);
    ledger.set_fail_estimate(true);

    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    assert_eq!(
        outcome.failure_reason(),
        Some(FailureReason::TransferFailed)
    );
    assert_eq!(ledger.transfer_count(), 0);
}

#[tokio::test]
async fn fee_consuming_whole_balance_is_transfer_failed() {
    let (ledger, _, orchestrator) = setup();
    let escrow = MockLedger::derive_address(&mock_key());

    // 0.005 cUSD balance vs 0.01 cUSD fee
    ledger.fund(escrow, TokenId::StableDollar, WEI / 200);

    let outcome = orchestrator
        .redeem(&mock_key(), destination(), TokenId::StableDollar)
        .await;

    assert_eq!(
        outcome.failure_reason(),
        Some(FailureReason::TransferFailed)
    );
    // Never submitted - the check happens before the node sees it
    assert_eq!(ledger.transfer_count(), 0);
    assert_eq!(ledger.balance_of(escrow, TokenId::StableDollar), WEI / 200);
}

#[tokio::test]
async fn create_invite_then_redeem_full_cycle() {
    let (ledger, _, orchestrator) = setup();

    // Sender holds 20 cUSD; invites 5 cUSD
    let sender_addr: Address = "0xa76df5d1cae697479fa08afa7b0d35e182e0137a".parse().unwrap();
    let sender = AccountHandle::new(sender_addr);
    ledger.fund(sender_addr, TokenId::StableDollar, 20 * WEI);

    let invite = orchestrator
        .create_invite(&sender, 5 * WEI, TokenId::StableDollar)
        .await
        .unwrap();

    // Escrow account holds the invite amount, link decodes to the key
    assert_eq!(
        ledger.balance_of(invite.escrow_address, TokenId::StableDollar),
        5 * WEI
    );
    assert_eq!(extract_key(&invite.payload_url).unwrap(), invite.key);
    assert_eq!(invite.short_url, "https://vlra.page.link/PARAMS");

    // Recipient redeems the decoded key
    let key = extract_key(&invite.payload_url).unwrap();
    let outcome = orchestrator
        .redeem(&key, destination(), TokenId::StableDollar)
        .await;

    assert!(outcome.is_success());
    // 5 cUSD minus the 0.01 cUSD fee
    assert_eq!(
        ledger.balance_of(destination(), TokenId::StableDollar),
        5 * WEI - WEI / 100
    );
    assert_eq!(
        ledger.balance_of(invite.escrow_address, TokenId::StableDollar),
        0
    );
}

#[tokio::test]
async fn create_invite_with_shortener_down_is_encoding_error() {
    let (ledger, shortener, orchestrator) = setup();
    let sender_addr: Address = "0xa76df5d1cae697479fa08afa7b0d35e182e0137a".parse().unwrap();
    let sender = AccountHandle::new(sender_addr);
    ledger.fund(sender_addr, TokenId::StableDollar, 20 * WEI);
    shortener.set_fail(true);

    let result = orchestrator
        .create_invite(&sender, 5 * WEI, TokenId::StableDollar)
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.code(), "ENCODING_FAILED");
}

#[tokio::test]
async fn concurrent_redemptions_for_different_keys() {
    let (ledger, _, orchestrator) = setup();
    let orchestrator = Arc::new(orchestrator);

    // Two independently funded keys redeemed concurrently
    let key_a = mock_key();
    let key_b: RedemptionKey =
        "0x2239eb2fbccdc663f4923a6495c35b096249812b589f7c4cd1dba01e1edaf7ff"
            .parse()
            .unwrap();
    ledger.fund(
        MockLedger::derive_address(&key_a),
        TokenId::StableDollar,
        3 * WEI,
    );
    ledger.fund(
        MockLedger::derive_address(&key_b),
        TokenId::StableDollar,
        4 * WEI,
    );

    let task_a = {
        let orchestrator = orchestrator.clone();
        let key = key_a.clone();
        tokio::spawn(
            async move { orchestrator.redeem(&key, destination(), TokenId::StableDollar).await },
        )
    };
    let task_b = {
        let orchestrator = orchestrator.clone();
        let key = key_b.clone();
        tokio::spawn(
            async move { orchestrator.redeem(&key, destination(), TokenId::StableDollar).await },
        )
    };

    let outcome_a = task_a.await.unwrap();
    let outcome_b = task_b.await.unwrap();
    assert!(outcome_a.is_success());
    assert!(outcome_b.is_success());

    // Both net amounts landed: 3 + 4 - 2 * 0.01
    assert_eq!(
        ledger.balance_of(destination(), TokenId::StableDollar),
        7 * WEI - 2 * (WEI / 100)
    );
}
