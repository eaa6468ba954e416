//! Mock ledger for dev and tests
//!
//! In-process double for the wallet node: deterministic key-to-address
//! derivation, an in-memory balance book, configurable failure injection
//! and per-operation call counters for test assertions.
//!
//! Idempotency mirrors the real node contract: re-submitting a transfer
//! with a known request id returns the original receipt without moving
//! funds again.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::LedgerError;
use super::{AccountHandle, LedgerService, TransferReceipt};
use crate::core_types::{Address, Amount, RedemptionId, RedemptionKey, TxHash};
use crate::fee::FeeEstimate;
use crate::token::TokenId;

/// Default mock fee: 0.01 cUSD at 200k gas / 5 gwei
const DEFAULT_FEE: Amount = 10_000_000_000_000_000;
const DEFAULT_GAS: u64 = 200_000;
const DEFAULT_GAS_PRICE: Amount = 5_000_000_000;

pub struct MockLedger {
    balances: Mutex<HashMap<(Address, TokenId), Amount>>,
    /// Receipts by request id, for idempotent re-submission
    processed: Mutex<HashMap<RedemptionId, TransferReceipt>>,
    next_block: AtomicU64,

    fee: Mutex<FeeEstimate>,

    // Failure injection
    fail_unlock: Mutex<bool>,
    fail_balance: Mutex<bool>,
    fail_estimate: Mutex<bool>,
    fail_transfer: Mutex<bool>,

    // Call counters for test verification
    unlock_count: AtomicUsize,
    balance_count: AtomicUsize,
    estimate_count: AtomicUsize,
    transfer_count: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            processed: Mutex::new(HashMap::new()),
            next_block: AtomicU64::new(4_031_079),
            fee: Mutex::new(FeeEstimate {
                fee: DEFAULT_FEE,
                gas: DEFAULT_GAS,
                gas_price: DEFAULT_GAS_PRICE,
                token: TokenId::StableDollar,
            }),
            fail_unlock: Mutex::new(false),
            fail_balance: Mutex::new(false),
            fail_estimate: Mutex::new(false),
            fail_transfer: Mutex::new(false),
            unlock_count: AtomicUsize::new(0),
            balance_count: AtomicUsize::new(0),
            estimate_count: AtomicUsize::new(0),
            transfer_count: AtomicUsize::new(0),
        }
    }

    /// Deterministic mock derivation: the account address is the key's last
    /// 20 bytes. Good enough for a double - stable per key, unique enough.
    pub fn derive_address(key: &RedemptionKey) -> Address {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&key.as_bytes()[12..32]);
        Address::from_bytes(bytes)
    }

    /// Seed an account balance
    pub fn fund(&self, address: Address, token: TokenId, amount: Amount) {
        let mut balances = self.balances.lock().unwrap();
        *balances.entry((address, token)).or_insert(0) += amount;
    }

    /// Current balance (what tests assert against)
    pub fn balance_of(&self, address: Address, token: TokenId) -> Amount {
        *self
            .balances
            .lock()
            .unwrap()
            .get(&(address, token))
            .unwrap_or(&0)
    }

    pub fn set_fee(&self, fee: Amount, gas: u64, gas_price: Amount) {
        let mut estimate = self.fee.lock().unwrap();
        estimate.fee = fee;
        estimate.gas = gas;
        estimate.gas_price = gas_price;
    }

    pub fn set_fail_unlock(&self, fail: bool) {
        *self.fail_unlock.lock().unwrap() = fail;
    }

    pub fn set_fail_balance(&self, fail: bool) {
        *self.fail_balance.lock().unwrap() = fail;
    }

    pub fn set_fail_estimate(&self, fail: bool) {
        *self.fail_estimate.lock().unwrap() = fail;
    }

    pub fn set_fail_transfer(&self, fail: bool) {
        *self.fail_transfer.lock().unwrap() = fail;
    }

    pub fn unlock_count(&self) -> usize {
        self.unlock_count.load(Ordering::SeqCst)
    }

    pub fn balance_count(&self) -> usize {
        self.balance_count.load(Ordering::SeqCst)
    }

    pub fn estimate_count(&self) -> usize {
        self.estimate_count.load(Ordering::SeqCst)
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_count.load(Ordering::SeqCst)
    }

    fn make_receipt(&self, req_id: RedemptionId, gas_used: u64) -> TransferReceipt {
        // Deterministic hash from the request id
        let mut hash = [0u8; 32];
        hash[..16].copy_from_slice(&req_id.inner().to_bytes());
        hash[16..].copy_from_slice(&req_id.inner().to_bytes());

        TransferReceipt {
            transaction_hash: TxHash::from_bytes(hash),
            block_number: self.next_block.fetch_add(1, Ordering::SeqCst),
            gas_used,
            status: true,
        }
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerService for MockLedger {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn unlock_account(&self, key: &RedemptionKey) -> Result<AccountHandle, LedgerError> {
        self.unlock_count.fetch_add(1, Ordering::SeqCst);

        if *self.fail_unlock.lock().unwrap() {
            return Err(LedgerError::Unlock("mock unlock failure".into()));
        }

        Ok(AccountHandle::new(Self::derive_address(key)))
    }

    async fn token_balance(
        &self,
        account: &AccountHandle,
        token: TokenId,
    ) -> Result<Amount, LedgerError> {
        self.balance_count.fetch_add(1, Ordering::SeqCst);

        if *self.fail_balance.lock().unwrap() {
            return Err(LedgerError::RpcConnection("mock balance query failure".into()));
        }

        Ok(self.balance_of(account.address, token))
    }

    async fn estimate_fee(
        &self,
        _from: &AccountHandle,
        _to: Address,
        token: TokenId,
        _amount: Amount,
    ) -> Result<FeeEstimate, LedgerError> {
        self.estimate_count.fetch_add(1, Ordering::SeqCst);

        if *self.fail_estimate.lock().unwrap() {
            return Err(LedgerError::Rpc {
                code: -32000,
                message: "mock estimate failure".into(),
            });
        }

        let mut estimate = *self.fee.lock().unwrap();
        estimate.token = token;
        Ok(estimate)
    }

    async fn submit_transfer(
        &self,
        req_id: RedemptionId,
        from: &AccountHandle,
        to: Address,
        token: TokenId,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        self.transfer_count.fetch_add(1, Ordering::SeqCst);

        if *self.fail_transfer.lock().unwrap() {
            return Err(LedgerError::Reverted("mock transfer failure".into()));
        }

        // Idempotent re-submission returns the original receipt
        if let Some(receipt) = self.processed.lock().unwrap().get(&req_id) {
            return Ok(*receipt);
        }

        {
            let mut balances = self.balances.lock().unwrap();
            let fee = self.fee.lock().unwrap().fee;

            let source = balances.entry((from.address, token)).or_insert(0);
            let debit = amount
                .checked_add(fee)
                .ok_or_else(|| LedgerError::Parse("amount overflow".into()))?;
            if *source < debit {
                return Err(LedgerError::Rpc {
                    code: -32000,
                    message: "insufficient funds for transfer and fee".into(),
                });
            }
            *source -= debit;
            *balances.entry((to, token)).or_insert(0) += amount;
        }

        let receipt = self.make_receipt(req_id, 31_502);
        self.processed.lock().unwrap().insert(req_id, receipt);
        Ok(receipt)
    }
}
