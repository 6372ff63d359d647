// Shared by several test binaries; not every helper is used by each one.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use store::{Ledger, MemoryLedger, RequestContext, TransactionEngine, Wallet, WalletError, WalletTransaction};
use uuid::Uuid;

/// Ledger double that forwards to an in-memory ledger and counts every call.
#[derive(Default)]
pub struct CountingLedger {
    inner: MemoryLedger,
    calls: AtomicUsize,
}

impl CountingLedger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Ledger for CountingLedger {
    async fn create_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        self.hit();
        self.inner.create_wallet(id).await
    }

    async fn deposit(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        self.hit();
        self.inner.deposit(id, amount).await
    }

    async fn withdraw(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        self.hit();
        self.inner.withdraw(id, amount).await
    }

    async fn get_balance(&self, id: Uuid) -> Result<i64, WalletError> {
        self.hit();
        self.inner.get_balance(id).await
    }

    async fn get_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        self.hit();
        self.inner.get_wallet(id).await
    }
}

pub fn counting_engine() -> (TransactionEngine, Arc<CountingLedger>) {
    let ledger = Arc::new(CountingLedger::default());
    (TransactionEngine::new(ledger.clone()), ledger)
}

pub fn memory_engine() -> TransactionEngine {
    TransactionEngine::new(Arc::new(MemoryLedger::new()))
}

pub fn tx(wallet_id: impl ToString, operation: &str, amount: i64) -> WalletTransaction {
    WalletTransaction {
        wallet_id: wallet_id.to_string(),
        operation: operation.to_string(),
        amount,
    }
}

/// Creates a wallet and returns its id in canonical text form.
pub async fn new_wallet(engine: &TransactionEngine) -> String {
    let wallet = engine
        .create_wallet(&RequestContext::new(), None)
        .await
        .expect("wallet creation");
    wallet.id.to_string()
}
