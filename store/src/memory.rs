use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::WalletError;
use crate::ledger::Ledger;
use crate::models::Wallet;

/// In-process ledger with the same contract as the PostgreSQL store.
///
/// Every operation holds the map lock for its whole check-and-mutate step, so
/// concurrent calls are applied in a single serial order.
#[derive(Default)]
pub struct MemoryLedger {
    wallets: Mutex<HashMap<Uuid, Wallet>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Wallet>> {
        // A panic while holding the lock cannot leave a wallet half-updated:
        // balances are only assigned after every check has passed.
        self.wallets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn create_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        let mut wallets = self.lock();
        if wallets.contains_key(&id) {
            return Err(WalletError::DuplicateWallet(id));
        }
        let wallet = Wallet::empty(id);
        wallets.insert(id, wallet.clone());
        Ok(wallet)
    }

    async fn deposit(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        let mut wallets = self.lock();
        let wallet = wallets.get_mut(&id).ok_or(WalletError::WalletNotFound(id))?;
        let balance = wallet.balance.checked_add(amount).ok_or_else(|| {
            WalletError::InvalidAmount(format!("deposit of {} overflows the balance", amount))
        })?;
        wallet.balance = balance;
        wallet.updated_at = Utc::now();
        Ok(balance)
    }

    async fn withdraw(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        let mut wallets = self.lock();
        let wallet = wallets.get_mut(&id).ok_or(WalletError::WalletNotFound(id))?;
        if wallet.balance < amount {
            return Err(WalletError::InsufficientFunds {
                wallet_id: id,
                requested: amount,
            });
        }
        wallet.balance -= amount;
        wallet.updated_at = Utc::now();
        Ok(wallet.balance)
    }

    async fn get_balance(&self, id: Uuid) -> Result<i64, WalletError> {
        self.lock()
            .get(&id)
            .map(|wallet| wallet.balance)
            .ok_or(WalletError::WalletNotFound(id))
    }

    async fn get_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        self.lock()
            .get(&id)
            .cloned()
            .ok_or(WalletError::WalletNotFound(id))
    }
}
