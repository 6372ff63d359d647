use async_trait::async_trait;
use uuid::Uuid;

use crate::error::WalletError;
use crate::models::Wallet;

/// Durable mapping from wallet id to balance.
///
/// Implementations apply every mutation atomically: the sufficiency check of
/// `withdraw` happens in the same step as the decrement, so concurrent calls
/// against one wallet behave as if executed in some serial order.
/// Amounts are validated by the caller and are never negative here.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Inserts a zero-balance wallet. Fails with `DuplicateWallet` if `id` is taken.
    async fn create_wallet(&self, id: Uuid) -> Result<Wallet, WalletError>;

    /// Adds `amount` and returns the new balance.
    async fn deposit(&self, id: Uuid, amount: i64) -> Result<i64, WalletError>;

    /// Subtracts `amount` only if the balance stays non-negative; returns the new balance.
    async fn withdraw(&self, id: Uuid, amount: i64) -> Result<i64, WalletError>;

    async fn get_balance(&self, id: Uuid) -> Result<i64, WalletError>;

    async fn get_wallet(&self, id: Uuid) -> Result<Wallet, WalletError>;
}
