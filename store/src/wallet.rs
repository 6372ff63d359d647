use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::Store;
use crate::error::WalletError;
use crate::ledger::Ledger;
use crate::models::Wallet;

impl Store {
    async fn begin_serializable(&self) -> Result<Transaction<'static, Postgres>, WalletError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Replays `attempt` while PostgreSQL reports a serialization conflict,
    /// up to the configured bound.
    async fn with_retries<T, F, Fut>(
        &self,
        operation: &'static str,
        id: Uuid,
        attempt: F,
    ) -> Result<T, WalletError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WalletError>>,
    {
        let mut retries = 0;
        loop {
            match attempt().await {
                Err(err) if err.is_retryable() && retries < self.serialization_retries() => {
                    retries += 1;
                    log::debug!(
                        "{} on wallet {} lost a serialization conflict, retry {}/{}",
                        operation,
                        id,
                        retries,
                        self.serialization_retries()
                    );
                    tokio::time::sleep(Duration::from_millis(u64::from(retries.min(10)) * 2)).await;
                }
                Err(err) => {
                    if err.is_retryable() {
                        log::error!("{} on wallet {} gave up after {} retries", operation, id, retries);
                    }
                    return Err(err);
                }
                ok => return ok,
            }
        }
    }

    async fn deposit_once(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        let mut tx = self.begin_serializable().await?;

        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE wallets
            SET balance = balance + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING balance
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if WalletError::is_numeric_overflow(&e) {
                WalletError::InvalidAmount(format!("deposit of {} overflows the balance", amount))
            } else {
                WalletError::StoreUnavailable(e)
            }
        })?;

        let Some(balance) = balance else {
            tx.rollback().await?;
            return Err(WalletError::WalletNotFound(id));
        };

        tx.commit().await?;
        Ok(balance)
    }

    async fn withdraw_once(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        let mut tx = self.begin_serializable().await?;

        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE wallets
            SET balance = balance - $2, updated_at = NOW()
            WHERE id = $1 AND balance >= $2
            RETURNING balance
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_check_violation() => {
                WalletError::InsufficientFunds {
                    wallet_id: id,
                    requested: amount,
                }
            }
            other => WalletError::StoreUnavailable(other),
        })?;

        if let Some(balance) = balance {
            tx.commit().await?;
            return Ok(balance);
        }

        // No row matched: tell a missing wallet apart from a short balance.
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM wallets WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.rollback().await?;

        if exists {
            Err(WalletError::InsufficientFunds {
                wallet_id: id,
                requested: amount,
            })
        } else {
            Err(WalletError::WalletNotFound(id))
        }
    }
}

#[async_trait]
impl Ledger for Store {
    async fn create_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            INSERT INTO wallets (id, balance)
            VALUES ($1, 0)
            RETURNING id, balance, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                WalletError::DuplicateWallet(id)
            }
            other => WalletError::StoreUnavailable(other),
        })?;

        Ok(wallet)
    }

    async fn deposit(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        self.with_retries("deposit", id, || self.deposit_once(id, amount))
            .await
    }

    async fn withdraw(&self, id: Uuid, amount: i64) -> Result<i64, WalletError> {
        self.with_retries("withdraw", id, || self.withdraw_once(id, amount))
            .await
    }

    async fn get_balance(&self, id: Uuid) -> Result<i64, WalletError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT balance
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(WalletError::WalletNotFound(id))
    }

    async fn get_wallet(&self, id: Uuid) -> Result<Wallet, WalletError> {
        sqlx::query_as::<_, Wallet>(
            r#"
            SELECT id, balance, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(WalletError::WalletNotFound(id))
    }
}
