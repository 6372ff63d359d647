pub mod context;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod models;
pub mod wallet;

use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub use context::RequestContext;
pub use engine::{Operation, TransactionEngine, WalletCommand, WalletTransaction};
pub use error::WalletError;
pub use ledger::Ledger;
pub use memory::MemoryLedger;
pub use models::Wallet;

pub const DEFAULT_SERIALIZATION_RETRIES: u32 = 16;

/// Connection settings for the PostgreSQL ledger.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
    pub serialization_retries: u32,
}

pub struct Store {
    pub pool: PgPool,
    serialization_retries: u32,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            serialization_retries: DEFAULT_SERIALIZATION_RETRIES,
        }
    }

    pub fn with_serialization_retries(mut self, retries: u32) -> Self {
        self.serialization_retries = retries;
        self
    }

    pub fn serialization_retries(&self) -> u32 {
        self.serialization_retries
    }

    /// Opens a pool whose connections enforce `statement_timeout`.
    pub async fn connect(config: &StoreConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::from_str(&config.database_url)?.options([(
            "statement_timeout",
            config.statement_timeout.as_millis().to_string(),
        )]);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool).with_serialization_retries(config.serialization_retries))
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
