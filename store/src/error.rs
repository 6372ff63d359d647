use uuid::Uuid;

/// SQLSTATE codes PostgreSQL raises when a serializable transaction loses a
/// conflict; the transaction can be replayed from scratch.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("invalid wallet identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("wallet not found: {0}")]
    WalletNotFound(Uuid),

    #[error("insufficient funds in wallet {wallet_id}: requested {requested}")]
    InsufficientFunds { wallet_id: Uuid, requested: i64 },

    #[error("wallet already exists: {0}")]
    DuplicateWallet(Uuid),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl WalletError {
    /// True for conflicts the store may resolve by re-running the transaction.
    pub fn is_retryable(&self) -> bool {
        match self {
            WalletError::StoreUnavailable(sqlx::Error::Database(db)) => matches!(
                db.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ),
            _ => false,
        }
    }

    pub(crate) fn is_numeric_overflow(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db) => db.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE),
            _ => false,
        }
    }
}
