use store::{TransactionEngine, WalletError};

use crate::error::{ApiError, ErrorStatusMode};

pub struct AppState {
    pub engine: TransactionEngine,
    pub error_status: ErrorStatusMode,
}

impl AppState {
    pub fn new(engine: TransactionEngine, error_status: ErrorStatusMode) -> Self {
        Self {
            engine,
            error_status,
        }
    }

    pub fn reject(&self, error: WalletError, generic: &'static str) -> ApiError {
        ApiError::new(error, self.error_status, generic)
    }
}
