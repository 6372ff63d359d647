use std::str::FromStr;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use store::WalletError;

/// How ledger failures are turned into HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusMode {
    /// One status per failure kind.
    #[default]
    Differentiated,
    /// Every failure is a 400 with a generic message.
    Uniform,
}

impl FromStr for ErrorStatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "differentiated" => Ok(ErrorStatusMode::Differentiated),
            "uniform" => Ok(ErrorStatusMode::Uniform),
            other => Err(format!("unknown error status mode: {}", other)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    error: WalletError,
    mode: ErrorStatusMode,
    generic: &'static str,
}

impl ApiError {
    /// `generic` is the body used in uniform mode.
    pub fn new(error: WalletError, mode: ErrorStatusMode, generic: &'static str) -> Self {
        Self {
            error,
            mode,
            generic,
        }
    }

    fn message(&self) -> &'static str {
        if self.mode == ErrorStatusMode::Uniform {
            return self.generic;
        }
        match self.error {
            WalletError::InvalidIdentifier(_) => "invalid wallet id",
            WalletError::InvalidAmount(_) => "invalid amount",
            WalletError::UnknownOperation(_) => "unknown operation",
            WalletError::WalletNotFound(_) => "wallet not found",
            WalletError::InsufficientFunds { .. } => "insufficient funds",
            WalletError::DuplicateWallet(_) => "wallet already exists",
            WalletError::StoreUnavailable(_) => "storage unavailable",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        if self.mode == ErrorStatusMode::Uniform {
            return StatusCode::BAD_REQUEST;
        }
        match self.error {
            WalletError::InvalidIdentifier(_)
            | WalletError::InvalidAmount(_)
            | WalletError::UnknownOperation(_)
            | WalletError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            WalletError::WalletNotFound(_) => StatusCode::NOT_FOUND,
            WalletError::DuplicateWallet(_) => StatusCode::CONFLICT,
            WalletError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.message()))
    }
}
