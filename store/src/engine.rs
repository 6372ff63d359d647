use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::WalletError;
use crate::ledger::Ledger;
use crate::models::Wallet;

/// Length of the canonical 8-4-4-4-12 textual form.
const HYPHENATED_UUID_LEN: usize = 36;

/// A mutation request as decoded from the wire, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletTransaction {
    #[serde(alias = "walletId")]
    pub wallet_id: String,
    pub operation: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdraw,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "DEPOSIT",
            Operation::Withdraw => "WITHDRAW",
        }
    }
}

impl FromStr for Operation {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Operation::Deposit),
            "WITHDRAW" => Ok(Operation::Withdraw),
            other => Err(WalletError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated mutation, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletCommand {
    pub wallet_id: Uuid,
    pub operation: Operation,
    pub amount: i64,
}

impl TryFrom<&WalletTransaction> for WalletCommand {
    type Error = WalletError;

    fn try_from(request: &WalletTransaction) -> Result<Self, Self::Error> {
        let wallet_id = parse_wallet_id(&request.wallet_id)?;
        let amount = parse_amount(request.amount)?;
        let operation = request.operation.parse()?;
        Ok(Self {
            wallet_id,
            operation,
            amount,
        })
    }
}

/// Accepts only the hyphenated form, in either case.
pub fn parse_wallet_id(raw: &str) -> Result<Uuid, WalletError> {
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(WalletError::InvalidIdentifier(raw.to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| WalletError::InvalidIdentifier(raw.to_string()))
}

/// Zero passes: it is applied as a no-op mutation.
pub fn parse_amount(amount: i64) -> Result<i64, WalletError> {
    if amount < 0 {
        return Err(WalletError::InvalidAmount(format!(
            "amount must be >= 0, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Validates raw requests and runs each one as a single ledger call.
///
/// Holds no state besides the shared ledger handle; one engine serves every
/// worker. Nothing is retried here.
#[derive(Clone)]
pub struct TransactionEngine {
    ledger: Arc<dyn Ledger>,
}

impl TransactionEngine {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: &WalletTransaction,
    ) -> Result<i64, WalletError> {
        let command = WalletCommand::try_from(request).inspect_err(|e| {
            log::warn!("{} rejected wallet transaction: {}", ctx, e);
        })?;
        log::debug!(
            "{} {} wallet_id={} amount={}",
            ctx,
            command.operation,
            command.wallet_id,
            command.amount
        );

        let result = match command.operation {
            Operation::Deposit => self.ledger.deposit(command.wallet_id, command.amount).await,
            Operation::Withdraw => self.ledger.withdraw(command.wallet_id, command.amount).await,
        };

        match &result {
            Ok(balance) => log::info!(
                "{} {} applied wallet_id={} amount={} balance={}",
                ctx,
                command.operation,
                command.wallet_id,
                command.amount,
                balance
            ),
            Err(e) => log_failure(ctx, command.operation.as_str(), e),
        }
        result
    }

    pub async fn balance(&self, ctx: &RequestContext, wallet_id: &str) -> Result<i64, WalletError> {
        let id = parse_wallet_id(wallet_id).inspect_err(|e| {
            log::warn!("{} rejected balance query: {}", ctx, e);
        })?;
        log::debug!("{} balance query wallet_id={}", ctx, id);

        self.ledger
            .get_balance(id)
            .await
            .inspect_err(|e| log_failure(ctx, "balance", e))
    }

    pub async fn wallet(&self, ctx: &RequestContext, wallet_id: &str) -> Result<Wallet, WalletError> {
        let id = parse_wallet_id(wallet_id).inspect_err(|e| {
            log::warn!("{} rejected wallet lookup: {}", ctx, e);
        })?;

        self.ledger
            .get_wallet(id)
            .await
            .inspect_err(|e| log_failure(ctx, "wallet", e))
    }

    /// Creates a wallet under `wallet_id`, or under a fresh id when none is given.
    pub async fn create_wallet(
        &self,
        ctx: &RequestContext,
        wallet_id: Option<&str>,
    ) -> Result<Wallet, WalletError> {
        let id = match wallet_id {
            Some(raw) => parse_wallet_id(raw).inspect_err(|e| {
                log::warn!("{} rejected wallet creation: {}", ctx, e);
            })?,
            None => Uuid::new_v4(),
        };

        let wallet = self
            .ledger
            .create_wallet(id)
            .await
            .inspect_err(|e| log_failure(ctx, "create_wallet", e))?;
        log::info!("{} created wallet_id={}", ctx, wallet.id);
        Ok(wallet)
    }
}

fn log_failure(ctx: &RequestContext, operation: &str, err: &WalletError) {
    match err {
        WalletError::StoreUnavailable(_) => log::error!("{} {} failed: {}", ctx, operation, err),
        _ => log::warn!("{} {} refused: {}", ctx, operation, err),
    }
}
