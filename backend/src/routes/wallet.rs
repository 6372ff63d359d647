use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use store::WalletTransaction;
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::middleware::RequestScope;
use crate::routes::INVALID_JSON;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CreateWalletRequest {
    #[serde(default, alias = "walletId")]
    pub wallet_id: Option<String>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: &'static str,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Serialize)]
pub struct CreateWalletResponse {
    pub success: &'static str,
    pub wallet_id: Uuid,
}

#[actix_web::post("/wallet")]
pub async fn wallet_transaction(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    req: web::Json<WalletTransaction>,
) -> Result<HttpResponse, ApiError> {
    log::debug!(
        "{} parsed request: {} {} {}",
        ctx,
        req.wallet_id,
        req.operation,
        req.amount
    );

    state
        .engine
        .execute(&ctx, &req)
        .await
        .map_err(|e| state.reject(e, "transaction failed"))?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success: "true" }))
}

#[actix_web::get("/wallets")]
pub async fn get_balance(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    query: web::Query<BalanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = match query.id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            log::warn!("{} balance query without 'id' parameter", ctx);
            return Ok(HttpResponse::BadRequest().json(ErrorBody::new("parameter 'id' is empty")));
        }
    };

    let balance = state
        .engine
        .balance(&ctx, id)
        .await
        .map_err(|e| state.reject(e, "failed to get balance"))?;

    Ok(HttpResponse::Ok().json(BalanceResponse { balance }))
}

#[actix_web::get("/wallets/{id}")]
pub async fn get_wallet(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let wallet = state
        .engine
        .wallet(&ctx, &path)
        .await
        .map_err(|e| state.reject(e, "failed to get wallet"))?;

    Ok(HttpResponse::Ok().json(wallet))
}

/// The body is optional: an empty body creates a wallet under a fresh id.
#[actix_web::post("/wallets")]
pub async fn create_wallet(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CreateWalletRequest::default()
    } else {
        match serde_json::from_slice::<CreateWalletRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("{} rejected create wallet body: {}", ctx, e);
                return Ok(HttpResponse::BadRequest().json(ErrorBody::new(INVALID_JSON)));
            }
        }
    };

    let wallet = state
        .engine
        .create_wallet(&ctx, request.wallet_id.as_deref())
        .await
        .map_err(|e| state.reject(e, "failed to create wallet"))?;

    Ok(HttpResponse::Ok().json(CreateWalletResponse {
        success: "true",
        wallet_id: wallet.id,
    }))
}
