use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::middleware::from_fn;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::error::ErrorBody;
use crate::middleware::assign_request_id;

pub mod wallet;

pub use wallet::*;

pub const INVALID_JSON: &str = "invalid JSON format";
pub const INVALID_QUERY: &str = "invalid query parameters";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health)
        .service(
            web::scope("/api/v1")
                .wrap(from_fn(assign_request_id))
                .service(wallet_transaction)
                .service(get_balance)
                .service(get_wallet)
                .service(create_wallet),
        );
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("rejected request body: {}", err);
    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody::new(INVALID_JSON)))
        .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("rejected query string: {}", err);
    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody::new(INVALID_QUERY)))
        .into()
}

#[actix_web::get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
