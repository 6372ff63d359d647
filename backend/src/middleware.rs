use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use std::future::{Ready, ready};
use store::RequestContext;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn supplied_context(headers: &HeaderMap) -> Option<RequestContext> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .map(|request_id| RequestContext { request_id })
}

/// Fixes the request context before the handler runs and echoes its id in
/// the `x-request-id` response header, so access logs and handler logs agree.
pub async fn assign_request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let context = supplied_context(req.headers()).unwrap_or_default();
    let header = HeaderValue::from_str(&context.request_id.to_string()).ok();
    req.extensions_mut().insert(context);

    let mut res = next.call(req).await?;
    if let Some(value) = header {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}

/// Logging scope for one request. Taken from the context set by
/// `assign_request_id`; without that middleware a caller-supplied
/// `x-request-id` is reused when it is a valid UUID, otherwise a fresh id is
/// generated.
#[derive(Debug, Clone)]
pub struct RequestScope(pub RequestContext);

impl FromRequest for RequestScope {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .or_else(|| supplied_context(req.headers()))
            .unwrap_or_default();
        ready(Ok(RequestScope(context)))
    }
}
