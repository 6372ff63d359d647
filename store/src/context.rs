use std::fmt;
use uuid::Uuid;

/// Per-request logging scope. The gateway creates one for every inbound
/// request and hands it down explicitly; log lines emitted on behalf of the
/// request carry its id.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request_id={}", self.request_id)
    }
}
