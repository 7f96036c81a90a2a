/// Per-request correlation context
///
/// Created by the correlation middleware for every inbound request and
/// passed explicitly down to the handlers and the probe runner, so log lines
/// emitted anywhere in the request carry the same `request_id`.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Fresh UUID v4 per request
    pub request_id: Uuid,
    pub method: String,
    pub path: String,
    pub client_ip: String,
}

impl RequestContext {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        client_ip: impl Into<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method: method.into(),
            path: path.into(),
            client_ip: client_ip.into(),
        }
    }

    /// Context for evaluations not triggered by an HTTP request
    pub fn background() -> Self {
        Self::new("INTERNAL", "-", "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new("GET", "/ready", "10.0.0.1");
        let b = RequestContext::new("GET", "/ready", "10.0.0.1");
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.request_id.get_version_num(), 4);
    }
}
