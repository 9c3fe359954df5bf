//! `x-request-id` handling.
//!
//! Inbound requests keep the id the browser sent or get a fresh UUID. The
//! same id is echoed on the response and forwarded on outbound LLM calls so
//! both sides of a proxied request share one id in the logs.

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Layer that assigns missing ids. Must sit outside the trace layer.
pub fn assign_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(), MakeRequestUuid)
}

/// Layer that copies the id onto the response.
pub fn echo_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header())
}

pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)?
            .to_str()
            .ok()
            .filter(|id| !id.is_empty())
    }
}

/// Attach the inbound id to an outbound request, if there is one.
pub trait ForwardRequestId {
    fn forward_request_id(self, request_id: Option<&str>) -> Self;
}

impl ForwardRequestId for reqwest::RequestBuilder {
    fn forward_request_id(self, request_id: Option<&str>) -> Self {
        match request_id {
            Some(id) => self.header(X_REQUEST_ID, id),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_id_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(headers.request_id(), None);

        headers.insert(request_id_header(), "abc-123".parse().unwrap());
        assert_eq!(headers.request_id(), Some("abc-123"));
    }

    #[test]
    fn empty_id_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(request_id_header(), "".parse().unwrap());
        assert_eq!(headers.request_id(), None);
    }

    #[test]
    fn forwarded_id_lands_on_outbound_request() {
        let client = reqwest::Client::new();

        let request = client
            .post("http://localhost/chat")
            .forward_request_id(Some("req-7"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[X_REQUEST_ID], "req-7");

        let request = client
            .post("http://localhost/chat")
            .forward_request_id(None)
            .build()
            .unwrap();
        assert!(request.headers().get(X_REQUEST_ID).is_none());
    }
}
