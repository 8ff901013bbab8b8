use crate::http::HttpMethod;
use crate::http::headers::HttpHeaders;

/// A parsed HTTP request.
///
/// Built once by [`parse_request`](crate::http::parser::parse_request) and
/// never mutated afterwards; it lives for a single request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub version: String,

    // headers
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Whether the client asked for the connection to be closed after this
    /// exchange. A missing `Connection` header means keep-alive.
    pub fn wants_close(&self) -> bool {
        self.headers
            .get("Connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("close"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(headers: HttpHeaders) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "/".to_string(),
            version: "HTTP/1.1".to_string(),
            headers,
            body: Vec::new(),
        }
    }

    #[test]
    fn connection_close_is_case_insensitive() {
        let req = request_with([("Connection", "Close")].into_iter().collect());
        assert!(req.wants_close());

        let req = request_with([("Connection", "keep-alive")].into_iter().collect());
        assert!(!req.wants_close());
    }

    #[test]
    fn missing_connection_header_keeps_alive() {
        assert!(!request_with(HttpHeaders::new()).wants_close());
    }
}
