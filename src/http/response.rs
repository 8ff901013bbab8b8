use thiserror::Error;

use crate::http::headers::HttpHeaders;
use crate::http::status::HttpStatus;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("status code {0} is outside 100..=599")]
pub struct InvalidStatus(pub u16);

/// A response ready to be written to the client.
///
/// Construction always leaves `Content-Length` equal to the body length and
/// `Connection` set (`keep-alive` unless the caller chose otherwise). The
/// fields are private so those invariants cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    reason: String,
    headers: HttpHeaders,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Builds a response for a well-known status, using its canonical reason phrase.
    ///
    /// `None` headers start from an empty map.
    pub fn new(status: HttpStatus, body: impl Into<Vec<u8>>, headers: Option<HttpHeaders>) -> Self {
        Self::build(
            status.code(),
            status.reason_phrase().to_string(),
            body.into(),
            headers,
        )
    }

    /// Builds a response with an arbitrary status code and reason phrase.
    pub fn with_reason(
        status: u16,
        reason: &str,
        body: impl Into<Vec<u8>>,
        headers: Option<HttpHeaders>,
    ) -> Result<Self, InvalidStatus> {
        if !(100..=599).contains(&status) {
            return Err(InvalidStatus(status));
        }

        Ok(Self::build(status, reason.to_string(), body.into(), headers))
    }

    fn build(status: u16, reason: String, body: Vec<u8>, headers: Option<HttpHeaders>) -> Self {
        let mut headers = headers.unwrap_or_default();

        // A caller supplied Content-Length is corrected in place.
        headers.insert("Content-Length", &body.len().to_string());
        if !headers.contains("Connection") {
            headers.insert("Connection", "keep-alive");
        }

        Self {
            status,
            reason,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Overrides the `Connection` header, e.g. to announce that the server
    /// will close the socket after this response.
    pub fn set_connection(&mut self, value: &str) {
        self.headers.insert("Connection", value);
    }

    pub fn build_headers(&self) -> String {
        // HTTP/1.1 <status> <reason>\r\n
        // <header_name>: <header_value>\r\n
        // ...
        // \r\n
        format!(
            "HTTP/1.1 {} {}\r\n{}\r\n",
            self.status,
            self.reason,
            self.headers.stringify(),
        )
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.build_headers().into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_content_length_and_connection_after_caller_headers() {
        let headers = [("Content-Type", "text/plain")].into_iter().collect();
        let res = HttpResponse::new(HttpStatus::Ok, "hi", Some(headers));

        assert_eq!(
            res.to_bytes(),
            b"HTTP/1.1 200 OK\r\n\
              Content-Type: text/plain\r\n\
              Content-Length: 2\r\n\
              Connection: keep-alive\r\n\
              \r\n\
              hi"
        );
    }

    #[test]
    fn wrong_content_length_is_corrected() {
        let headers = [("Content-Length", "999")].into_iter().collect();
        let res = HttpResponse::new(HttpStatus::NotFound, "abc", Some(headers));

        assert_eq!(res.headers().get("Content-Length"), Some("3"));
    }

    #[test]
    fn caller_connection_header_is_kept() {
        let headers = [("Connection", "close")].into_iter().collect();
        let res = HttpResponse::new(HttpStatus::Ok, Vec::new(), Some(headers));

        assert_eq!(res.headers().get("Connection"), Some("close"));
        assert_eq!(res.headers().get("Content-Length"), Some("0"));
    }

    #[test]
    fn default_headers_are_not_shared_between_responses() {
        let mut first = HttpResponse::new(HttpStatus::Ok, "a", None);
        first.set_connection("close");
        let second = HttpResponse::new(HttpStatus::Ok, "a", None);

        assert_eq!(second.headers().get("Connection"), Some("keep-alive"));
    }

    #[test]
    fn status_must_be_in_range() {
        assert_eq!(
            HttpResponse::with_reason(600, "Nope", "", None),
            Err(InvalidStatus(600))
        );
        assert_eq!(
            HttpResponse::with_reason(99, "Nope", "", None),
            Err(InvalidStatus(99))
        );

        let res = HttpResponse::with_reason(418, "I'm a teapot", "", None).unwrap();
        assert!(res.build_headers().starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
    }
}
