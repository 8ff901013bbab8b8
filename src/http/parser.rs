//! Turns one framed message into an [`HttpRequest`] or [`HttpResponse`].
//!
//! The input is expected to be exactly one message as produced by the
//! [`FrameReader`](crate::http::frame::FrameReader). The head is decoded as
//! UTF-8 (lossily); the body is kept as raw bytes.
//!
//! Methods and protocol versions are not checked here. Unknown values are
//! passed through and left to the router.

use std::borrow::Cow;

use thiserror::Error;

use crate::http::HttpMethod;
use crate::http::frame::find;
use crate::http::headers::HttpHeaders;
use crate::http::request::HttpRequest;
use crate::http::response::{HttpResponse, InvalidStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line {0:?}")]
    MalformedRequestLine(String),

    #[error("malformed status line {0:?}")]
    MalformedStatusLine(String),

    #[error("malformed header line {0:?}")]
    MalformedHeader(String),

    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

/// Parses `METHOD SP PATH SP VERSION`, the header lines and the body.
pub fn parse_request(frame: &[u8]) -> Result<HttpRequest, ParseError> {
    let (head, body) = split_message(frame);
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();

    // Exactly three tokens separated by single spaces.
    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method, path, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    };

    Ok(HttpRequest {
        method: HttpMethod::from(method),
        path: path.to_string(),
        version: version.to_string(),
        headers: parse_headers(lines)?,
        body: body.to_vec(),
    })
}

/// Parses `HTTP/1.1 SP CODE SP REASON`, the header lines and the body.
///
/// The reason phrase may contain spaces.
pub fn parse_response(frame: &[u8]) -> Result<HttpResponse, ParseError> {
    let (head, body) = split_message(frame);
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();

    let malformed = || ParseError::MalformedStatusLine(status_line.to_string());
    let mut parts = status_line.splitn(3, ' ');
    let (Some(version), Some(code), Some(reason)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let code = code.parse::<u16>().map_err(|_| malformed())?;

    let headers = parse_headers(lines)?;
    Ok(HttpResponse::with_reason(code, reason, body, Some(headers))?)
}

/// Splits a message at the first blank line. Without one, everything is head.
fn split_message(frame: &[u8]) -> (Cow<'_, str>, &[u8]) {
    match find(frame, b"\r\n\r\n") {
        Some(pos) => (String::from_utf8_lossy(&frame[..pos]), &frame[pos + 4..]),
        None => (String::from_utf8_lossy(frame), &[]),
    }
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HttpHeaders, ParseError> {
    let mut headers = HttpHeaders::new();

    for line in lines {
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeader(line.to_string()));
        };
        headers.insert(name.trim(), value.trim());
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::status::HttpStatus;

    #[test]
    fn parses_request_line_headers_and_body() {
        let req = parse_request(
            b"POST /submit HTTP/1.1\r\n\
              Host:  localhost:8080 \r\n\
              Content-Length: 9\r\n\
              \r\n\
              a\r\nb\r\n\r\nc",
        )
        .unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/submit");
        assert_eq!(req.version, "HTTP/1.1");
        assert_eq!(req.headers.get("Host"), Some("localhost:8080"));
        assert_eq!(req.headers.get("Content-Length"), Some("9"));
        assert_eq!(req.body, b"a\r\nb\r\n\r\nc");
    }

    #[test]
    fn request_line_needs_exactly_three_tokens() {
        for line in ["GET /", "GET / HTTP/1.1 extra", "GET  / HTTP/1.1", ""] {
            let raw = format!("{line}\r\n\r\n");
            assert_eq!(
                parse_request(raw.as_bytes()),
                Err(ParseError::MalformedRequestLine(line.to_string())),
            );
        }
    }

    #[test]
    fn header_line_without_colon_is_rejected() {
        let err = parse_request(b"GET / HTTP/1.1\r\nno-colon-here\r\n\r\n").unwrap_err();
        assert_eq!(err, ParseError::MalformedHeader("no-colon-here".to_string()));
    }

    #[test]
    fn unknown_method_and_version_pass_through() {
        let req = parse_request(b"BREW /pot HTCPCP/1.0\r\nHost: x\r\nHost: y\r\n\r\n").unwrap();

        assert_eq!(req.method, HttpMethod::Other("BREW".to_string()));
        assert_eq!(req.version, "HTCPCP/1.0");
        assert_eq!(req.headers.get("Host"), Some("y"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn serialized_response_parses_back_identically() {
        let headers = [("Content-Type", "application/json"), ("X-Trace", "a: b")]
            .into_iter()
            .collect();
        let res = HttpResponse::new(HttpStatus::NotFound, "{\"a\": 1}\r\n", Some(headers));

        let parsed = parse_response(&res.to_bytes()).unwrap();
        assert_eq!(parsed, res);
        assert_eq!(parsed.reason(), "Not Found");
    }

    #[test]
    fn status_line_must_carry_a_numeric_code() {
        assert_eq!(
            parse_response(b"HTTP/1.1 abc OK\r\n\r\n"),
            Err(ParseError::MalformedStatusLine("HTTP/1.1 abc OK".to_string())),
        );
        assert_eq!(
            parse_response(b"HTTP/1.1 700 Weird\r\n\r\n"),
            Err(ParseError::InvalidStatus(InvalidStatus(700))),
        );
    }
}
