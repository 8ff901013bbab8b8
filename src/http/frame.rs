//! Byte-stream framing for HTTP/1.1 messages.
//!
//! The [`FrameReader`] only deals with bytes: it finds the end of the header
//! block, resolves `Content-Length` and hands back exactly one message
//! (head + body). Interpreting those bytes is left to the
//! [`parser`](crate::http::parser).
//!
//! Bytes read past the end of a message stay in the reader's buffer and are
//! served first on the next call, so two requests arriving in a single TCP
//! segment are both answered, in order.
//!
//! The reader is message-agnostic and frames responses as well as requests.

use async_std::io::{Read, ReadExt};
use thiserror::Error;

use crate::config::ServerConfig;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer closed the stream after sending part of a message.
    #[error("connection closed mid-message with {buffered} bytes buffered")]
    Incomplete { buffered: usize },

    #[error("header block exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },

    #[error("invalid Content-Length value {0:?}")]
    InvalidContentLength(String),

    #[error("declared body of {declared} bytes exceeds the {limit} bytes limit")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("I/O error while reading frame: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    /// Size of a single read from the underlying stream.
    pub read_chunk: usize,
    pub max_header_size: usize,
    pub max_body_size: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        ServerConfig::default().frame_limits()
    }
}

pub struct FrameReader {
    buf: Vec<u8>,
    limits: FrameLimits,
}

impl FrameReader {
    pub fn new(limits: FrameLimits) -> Self {
        Self {
            buf: Vec::new(),
            limits,
        }
    }

    /// Number of bytes read from the stream but not yet returned in a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Returns the raw bytes of the next complete message.
    ///
    /// `Ok(None)` means the peer closed the stream cleanly between messages.
    /// A close in the middle of a message is [`FrameError::Incomplete`]; a
    /// short body is never returned as if it were complete.
    pub async fn next_frame<R>(&mut self, reader: &mut R) -> Result<Option<Vec<u8>>, FrameError>
    where
        R: Read + Unpin + ?Sized,
    {
        let mut chunk = vec![0; self.limits.read_chunk.max(1)];

        loop {
            // Leftovers from a previous read may already hold a whole message.
            if let Some(len) = self.complete_frame_len()? {
                let rest = self.buf.split_off(len);
                return Ok(Some(std::mem::replace(&mut self.buf, rest)));
            }

            let n = match reader.read(&mut chunk).await {
                Ok(0) if self.buf.is_empty() => return Ok(None),
                Ok(0) => {
                    return Err(FrameError::Incomplete {
                        buffered: self.buf.len(),
                    });
                }
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Length of the first complete message in the buffer, if there is one.
    fn complete_frame_len(&self) -> Result<Option<usize>, FrameError> {
        let Some(terminator) = find(&self.buf, HEADER_TERMINATOR) else {
            if self.buf.len() > self.limits.max_header_size {
                return Err(FrameError::HeaderTooLarge {
                    limit: self.limits.max_header_size,
                });
            }
            return Ok(None);
        };

        if terminator > self.limits.max_header_size {
            return Err(FrameError::HeaderTooLarge {
                limit: self.limits.max_header_size,
            });
        }

        let header_end = terminator + HEADER_TERMINATOR.len();
        let declared = content_length(&self.buf[..header_end])?;
        if declared > self.limits.max_body_size {
            return Err(FrameError::BodyTooLarge {
                declared,
                limit: self.limits.max_body_size,
            });
        }

        let total = header_end + declared;
        Ok((self.buf.len() >= total).then_some(total))
    }
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Scans a header block for `Content-Length`, ignoring case.
///
/// Absence means zero. Repeated headers must all carry the same value,
/// otherwise the message boundary is ambiguous and the frame is rejected.
fn content_length(head: &[u8]) -> Result<usize, FrameError> {
    let head = String::from_utf8_lossy(head);
    let mut length = None;

    for line in head.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("content-length") {
            continue;
        }

        let value = value.trim();
        let invalid = || FrameError::InvalidContentLength(value.to_string());

        // 1*DIGIT only: no sign, no whitespace, no empty value.
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let parsed = value.parse::<usize>().map_err(|_| invalid())?;

        match length {
            Some(previous) if previous != parsed => return Err(invalid()),
            _ => length = Some(parsed),
        }
    }

    Ok(length.unwrap_or(0))
}
