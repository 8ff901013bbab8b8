//! Lifecycle of a single client connection.
//!
//! A [`Connection`] owns its stream and loops through
//! `AwaitingRequest → Dispatching → Responding → (AwaitingRequest | Closed)`
//! until the client asks to close, disconnects, or sends something that
//! cannot be framed or parsed. Malformed input closes the connection without
//! a response.
//!
//! The stream is moved into [`Connection::serve`] and dropped when it
//! returns, so the socket is released exactly once on every exit path.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use async_std::io::{Read, Write, WriteExt};
use tracing::{debug, info, warn};

use crate::handler;
use crate::http::frame::{FrameLimits, FrameReader};
use crate::http::parser::parse_request;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Relaxed ordering is enough, ids only need to be unique.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

enum State {
    AwaitingRequest,
    Dispatching(HttpRequest),
    Responding { response: HttpResponse, close: bool },
    Closed,
}

/// Logs the end of a connection when dropped, whichever path ended it.
struct CloseGuard {
    id: ConnectionId,
    peer: SocketAddr,
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        debug!(connection = %self.id, peer = %self.peer, "connection closed");
    }
}

pub struct Connection<S> {
    id: ConnectionId,
    peer: SocketAddr,
    stream: S,
    frames: FrameReader,
}

impl<S> Connection<S>
where
    S: Read + Write + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, limits: FrameLimits) -> Self {
        Self {
            id: ConnectionId::next(),
            peer,
            stream,
            frames: FrameReader::new(limits),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Serves requests until the connection reaches the `Closed` state.
    pub async fn serve(mut self) {
        let _guard = CloseGuard {
            id: self.id,
            peer: self.peer,
        };
        debug!(connection = %self.id, peer = %self.peer, "connection opened");

        let mut state = State::AwaitingRequest;
        loop {
            state = match state {
                State::AwaitingRequest => self.await_request().await,
                State::Dispatching(req) => self.dispatch(req),
                State::Responding { response, close } => {
                    match self.write_response(&response).await {
                        Ok(()) if close => State::Closed,
                        Ok(()) => State::AwaitingRequest,
                        Err(err) => {
                            warn!(connection = %self.id, error = %err, "failed to write response");
                            State::Closed
                        }
                    }
                }
                State::Closed => break,
            };
        }
    }

    async fn await_request(&mut self) -> State {
        let frame = match self.frames.next_frame(&mut self.stream).await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!(connection = %self.id, "peer closed the connection");
                return State::Closed;
            }
            Err(err) => {
                warn!(connection = %self.id, error = %err, "malformed framing, dropping connection");
                return State::Closed;
            }
        };

        match parse_request(&frame) {
            Ok(req) => State::Dispatching(req),
            Err(err) => {
                warn!(connection = %self.id, error = %err, "malformed request, dropping connection");
                State::Closed
            }
        }
    }

    fn dispatch(&self, req: HttpRequest) -> State {
        let mut response = handler::handle_request(&req);

        let close = req.wants_close();
        if close {
            response.set_connection("close");
        }

        info!(
            connection = %self.id,
            method = %req.method,
            path = %req.path,
            status = response.status(),
            "request handled"
        );

        State::Responding { response, close }
    }

    async fn write_response(&mut self, response: &HttpResponse) -> std::io::Result<()> {
        let headers = response.build_headers();
        self.stream.write_all(headers.as_bytes()).await?;
        self.stream.write_all(response.body()).await?;
        self.stream.flush().await
    }
}
