//! A minimal HTTP/1.1 server with persistent connections.
//!
//! Request flow, one task per accepted connection:
//!
//! 1. [`net::server::Server`] accepts a TCP connection
//! 2. [`http::frame::FrameReader`] cuts exactly one request out of the byte stream
//! 3. [`http::parser::parse_request`] turns it into an [`http::request::HttpRequest`]
//! 4. [`handler::handle_request`] picks the response from a fixed route table
//! 5. [`net::connection::Connection`] writes it back and either waits for the
//!    next request on the same socket or closes it
//!
//! Malformed requests close the connection without a response.

pub mod config;
pub mod handler;
pub mod http;
pub mod net;
