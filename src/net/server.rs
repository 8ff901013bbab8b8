//! Core HTTP server implementation.
//!
//! This module implements the low-level HTTP server runtime.
//! It is responsible only for networking concerns such as:
//! - binding the listening socket,
//! - accepting TCP connections,
//! - handing each connection to its own task.
//!
//! Everything that happens on an accepted connection (framing, parsing,
//! dispatch and keep-alive) lives in [`Connection`].
//!
//! The server is fully asynchronous and leverages the `async-std` crate:
//! each connection runs in its own task, isolated from the others, so a slow
//! or misbehaving client never blocks the accept loop.
//!
//! ## Shutdown
//!
//! [`Server::run`] accepts connections until the `shutdown` future resolves.
//! The listening socket is released when `run` returns. Connections already
//! in flight are not drained; their tasks keep running until their own
//! close condition.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use async_std::net::TcpListener;
use async_std::task;
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::http::frame::FrameLimits;
use crate::net::connection::Connection;

pub struct Server {
    listener: TcpListener,
    limits: FrameLimits,
}

impl Server {
    /// Binds to the configured address and port.
    ///
    /// Port `0` asks the OS for a free port; see [`Server::local_addr`].
    pub async fn bind(config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.socket_addr()).await?;
        info!(address = %listener.local_addr()?, "HTTP/1.1 server listening");

        Ok(Self {
            listener,
            limits: config.frame_limits(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves, spawning a new
    /// asynchronous task for each client.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let shutdown = shutdown.fuse();
        futures::pin_mut!(shutdown);

        loop {
            let accept = self.listener.accept().fuse();
            futures::pin_mut!(accept);

            futures::select! {
                accepted = accept => match accepted {
                    Ok((stream, peer)) => {
                        let connection = Connection::new(stream, peer, self.limits);
                        debug!(connection = %connection.id(), peer = %peer, "connection accepted");
                        task::spawn(connection.serve());
                    }
                    // Per-connection failures never stop the listener.
                    Err(err) => warn!(error = %err, "failed to accept connection"),
                },
                () = shutdown => {
                    info!("shutting down server");
                    break;
                }
            }
        }
    }
}
