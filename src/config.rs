use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;

use crate::http::frame::FrameLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to deserialize {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Server settings, read from a TOML file. Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,

    /// Size of a single read from a client socket.
    pub buffer_size: usize,
    pub max_header_size: usize,
    pub max_body_size: usize,

    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or `keepalive_http=debug`.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,

            buffer_size: 4096,
            max_header_size: 8192,
            max_body_size: 1024 * 1024, // 1 MB

            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str::<ServerConfig>(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }

    pub fn frame_limits(&self) -> FrameLimits {
        FrameLimits {
            read_chunk: self.buffer_size,
            max_header_size: self.max_header_size,
            max_body_size: self.max_body_size,
        }
    }
}
