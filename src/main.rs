use std::net::IpAddr;
use std::path::PathBuf;

use async_std::channel;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use keepalive_http::config::ServerConfig;
use keepalive_http::net::server::Server;

/// Minimal HTTP/1.1 server with keep-alive connections.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to bind (default 127.0.0.1)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (default 8080)
    #[arg(long)]
    port: Option<u16>,

    /// TOML configuration file; --host and --port take precedence over it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[async_std::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_result = cli.config.as_deref().map(ServerConfig::from_file);
    let mut config = match &config_result {
        Some(Ok(config)) => config.clone(),
        _ => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config.address = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(Err(err)) = config_result {
        warn!(error = %err, "falling back to default config");
    }
    info!(
        address = %config.socket_addr(),
        buffer_size = config.buffer_size,
        "configuration loaded"
    );

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })?;

    let server = Server::bind(&config).await?;
    server
        .run(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await;

    info!("shutdown complete");
    Ok(())
}
