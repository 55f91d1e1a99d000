mod config;
mod connection;
mod replies;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use config::ServerConfig;
use replies::Replies;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load("mc-ping.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load mc-ping.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "mc-ping v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.listen.address,
        config.listen.port
    );
    info!("MOTD: {}", config.status.motd);
    info!(
        "Version: {} (protocol {}), players {}/{}",
        config.status.protocol_name,
        config.status.protocol_version,
        config.status.online_players,
        config.status.max_players
    );

    let replies = Arc::new(Replies::build(&config));
    let handshake_timeout = Duration::from_millis(config.listen.handshake_timeout_ms);

    let addr: SocketAddr = format!("{}:{}", config.listen.address, config.listen.port)
        .parse()
        .expect("invalid bind address");
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("Listening on {addr}");

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let replies = replies.clone();
                    tokio::spawn(async move {
                        connection::handle(stream, peer, replies, handshake_timeout).await;
                    });
                }
                Err(e) => warn!("Accept error: {e}"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }
    info!("Server shut down.");
}
