//! blockfit allocation server
//!
//! HTTP backend for the allocation simulator form (`POST /allocate`)

use anyhow::Context;
use blockfit::{AllocationService, BlockfitConfig};
use clap::Parser;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "blockfit-server")]
#[command(about = "HTTP allocation service for fixed-block placement strategies")]
struct Args {
    /// Path to a TOML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port number (overrides config)
    #[arg(short = 'P', long)]
    port: Option<u16>,
}

fn load_config(args: &Args) -> anyhow::Result<BlockfitConfig> {
    let mut config = match &args.config {
        Some(path) => BlockfitConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => BlockfitConfig::default(),
    };

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // RUST_LOG wins over the config file
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.filter))
        .context("invalid logging filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting blockfit server");
    if let Some(path) = &args.config {
        info!("Config file: {:?}", path);
    }
    info!(
        "Limits: {} blocks, {} processes, {} body bytes",
        config.limits.max_blocks, config.limits.max_processes, config.limits.max_body_bytes
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address()))?;

    let service = AllocationService::new(config);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    let http_server = ConnBuilder::new(TokioExecutor::new());

    info!("Server listening on http://{}", local_addr);
    info!("Ready to accept POST /allocate");

    loop {
        // Accept connection or wait for Ctrl+C
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((socket, peer)) => {
                        let service = service.clone();
                        let http_server = http_server.clone();
                        tokio::spawn(async move {
                            let handler = service_fn(move |req: Request<Incoming>| {
                                let service = service.clone();
                                async move { service.handle(req).await }
                            });
                            let conn = http_server.serve_connection(TokioIo::new(socket), handler);
                            if let Err(e) = conn.await {
                                warn!("Connection error from {}: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Server stopped");

    Ok(())
}
