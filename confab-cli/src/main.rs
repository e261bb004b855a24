use anyhow::{Context, Result};
use axum::{Router, routing::get};
use clap::{Parser, Subcommand};
use colored::*;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use confab_core::IceServerConfig;
use confab_server::{Gateway, GatewayCommand, SIGNALING_PATH, SignalingService, ws_handler};

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Room-coordination and WebRTC signaling gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling gateway.
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        /// STUN urls handed to connecting clients (repeatable).
        #[arg(long = "stun-url", default_value = "stun:stun.l.google.com:19302")]
        stun_urls: Vec<String>,

        /// Optional TURN relay url.
        #[arg(long)]
        turn_url: Option<String>,

        /// TURN username; falls back to $TURN_USERNAME.
        #[arg(long)]
        turn_username: Option<String>,

        /// TURN credential; falls back to $TURN_CREDENTIAL.
        #[arg(long)]
        turn_credential: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            stun_urls,
            turn_url,
            turn_username,
            turn_credential,
        } => serve(bind, stun_urls, turn_url, turn_username, turn_credential).await,
    }
}

async fn serve(
    bind: SocketAddr,
    stun_urls: Vec<String>,
    turn_url: Option<String>,
    turn_username: Option<String>,
    turn_credential: Option<String>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{}", "🚀 Starting Confab signaling gateway...".green().bold());

    let mut ice_servers = vec![IceServerConfig {
        urls: stun_urls,
        username: None,
        credential: None,
    }];

    if let Some(turn_url) = turn_url {
        let username = turn_username.or_else(|| env::var("TURN_USERNAME").ok());
        let credential = turn_credential.or_else(|| env::var("TURN_CREDENTIAL").ok());

        ice_servers.push(IceServerConfig {
            urls: vec![turn_url],
            username,
            credential,
        });
    }

    let (gateway_tx, gateway_rx) = mpsc::channel::<GatewayCommand>(100);
    let service = SignalingService::new(gateway_tx, ice_servers);

    let gateway = Gateway::new(gateway_rx, Arc::new(service.clone()));
    tokio::spawn(gateway.run());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route(SIGNALING_PATH, get(ws_handler))
        .layer(cors)
        .with_state(service);

    info!("Signaling gateway listening on http://{}", bind);
    println!("   📡 Endpoint: ws://{}{}", bind, SIGNALING_PATH);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
