use std::{convert::Infallible, net::{IpAddr, Ipv4Addr, SocketAddr}, sync::Arc};

use anyhow::Context;
use canvas::{PaintOrchestrator, TokenCodec};
use clap::Parser;
use config::CanvasArgs;
use console_input::console_input_thread;
use context::{CanvasContext, CanvasContextRef};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use warp::{reject::Rejection, Filter, Reply};

mod config;
mod console_input;
mod context;
mod handler;
mod ws;


type Result<T> = std::result::Result<T, Rejection>;

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CanvasArgs::parse();
    let config = args.canvas_config()?;
    let codec = match &args.token_secret {
        Some(secret) => TokenCodec::new(secret.as_bytes())?,
        None => {
            info!("no token secret configured, cooldown tokens will not survive a restart");
            TokenCodec::new([Uuid::new_v4().into_bytes(), Uuid::new_v4().into_bytes()].concat())?
        }
    };

    info!(
        size = config.size,
        cooldown_seconds = config.cooldown_seconds,
        palette = %config.palette.describe(),
        "starting canvas"
    );
    let orchestrator = PaintOrchestrator::new(config, codec)?;
    let context_ref: CanvasContextRef = Arc::new(CanvasContext::new(orchestrator, args.cookie_max_age));

    console_input_thread(context_ref.clone());

    let addr = SocketAddr::new(IpAddr::from(Ipv4Addr::UNSPECIFIED), args.port);
    let (addr, server) = warp::serve(routes(context_ref))
        .try_bind_ephemeral(addr)
        .with_context(|| format!("failed to bind to port {}", args.port))?;
    info!("listening on http://{addr}");

    server.await;
    Ok(())
}

pub fn routes(context_ref: CanvasContextRef) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let board = warp::path!("api" / "board")
        .and(warp::get())
        .and(warp::cookie::optional(handler::COOKIE_NAME).map(handler::cooldown_token))
        .and(with_context(context_ref.clone()))
        .and_then(handler::board_handler);

    let paint = warp::path!("api" / "paint")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(warp::cookie::optional(handler::COOKIE_NAME).map(handler::cooldown_token))
        .and(with_context(context_ref.clone()))
        .and_then(handler::paint_handler);

    let health = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(handler::health_handler);

    let ws = warp::path!("api" / "ws")
        .and(warp::ws())
        .and(with_context(context_ref))
        .and_then(handler::ws_handler);

    board
        .or(paint)
        .or(health)
        .or(ws)
        .with(warp::cors().allow_any_origin())
        .recover(handler::rejection_handler)
}

fn with_context(context_ref: CanvasContextRef) -> impl Filter<Extract = (CanvasContextRef,), Error = Infallible> + Clone {
    warp::any().map(move || context_ref.clone())
}
