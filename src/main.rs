use clap::Parser;
use flappy_relay::{app_state::AppState, config::Args, error::Result, server};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let port = args.port();
    let state = AppState::new(args.cleanup_on_close);

    let listener = TcpListener::bind((args.bind.as_str(), port)).await?;
    info!("websocket server is running on :{port}");

    server::serve(listener, state).await
}
