use helper::LocalHelper;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // stdout carries the protocol; logs must go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("local-helper v{} starting", env!("CARGO_PKG_VERSION"));

    let helper = LocalHelper::new();
    if let Err(e) = mcp::serve_stdio(&helper).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
