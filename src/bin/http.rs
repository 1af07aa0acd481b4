#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use dispatch_board::http_api::{self, AppState};
    use dispatch_board::{BoardConfig, HttpJobSource, Refresher};

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let addr: SocketAddr = std::env::var("DISPATCH_BOARD_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = BoardConfig::from_env()?;
    let source = Arc::new(HttpJobSource::from_config(&config)?);
    let refresher = Refresher::new(source, config);
    let _refresh_task = refresher.clone().spawn();

    println!("dispatch-board HTTP API listening on http://{addr}");
    http_api::serve(addr, AppState::new(refresher)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
