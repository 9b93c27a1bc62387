use issue_service::app::{build_app, build_store};
use issue_service::config::{ServiceConfig, USAGE};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().any(|arg| arg == "--help" || arg == "-h") {
        eprintln!("{}", USAGE);
        std::process::exit(0);
    }

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting issue service with {:?} backend", config.backend);

    // 1. Storage:
    let store = build_store(&config)?;

    // 2. HTTP Router:
    if !config.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} not found, only the API will be served",
            config.static_dir.display()
        );
    }
    let app = build_app(store, &config.static_dir);

    // 3. Start HTTP server:
    tracing::info!("Server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
