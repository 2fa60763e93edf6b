use std::env;
use std::net::SocketAddr;

use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use screening_export::styles::DocumentStyles;
use screening_reconcile::config::config_path;
use screening_reconcile::{Dataset, load_config};
use screening_server::{AppState, router};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let path = config_path()?;
    let config = load_config(&path)
        .wrap_err_with(|| format!("loading config from {}", path.display()))?;

    let mut state = AppState::new(Dataset::from_config(&config));
    if let Ok(styles_path) = env::var("SCREENING_REPORT_STYLES") {
        let json = std::fs::read_to_string(&styles_path)
            .wrap_err_with(|| format!("reading report styles {styles_path}"))?;
        let styles = DocumentStyles::from_json(&json)
            .wrap_err_with(|| format!("parsing report styles {styles_path}"))?;
        tracing::info!(path = %styles_path, font = %styles.font_family, "report styles loaded");
        state = state.with_styles(styles);
    }
    if let Ok(font_path) = env::var("SCREENING_PDF_FONT") {
        let font = std::fs::read(&font_path)
            .wrap_err_with(|| format!("reading PDF font {font_path}"))?;
        state = state.with_pdf_font(font);
    }

    let addr: SocketAddr = env::var("SCREENING_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .wrap_err("invalid SCREENING_ADDR")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
