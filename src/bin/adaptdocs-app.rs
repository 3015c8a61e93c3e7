use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use adaptdocs::app::routes::router;
use adaptdocs::app::state::{AppConfig, AppState};
use adaptdocs::cli::DEFAULT_LANGUAGE;

const DEFAULT_DOCS_DIR: &str = "markdown/azure-developer-cli";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    /// Markdown tutorials directory (default: $ADAPTDOCS_DOCS_DIR, then
    /// `markdown/azure-developer-cli`).
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Navigation descriptor (default: `<docs-dir>/index.yml`).
    #[arg(long)]
    nav: Option<PathBuf>,

    /// Zone pivot language used when a request names none.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    default_lang: String,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    adaptdocs::logging::init(adaptdocs::logging::APP_DEFAULT_FILTER)?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting adaptdocs-app");

    let docs_dir = args.docs_dir.unwrap_or_else(|| {
        std::env::var("ADAPTDOCS_DOCS_DIR")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR))
    });
    if !docs_dir.is_dir() {
        tracing::warn!(
            docs_dir = %docs_dir.display(),
            "docs directory not found; pages will be placeholders"
        );
    }

    let app = router(AppState::new(AppConfig {
        docs_dir,
        nav_path: args.nav,
        default_language: args.default_lang,
    }));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
