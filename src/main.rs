//! blame-nav - navigable git blame served over a local HTTP API
//!
//! # Usage
//! ```bash
//! blame-nav /path/to/repository --file src/lib.rs   # Start with an active file
//! blame-nav . -p 4000                               # Pick the file per request
//! blame-nav . --clipboard "xsel --clipboard --input"
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blame_nav::blame::clipboard::ClipboardCommand;
use blame_nav::blame::{BlameConfig, BlameEngine, PanelHost};
use blame_nav::git::{GitRepository, SystemRunner};
use blame_nav::routes;

/// Navigable git blame - browse line authorship and step back through history
#[derive(Parser)]
#[command(name = "blame-nav")]
#[command(about = "Navigable git blame over a local HTTP API", long_about = None)]
struct Cli {
    /// Path to the git repository
    #[arg(value_name = "REPO_PATH", default_value = ".")]
    repo_path: String,

    /// File to blame when no path is given to the open endpoint
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Git binary used for blame invocations
    #[arg(long, default_value = "git")]
    git: String,

    /// Clipboard command receiving hashes on stdin (auto-detected when omitted)
    #[arg(long)]
    clipboard: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let repo = match GitRepository::open(&cli.repo_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Failed to open repository: {}", e);
            eprintln!("  Path: {}", cli.repo_path);
            std::process::exit(1);
        }
    };

    let clipboard = match cli.clipboard.as_deref() {
        Some(spec) => match ClipboardCommand::parse(spec) {
            Some(c) => c,
            None => {
                eprintln!("✗ --clipboard needs a command");
                std::process::exit(1);
            }
        },
        None => ClipboardCommand::detect(),
    };

    // Relative --file paths are taken from the repository root
    let active_file = cli.file.map(|f| if f.is_absolute() { f } else { repo.workdir.join(f) });

    let config = BlameConfig {
        git: cli.git.clone(),
        clipboard,
    };
    let host = PanelHost::new(active_file.clone());
    let engine = Arc::new(Mutex::new(BlameEngine::new(SystemRunner, host, config)));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(engine))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", cli.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    let url = format!("http://127.0.0.1:{}", cli.port);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                  blame-nav                  │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Repository: {} ({})", repo.name(), repo.workdir.display());
    if let Some(file) = &active_file {
        println!("  File:       {}", file.display());
    }
    println!("  Server:     {}/api/v1/blame/view", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
