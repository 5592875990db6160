use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use linkdir::server::{serve, watch_content, AppState};
use linkdir::SiteConfig;

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Serve the link directory, re-rendering pages on every request")]
struct Args {
    #[arg(short, long, default_value = "content")]
    content: PathBuf,

    /// Served for any path the renderer does not handle
    #[arg(long)]
    static_dir: Option<PathBuf>,

    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    #[arg(long, default_value = "../")]
    page_prefix: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = SiteConfig::new(&args.content)
        .with_page_prefix(args.page_prefix)
        .with_static_dir(args.static_dir);
    let state = AppState::new(config)?;

    // keep serving: the watcher picks up fixed fixtures
    if let Err(e) = state.reload().await {
        error!(error = %e, "initial load failed");
    }
    let _watcher = watch_content(state.clone()).context("failed to watch content directory")?;

    println!("🚀 Dev server running on http://{}", args.addr);
    println!("📖 Content available at http://{}/content.html", args.addr);

    serve(args.addr, state)
        .await
        .with_context(|| format!("server on {} stopped", args.addr))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "linkdir=debug,tower_http=debug"
    } else {
        "linkdir=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
