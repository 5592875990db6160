use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkdir::loader::ContentLoader;
use linkdir::site::SiteWriter;
use linkdir::SiteConfig;

#[derive(Parser)]
#[command(name = "linkdir-generate")]
#[command(about = "Generate the content, map and keyword pages of a link directory")]
struct Args {
    /// Directory holding author.json, article.json, map.json and the optional fixtures
    #[arg(short, long, default_value = "content")]
    content: PathBuf,

    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Page identifier to highlight and unfold in the map
    #[arg(short, long)]
    page: Option<String>,

    /// Files copied as-is into the output directory
    #[arg(long)]
    static_dir: Option<PathBuf>,

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

    println!("🔍 Loading content from: {}", config.content_dir.display());
    let catalog = ContentLoader::from_config(&config)
        .load()
        .await
        .with_context(|| format!("failed to load content from {}", args.content.display()))?;
    println!(
        "📝 Found {} articles by {} authors, {} links",
        catalog.articles.len(),
        catalog.authors.len(),
        catalog.links.len()
    );

    let pages = SiteWriter::new(&catalog, &config)?
        .with_target_page(args.page)
        .write(&args.output)
        .with_context(|| format!("failed to write site to {}", args.output.display()))?;

    println!("✅ {} pages generated in: {}", pages, args.output.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "linkdir=debug" } else { "linkdir=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
