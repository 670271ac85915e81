//! keydash binary entry point.
//!
//! Boots the background bridge (the only role with network capability),
//! opens the persistent icon cache, and runs the requested command.
//! Logging goes to stderr so the rendered dashboard on stdout stays clean.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bookmarks;
mod bridge;
mod cli;
mod dashboard;
mod favicons;

use keydash_client::{FetchClient, FetchConfig, domain_of};
use keydash_core::{AppConfig, CacheDb};

use favicons::FaviconCache;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = cli::Cli::parse();
    let config = AppConfig::load()?;

    let db = CacheDb::open(&config.db_path).await?;
    let fetcher = FetchClient::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.fetch_timeout(),
        max_bytes: config.max_bytes,
        probe_url: config.probe_url.clone(),
    })?;
    let bridge = bridge::spawn(fetcher);
    let cache = Arc::new(FaviconCache::new(
        db,
        bridge.clone(),
        config.expiry_policy(),
        config.sweep_interval(),
    ));

    match args.command.unwrap_or(cli::Command::Dash) {
        cli::Command::Dash => run_dash(cache, &args.bookmarks).await,
        cli::Command::Probe { domain } => run_probe(&cache, &bridge, &domain).await,
        cli::Command::Clear => {
            let removed = cache.clear().await?;
            println!("cleared {removed} cached icon entries");
            Ok(())
        }
    }
}

/// Resolve icons for every bookmark concurrently and render the rows in
/// file order.
async fn run_dash(cache: Arc<FaviconCache>, bookmarks_path: &Path) -> Result<()> {
    let bookmarks = bookmarks::load(bookmarks_path)?;
    if bookmarks.is_empty() {
        println!("no bookmarks in {}", bookmarks_path.display());
        return Ok(());
    }

    let mut tasks = tokio::task::JoinSet::new();
    for (idx, bookmark) in bookmarks.iter().cloned().enumerate() {
        let cache = cache.clone();
        tasks.spawn(async move {
            let resolved = match domain_of(&bookmark.url) {
                Some(domain) => cache.resolve_favicon(&domain, &bookmark.url).await,
                None => None,
            };
            (idx, dashboard::bind(&bookmark.title, resolved))
        });
    }

    let mut bindings = Vec::with_capacity(bookmarks.len());
    while let Some(joined) = tasks.join_next().await {
        // a row dropped mid-resolution is skipped, not an error
        if let Ok(binding) = joined {
            bindings.push(binding);
        }
    }
    bindings.sort_by_key(|(idx, _)| *idx);

    for (idx, binding) in &bindings {
        println!("{}", dashboard::render_line(&bookmarks[*idx], binding));
    }

    Ok(())
}

/// Diagnostic walk of the candidate list for a single domain.
async fn run_probe(cache: &FaviconCache, bridge: &bridge::BridgeHandle, domain: &str) -> Result<()> {
    match bridge.test_network().await {
        Ok(()) => println!("network: ok"),
        Err(e) => println!("network: {e}"),
    }

    match cache.probe_domain(domain).await {
        Some((url, data)) => println!("{domain}: resolved via {url} ({} bytes inline)", data.len()),
        None => println!("{domain}: no candidate produced an icon"),
    }

    Ok(())
}
