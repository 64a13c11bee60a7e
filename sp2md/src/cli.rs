//! CLI glue for sp2md: argument parsing, config resolution, the interactive
//! site URL prompt, and printing the run summary.
//!
//! All export logic lives in `sp2md-core`. [`run`] is the async entrypoint
//! used by `main` and by the integration tests.

use crate::load_config::{load_config, merge, FileConfig, Overrides};
use crate::report::render;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sp2md_core::convert::HtmlConverter;
use sp2md_core::fetch::HttpAssetFetcher;
use sp2md_core::sharepoint::SharePointClient;
use sp2md_core::{ExportConfig, PostExporter};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const SITE_URL_PROMPT: &str = "Site URL (eg. https://sharepointserver.your.domain): ";

/// CLI for sp2md: export a SharePoint Posts list to Wiki.js markdown.
#[derive(Parser, Debug)]
#[clap(
    name = "sp2md",
    version,
    about = "Export SharePoint blog posts and their images to Wiki.js markdown files"
)]
pub struct Cli {
    /// Log progress (info level) to stderr
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every post of the list (the default when no subcommand is given)
    Export(ExportArgs),
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct ExportArgs {
    /// Path to an optional YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// SharePoint site URL; prompted for when not given here or in the config
    #[clap(long)]
    pub site_url: Option<String>,

    /// Directory the markdown files and assets are written to
    #[clap(long)]
    pub export_dir: Option<PathBuf>,
}

async fn prompt_site_url() -> Result<String> {
    print!("{SITE_URL_PROMPT}");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read site URL from stdin")?;
    let url = line.trim().to_string();
    if url.is_empty() {
        anyhow::bail!("No site URL given");
    }
    Ok(url)
}

async fn resolve_config(args: ExportArgs) -> Result<ExportConfig> {
    let file = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let (site_url, mut config) = merge(
        file,
        Overrides {
            site_url: args.site_url,
            export_dir: args.export_dir,
        },
    );
    if site_url.is_none() {
        config.site_url = prompt_site_url().await?;
    }
    config.trace_loaded();
    Ok(config)
}

async fn export(config: ExportConfig) -> Result<()> {
    let http = config.http_settings();
    let source = SharePointClient::new(&config.site_url, &config.list_title, &http)?;
    let fetcher = HttpAssetFetcher::new(&http)?;

    // Ctrl-C stops the run after the post in flight.
    let stop = Arc::new(AtomicBool::new(false));
    let signal_token = Arc::clone(&stop);
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current post");
            signal_token.store(true, Ordering::Relaxed);
        }
    });

    let exporter = PostExporter::new(&config.site_url, &config.export_dir, fetcher, config.timeout())
        .with_stop_token(stop);
    let result = sp2md_core::run(&source, &HtmlConverter::new(), &exporter).await;
    signal_task.abort();

    let report = result?;
    print!("{}", render(&report, &config.export_dir));
    println!("\nEnd.");
    Ok(())
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let args = match cli.command {
        Some(Commands::Export(args)) => args,
        None => ExportArgs::default(),
    };

    let result = match resolve_config(args).await {
        Ok(config) => export(config).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(()) => tracing::info!(command = "export", "Export complete"),
        Err(e) => {
            tracing::error!(command = "export", error = %e, "Export failed");
            eprintln!("[ERROR] {e:#}");
        }
    }
    result
}
