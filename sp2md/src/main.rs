use anyhow::Result;
use clap::Parser;
use sp2md::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger(verbose: bool) {
    let default = if verbose {
        "sp2md=info,sp2md_core=info"
    } else {
        "sp2md=warn,sp2md_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logger(cli.verbose);
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let result = run(cli).await;
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
