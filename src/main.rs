mod auth;
mod cli;
mod config;
mod error;
mod git;
mod identity;
mod output;
mod providers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    output::print_banner();

    info!("Starting glpipeline - GitLab pipeline trigger");
    cli.execute().await?;

    Ok(())
}

/// `RUST_LOG` wins over `--verbose`/`--debug` when set.
fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("warn,glpipeline={level}")),
    )
    .init();
}
