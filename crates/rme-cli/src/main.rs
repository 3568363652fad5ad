use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use rme_job::{ConfirmationGate, JobCoordinator};

mod bootstrap;
mod cli;
mod progress;
mod reddit;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("rme error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = bootstrap::load_config()?;
    config.reddit.require_credentials()?;
    let options = bootstrap::job_options(&cli, &config)?;

    let coordinator = JobCoordinator::create(options).context("failed to create job")?;
    println!("Job ID: {}", coordinator.id());

    let login = reddit::Login::from_cli(&cli, &config.reddit)?;
    let progress = progress::JobProgress::new(!cli.quiet && std::io::stdout().is_terminal());
    let mut gate = ConfirmationGate::new(std::io::stdin().lock(), std::io::stdout());

    let summary = coordinator.run(login, &mut gate, &progress).await?;

    if summary.archive.failed() + summary.mutate.failed() > 0 {
        eprintln!(
            "{} comment(s) could not be archived and {} could not be edited; see the log above.",
            summary.archive.failed(),
            summary.mutate.failed()
        );
    }
    println!(
        "Done! You can find the edited comments in the {}/ directory",
        summary.workspace.display()
    );
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("RME_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
