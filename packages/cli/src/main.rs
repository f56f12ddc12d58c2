mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, canonicalize, init, merge, poll, status, submit, BlocksArgs, CanonicalizeArgs,
    InitArgs, MergeArgs, PollArgs, StatusArgs, SubmitArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Pagedraft CLI - Edit generated pages against a moving repository
#[derive(Parser, Debug)]
#[command(name = "pagedraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a pagedraft.config.json
    Init(InitArgs),

    /// List the main-region blocks of a page with their identities
    Blocks(BlocksArgs),

    /// Re-serialize a page in canonical form
    Canonicalize(CanonicalizeArgs),

    /// Merge an edit log onto a page
    Merge(MergeArgs),

    /// Show pages with unsubmitted edits
    Status(StatusArgs),

    /// Submit staged edits as a change request
    Submit(SubmitArgs),

    /// Check a change request
    Poll(PollArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => exit_with(err.into()),
    };
    let config = Config::load(&cwd).unwrap_or_else(|err| exit_with(err));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = ?config, "Loaded configuration");

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Blocks(args) => blocks(args),
        Command::Canonicalize(args) => canonicalize(args),
        Command::Merge(args) => merge(args),
        Command::Status(args) => status(args, &cwd),
        Command::Submit(args) => submit(args, &cwd).await,
        Command::Poll(args) => poll(args, &cwd).await,
    };

    if let Err(err) = result {
        exit_with(err);
    }
}

fn exit_with(err: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("{} {}", "Error:".red().bold(), err);
    eprintln!();
    std::process::exit(1);
}
