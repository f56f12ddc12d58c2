use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagedraft_editor::RequestState;
use pagedraft_workspace::{DirectoryBackend, JsonStorage, PageService};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Pages to submit (defaults to every page with edits)
    pub paths: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PollArgs {
    /// Request to check
    pub request_id: String,
}

fn service(cwd: &Path) -> Result<PageService<DirectoryBackend>> {
    let config = Config::load(cwd)?;
    let backend = DirectoryBackend::new(config.baseline_dir(cwd), config.outbox_dir(cwd));
    let storage = JsonStorage::new(config.store_dir(cwd));
    Ok(PageService::new(Arc::new(backend), storage)?)
}

pub async fn submit(args: SubmitArgs, cwd: &Path) -> Result<()> {
    let mut service = service(cwd)?;
    let paths = if args.paths.is_empty() {
        service
            .session()
            .store()
            .paths()
            .map(str::to_string)
            .collect()
    } else {
        args.paths
    };

    for path in &paths {
        service.open_page(path).await?;
    }
    let request = service.submit(&paths).await?;

    println!(
        "  {} Opened request #{} for {} page(s)",
        "✓".green(),
        request.request_id,
        paths.len()
    );
    println!("    {}", request.url.dimmed());
    Ok(())
}

pub async fn poll(args: PollArgs, cwd: &Path) -> Result<()> {
    let mut service = service(cwd)?;
    let state = service.poll(&args.request_id).await?;

    let label = match state {
        RequestState::Open => "open".yellow(),
        RequestState::Merged => "merged".green(),
        RequestState::Closed => "closed".red(),
    };
    println!("  Request #{} is {}", args.request_id, label);
    Ok(())
}
