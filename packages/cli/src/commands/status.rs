use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagedraft_workspace::JsonStorage;
use std::path::Path;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the dirty HTML of each page
    #[arg(long)]
    pub verbose: bool,
}

pub fn status(args: StatusArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let storage = JsonStorage::new(config.store_dir(cwd));
    let store = storage.load_store()?;
    let ledger = storage.load_ledger()?;

    if store.is_empty() {
        println!("{}", "No unsubmitted edits".dimmed());
    }

    for (path, entry) in store.entries() {
        let records = entry.edit_log.records();
        let pending = records.iter().filter(|r| r.is_pending()).count();
        println!(
            "  {} {}  {} staged, {} pending  (updated {})",
            "●".yellow(),
            path.bright_white(),
            records.len() - pending,
            pending,
            entry.updated_at.format("%Y-%m-%d %H:%M")
        );
        if args.verbose {
            println!("{}", entry.html);
        }
    }

    let open = ledger.open_requests();
    if !open.is_empty() {
        println!();
        println!("Open requests:");
        for request_id in open {
            println!(
                "  {} #{}  {}",
                "→".cyan(),
                request_id,
                ledger.request_paths(request_id).join(", ")
            );
        }
    }

    Ok(())
}
