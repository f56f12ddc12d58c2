use super::report_consistency;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CanonicalizeArgs {
    /// Page to canonicalize
    pub file: PathBuf,

    /// Rewrite the file in place instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

pub fn canonicalize(args: CanonicalizeArgs) -> Result<()> {
    let document = std::fs::read_to_string(&args.file)?;
    let canonical = pagedraft_editor::canonicalize(&document)?;
    report_consistency(&canonical.report);

    if !args.write {
        print!("{}", canonical.document);
        return Ok(());
    }

    if canonical.document == document {
        println!("  {} {} already canonical", "✓".green(), args.file.display());
    } else {
        std::fs::write(&args.file, &canonical.document)?;
        println!("  {} {} rewritten", "✓".green(), args.file.display());
    }
    Ok(())
}
