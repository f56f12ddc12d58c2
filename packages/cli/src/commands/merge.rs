use super::report_consistency;
use anyhow::{Context, Result};
use clap::Args;
use pagedraft_editor::{
    main_blocks, merge as merge_blocks, merged_blocks, render_document, EditLog, MergeOptions,
};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Baseline page
    pub file: PathBuf,

    /// Edit log as JSON
    #[arg(short, long)]
    pub log: PathBuf,

    /// Apply pending removals as a submission would
    #[arg(long)]
    pub commit: bool,
}

pub fn merge(args: MergeArgs) -> Result<()> {
    let document = std::fs::read_to_string(&args.file)?;
    let log: EditLog = serde_json::from_str(&std::fs::read_to_string(&args.log)?)
        .with_context(|| format!("Invalid edit log: {}", args.log.display()))?;

    let options = if args.commit {
        MergeOptions::commit()
    } else {
        MergeOptions::preview()
    };
    let baseline = main_blocks(&document)?;
    let merged = merge_blocks(&baseline, &log, options);
    let rendered = render_document(&document, &merged_blocks(&merged))?;

    report_consistency(&rendered.report);
    print!("{}", rendered.document);
    Ok(())
}
