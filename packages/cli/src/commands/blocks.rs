use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagedraft_editor::main_blocks;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Page to inspect
    pub file: PathBuf,

    /// Print block HTML as well
    #[arg(long)]
    pub html: bool,
}

pub fn blocks(args: BlocksArgs) -> Result<()> {
    let document = std::fs::read_to_string(&args.file)?;
    let blocks = main_blocks(&document)?;

    println!(
        "{} {} main-region blocks",
        args.file.display().to_string().bright_white(),
        blocks.len()
    );
    for (index, block) in blocks.iter().enumerate() {
        println!(
            "  {:>3}  {}  {}  #{}",
            index,
            block.identity.cyan(),
            block.signature.dimmed(),
            block.occurrence
        );
        if args.html {
            println!("       {}", block.html);
        }
    }

    Ok(())
}
