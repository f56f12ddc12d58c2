use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Root of the generated site
    #[arg(short, long, default_value = ".")]
    pub baseline_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config {
        baseline_dir: args.baseline_dir,
        ..Config::default()
    };

    let store_dir = config.store_dir(cwd);
    if !store_dir.exists() {
        fs::create_dir_all(&store_dir)?;
        println!("  {} Created {}/", "✓".green(), config.store_dir);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)? + "\n")?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let args = || InitArgs {
            baseline_dir: "public".to_string(),
            force: false,
        };

        init(args(), dir.path()).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.baseline_dir, "public");
        assert!(dir.path().join(".pagedraft").is_dir());

        // Existing config is left alone without --force
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{}").unwrap();
        init(args(), dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(DEFAULT_CONFIG_NAME)).unwrap(),
            "{}"
        );
    }
}
