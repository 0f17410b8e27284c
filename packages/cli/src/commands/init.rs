use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Supported languages, first is the default
    #[arg(short, long, value_delimiter = ',', default_value = "en")]
    pub languages: Vec<String>,

    /// Grid column count
    #[arg(short, long)]
    pub columns: Option<u32>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = Config::path_in(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio project...".bright_blue().bold());

    let mut config = Config {
        languages: args.languages,
        ..Config::default()
    };
    if let Some(columns) = args.columns {
        config.columns = columns;
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: folio check");
    println!("  2. Run: folio render page.json -o page.html");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = std::env::temp_dir().join(format!("folio-init-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let args = InitArgs {
            languages: vec!["de".to_string(), "en".to_string()],
            columns: Some(24),
            force: false,
        };
        init(args, &dir).unwrap();

        let config = Config::load(&dir).unwrap();
        assert_eq!(config.default_lang(), "de");
        assert_eq!(config.columns, 24);

        // Existing config is kept without --force
        let args = InitArgs {
            languages: vec!["fr".to_string()],
            columns: None,
            force: false,
        };
        init(args, &dir).unwrap();
        assert_eq!(Config::load(&dir).unwrap().default_lang(), "de");

        fs::remove_dir_all(&dir).unwrap();
    }
}
