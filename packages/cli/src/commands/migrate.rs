use super::{read_document, to_json, write_output};
use crate::config::Config;
use crate::plugins::builtin_registry;
use anyhow::{anyhow, Result};
use clap::Args;
use folio_layout::normalize as normalize_rows;
use folio_migrate::{try_migrate, MigrationContext};
use folio_model::Document;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Document to migrate (`-` reads stdin)
    pub input: PathBuf,

    /// Language that legacy single-language data is filed under
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Disable pretty printing
    #[arg(long)]
    pub compact: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub migrate: MigrateArgs,

    /// Grid column count (overrides config)
    #[arg(long)]
    pub columns: Option<u32>,
}

/// Print the canonical form of a document
pub fn migrate(args: MigrateArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_canonical(&args, &config)?;
    write_output(args.output.as_deref(), &to_json(&document, args.compact)?)
}

/// Print the canonical form with recomputed layout
pub fn normalize(args: NormalizeArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(columns) = args.columns {
        config.columns = columns;
    }

    let mut document = load_canonical(&args.migrate, &config)?;
    document.rows = normalize_rows(&document.rows, &config.layout());
    write_output(
        args.migrate.output.as_deref(),
        &to_json(&document, args.migrate.compact)?,
    )
}

fn load_canonical(args: &MigrateArgs, config: &Config) -> Result<Document> {
    let value = read_document(&args.input)?;
    let registry = builtin_registry();
    let lang = args.lang.as_deref().unwrap_or(config.default_lang());

    try_migrate(
        &value,
        &MigrationContext::new(&registry, lang).with_languages(&config.languages),
    )
    .map_err(|e| anyhow!("Cannot migrate {}: {}", args.input.display(), e))
}
