use super::{read_document, to_json, write_output};
use crate::config::Config;
use crate::plugins::builtin_registry;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use folio_migrate::{try_migrate, MigrateError, MigrationContext};
use folio_renderer::{render_document, to_html, EditState, HtmlOptions, RenderMode, RenderOptions, RenderTree};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document to render (`-` reads stdin)
    pub input: PathBuf,

    /// Language to render (defaults to the configured default language)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Render with edit affordances
    #[arg(long)]
    pub editable: bool,

    /// Cell to focus (implies --editable)
    #[arg(long)]
    pub focus: Option<String>,

    /// Editor preview mode (implies --editable)
    #[arg(long)]
    pub preview: bool,

    /// Grid column count (overrides config)
    #[arg(long)]
    pub columns: Option<u32>,

    /// Disable pretty printing
    #[arg(long)]
    pub compact: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(columns) = args.columns {
        config.columns = columns;
    }

    let options = config.render_options(builtin_registry());
    let lang = args.lang.as_deref().unwrap_or(config.default_lang());
    if !options.supports_lang(lang) {
        eprintln!(
            "{} Language {} is not listed in the config",
            "⚠️".yellow(),
            lang.bright_white()
        );
    }

    let mode = if args.editable || args.focus.is_some() || args.preview {
        RenderMode::Editable(EditState {
            focused: args.focus.clone(),
            preview: args.preview,
        })
    } else {
        RenderMode::ReadOnly
    };

    let value = read_document(&args.input)?;
    let tree = match render_input(&value, &options, lang, &mode) {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!(
                "{} {} has no renderable content: {}",
                "⚠️".yellow(),
                args.input.display(),
                error
            );
            RenderTree::default()
        }
    };

    let content = match args.format {
        OutputFormat::Html => {
            let html = if args.compact {
                HtmlOptions::compact()
            } else {
                HtmlOptions::default()
            };
            to_html(&tree, &html)
        }
        OutputFormat::Json => to_json(&tree.nodes, args.compact)?,
    };
    write_output(args.output.as_deref(), &content)?;

    if let Some(output) = &args.output {
        eprintln!(
            "  {} {} → {} ({} rows, {} edit surfaces)",
            "✓".green(),
            args.input.display(),
            output.display(),
            tree.nodes.len(),
            tree.surfaces.len()
        );
    }
    Ok(())
}

/// Migrate and render; an empty page is a valid, empty tree
fn render_input(
    value: &Value,
    options: &RenderOptions,
    lang: &str,
    mode: &RenderMode,
) -> Result<RenderTree, MigrateError> {
    let ctx = MigrationContext::new(&options.registry, lang).with_languages(&options.languages);
    let document = try_migrate(value, &ctx)?;
    Ok(render_document(&document, options, lang, mode))
}
