use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::plugins::builtin_registry;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_migrate::{try_migrate, MigrationContext};
use folio_model::{DocumentStats, Row};
use folio_registry::{scope_children, PluginRegistry};
use folio_renderer::resolve_data;
use serde_json::Value;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Files or directories to check (defaults to the current directory)
    pub paths: Vec<PathBuf>,

    /// Fail when a document references a plugin that is not installed
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of checking one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileReport {
    Ok {
        stats: DocumentStats,
        missing_plugins: Vec<String>,
    },
    Failed(String),
}

impl FileReport {
    fn passes(&self, strict: bool) -> bool {
        match self {
            FileReport::Ok { missing_plugins, .. } => !strict || missing_plugins.is_empty(),
            FileReport::Failed(_) => false,
        }
    }
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = builtin_registry();

    let roots = if args.paths.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        args.paths.clone()
    };

    let files = find_documents(&roots);
    if files.is_empty() {
        println!("{} No documents found", "⚠️".yellow());
        return Ok(());
    }

    println!("{}", "🔍 Checking documents...".bright_blue().bold());

    let mut failures = 0;
    for file in &files {
        let report = check_file(file, &registry, &config);
        print_report(file, &report);
        if !report.passes(args.strict) {
            failures += 1;
        }
    }

    println!();
    if failures > 0 {
        return Err(anyhow!("{} of {} documents failed", failures, files.len()));
    }
    println!(
        "{}",
        format!("✅ {} documents passed", files.len()).green().bold()
    );
    Ok(())
}

/// Collect `.json` files under `roots`, skipping the config file
pub fn find_documents(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = roots
        .iter()
        .flat_map(|root| WalkDir::new(root).into_iter().filter_map(|e| e.ok()))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .filter(|path| path.file_name() != Some(OsStr::new(DEFAULT_CONFIG_NAME)))
        .collect();

    files.sort();
    files.dedup();
    files
}

pub fn check_file(path: &Path, registry: &PluginRegistry, config: &Config) -> FileReport {
    let value: Value = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|source| serde_json::from_str(&source).map_err(|e| e.to_string()))
    {
        Ok(value) => value,
        Err(error) => return FileReport::Failed(error),
    };

    let lang = config.default_lang();
    let ctx = MigrationContext::new(registry, lang).with_languages(&config.languages);
    match try_migrate(&value, &ctx) {
        Ok(document) => {
            let stats = DocumentStats::collect(&document);
            let mut missing_plugins = Vec::new();
            collect_unresolved(&document.rows, registry, lang, &mut missing_plugins);
            debug!(path = %path.display(), cells = stats.cells, "Checked document");
            FileReport::Ok {
                stats,
                missing_plugins,
            }
        }
        Err(error) => FileReport::Failed(error.to_string()),
    }
}

/// Plugin ids that do not resolve in the registry scoped by their ancestors
fn collect_unresolved(rows: &[Row], registry: &PluginRegistry, lang: &str, missing: &mut Vec<String>) {
    for cell in rows.iter().flat_map(|row| &row.cells) {
        let Some(plugin_ref) = &cell.plugin else {
            collect_unresolved(&cell.rows, registry, lang, missing);
            continue;
        };

        match registry.resolve(&plugin_ref.id) {
            Some(plugin) => {
                let scoped = scope_children(registry, &plugin.id, &resolve_data(cell, lang));
                collect_unresolved(&cell.rows, &scoped, lang, missing);
            }
            None => {
                if !missing.contains(&plugin_ref.id) {
                    missing.push(plugin_ref.id.clone());
                }
                collect_unresolved(&cell.rows, registry, lang, missing);
            }
        }
    }
}

fn print_report(path: &Path, report: &FileReport) {
    match report {
        FileReport::Ok {
            stats,
            missing_plugins,
        } => {
            println!(
                "  {} {} ({} rows, {} cells, depth {})",
                "✓".green(),
                path.display(),
                stats.rows,
                stats.cells,
                stats.max_depth
            );
            for id in missing_plugins {
                println!("    {} Missing plugin {}", "⚠️".yellow(), id.bright_white());
            }
        }
        FileReport::Failed(error) => {
            println!("  {} {}: {}", "✗".red(), path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-check-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_find_documents_skips_config_and_other_files() {
        let dir = scratch_dir("find");
        std::fs::write(dir.join("a.json"), "{}").unwrap();
        std::fs::write(dir.join("nested/b.json"), "{}").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();
        std::fs::write(Config::path_in(&dir), "{}").unwrap();

        let files = find_documents(&[dir.clone()]);
        assert_eq!(files, vec![dir.join("a.json"), dir.join("nested/b.json")]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_file_reports_stats_and_missing_plugins() {
        let dir = scratch_dir("report");
        let path = dir.join("page.json");
        let document = json!({
            "version": 2,
            "rows": [{
                "id": "r",
                "cells": [
                    { "id": "a", "size": 6, "plugin": { "id": "text", "version": "1", "dataI18n": { "en": { "text": "Hi" } } } },
                    { "id": "b", "size": 6, "plugin": { "id": "chart", "version": "1", "dataI18n": {} } }
                ]
            }]
        });
        std::fs::write(&path, document.to_string()).unwrap();

        match check_file(&path, &builtin_registry(), &Config::default()) {
            FileReport::Ok {
                stats,
                missing_plugins,
            } => {
                assert_eq!(stats.cells, 2);
                assert_eq!(missing_plugins, vec!["chart"]);
            }
            FileReport::Failed(error) => panic!("unexpected failure: {}", error),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_file_reports_plugins_excluded_by_parent() {
        let dir = scratch_dir("scoped");
        let path = dir.join("page.json");
        let document = json!({
            "version": 2,
            "rows": [{
                "id": "r",
                "cells": [{
                    "id": "bg",
                    "plugin": { "id": "background", "data": { "textOnly": true } },
                    "rows": [{ "id": "n", "cells": [
                        { "id": "t", "plugin": { "id": "text", "version": "1" } },
                        { "id": "i", "plugin": { "id": "image" } }
                    ] }]
                }]
            }]
        });
        std::fs::write(&path, document.to_string()).unwrap();

        let report = check_file(&path, &builtin_registry(), &Config::default());
        match &report {
            FileReport::Ok { missing_plugins, .. } => assert_eq!(missing_plugins, &vec!["image"]),
            FileReport::Failed(error) => panic!("unexpected failure: {}", error),
        }
        assert!(report.passes(false));
        assert!(!report.passes(true));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_check_file_rejects_invalid_json() {
        let dir = scratch_dir("invalid");
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let report = check_file(&path, &builtin_registry(), &Config::default());
        assert!(matches!(report, FileReport::Failed(_)));
        assert!(!report.passes(false));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
