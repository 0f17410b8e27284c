pub mod check;
pub mod init;
pub mod migrate;
pub mod render;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use migrate::{migrate, normalize, MigrateArgs, NormalizeArgs};
pub use render::{render, RenderArgs};

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Read a JSON document from a file, or from stdin when `path` is `-`
pub(crate) fn read_document(path: &Path) -> Result<Value> {
    let source = if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        source
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&source).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Write to a file, or to stdout without one
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{}", content.trim_end());
            Ok(())
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}
