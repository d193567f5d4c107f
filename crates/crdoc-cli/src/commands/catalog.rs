//! Catalog commands

use console::style;
use std::path::{Path, PathBuf};

use crdoc_core::ResourceCatalog;

use crate::error::{CliError, Result};

/// Merge catalogs, later files taking precedence, and write the result as YAML
pub fn merge(files: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let Some((first, rest)) = files.split_first() else {
        return Err(CliError::usage("At least one catalog file is required"));
    };

    let mut merged = load(first)?;
    for file in rest {
        merged.merge(load(file)?);
    }

    let yaml = merged.to_yaml()?;
    match output {
        Some(path) => {
            std::fs::write(path, yaml)?;
            eprintln!(
                "{} Merged {} catalogs ({} resources) into {}",
                style("✓").green(),
                files.len(),
                merged.len(),
                path.display()
            );
        }
        None => print!("{}", yaml),
    }

    Ok(())
}

fn load(path: &Path) -> Result<ResourceCatalog> {
    ResourceCatalog::load_from(path)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
}
