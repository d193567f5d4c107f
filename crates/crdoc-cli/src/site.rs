//! Documentation site options shared by the subcommands

use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crdoc_core::{ReleaseRegistry, ResourceCatalog};
use crdoc_repo::{DEFAULT_SCAN_CONCURRENCY, DocumentSource, ResourcePageLoader, create_source};

use crate::error::{CliError, Result};

/// Where the catalog, release configuration and documents live
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Static resource catalog (YAML or JSON)
    #[arg(long, env = "CRDOC_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Release configuration (YAML or JSON)
    #[arg(long, env = "CRDOC_RELEASES", global = true)]
    pub releases: Option<PathBuf>,

    /// Base URL or directory serving manifests and resource documents
    #[arg(long, env = "CRDOC_SOURCE", global = true)]
    pub source: Option<String>,

    /// Release manifests fetched ahead during the deprecation scan
    #[arg(
        long,
        env = "CRDOC_SCAN_CONCURRENCY",
        default_value_t = DEFAULT_SCAN_CONCURRENCY,
        global = true
    )]
    pub scan_concurrency: usize,
}

impl SiteArgs {
    /// Load the resource catalog
    pub fn load_catalog(&self) -> Result<ResourceCatalog> {
        let path = required(self.catalog.as_deref(), "--catalog", "CRDOC_CATALOG")?;
        let catalog = ResourceCatalog::load_from(path)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded catalog {} ({} resources)", path.display(), catalog.len());
        Ok(catalog)
    }

    /// Load the release registry
    pub fn load_releases(&self) -> Result<ReleaseRegistry> {
        let path = required(self.releases.as_deref(), "--releases", "CRDOC_RELEASES")?;
        let releases = ReleaseRegistry::load_from(path)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded {} releases from {}", releases.len(), path.display());
        Ok(releases)
    }

    /// Open the document source
    pub fn open_source(&self) -> Result<Arc<dyn DocumentSource>> {
        let location = self.source.as_deref().ok_or_else(|| missing("--source", "CRDOC_SOURCE"))?;
        Ok(create_source(location)?)
    }

    /// Build a page loader over the whole site
    pub fn page_loader(&self) -> Result<ResourcePageLoader> {
        let catalog = self.load_catalog()?;
        let releases = self.load_releases()?;
        let source = self.open_source()?;

        Ok(
            ResourcePageLoader::new(Arc::new(catalog), Arc::new(releases), source)
                .with_scan_concurrency(self.scan_concurrency),
        )
    }
}

fn required<'a>(path: Option<&'a Path>, flag: &str, env: &str) -> Result<&'a Path> {
    path.ok_or_else(|| missing(flag, env))
}

fn missing(flag: &str, env: &str) -> CliError {
    CliError::config_with_help(
        format!("{} is not set", flag),
        format!("Pass {} or set {}", flag, env),
    )
}
