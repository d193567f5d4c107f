//! Release-aware resource resolution for crdoc
//!
//! This crate fetches release manifests and resource documents and turns a
//! page request into a rendered view:
//!
//! - **Document sources**: static HTTP sites, local directories, in-memory maps
//! - **Manifest loading**: per-release `manifest.json`, absence tolerated
//! - **Version resolution**: manifest-first metadata with catalog fallback,
//!   and a legacy document folder fallback
//! - **Deprecation scan**: oldest release marking a version deprecated
//! - **Pages**: route parsing, redirects and view assembly
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crdoc_core::{ReleaseRegistry, ResourceCatalog};
//! use crdoc_repo::{ResourcePageLoader, create_source};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ResourceCatalog::load_from("resources.yaml".as_ref())?;
//! let releases = ReleaseRegistry::load_from("releases.yaml".as_ref())?;
//! let source = create_source("https://docs.example.com")?;
//!
//! let loader = ResourcePageLoader::new(Arc::new(catalog), Arc::new(releases), source);
//! let view = loader.load_view("interfaces.interfaces.eda.nokia.com", "v1alpha1", None).await?;
//! println!("{} deprecated since {:?}", view.name, view.deprecated_since);
//! # Ok(())
//! # }
//! ```

pub mod deprecation;
pub mod error;
pub mod http;
pub mod manifest;
pub mod page;
pub mod resolver;
pub mod source;

// Re-exports for convenience
pub use deprecation::{DEFAULT_SCAN_CONCURRENCY, DeprecationScanner};
pub use error::{RepoError, Result};
pub use http::HttpSource;
pub use manifest::{MANIFEST_FILE, ManifestLoader};
pub use page::{PageResponse, PageRoute, ResolvedView, ResourcePageLoader};
pub use resolver::{
    FetchedDocument, LEGACY_FOLDER, MetaSource, Resolution, ResolvedMeta, VersionResolver,
    canonical_path, document_candidates,
};
pub use source::{DocumentSource, FileSource, MemorySource, SourceType, create_source, join_path};
