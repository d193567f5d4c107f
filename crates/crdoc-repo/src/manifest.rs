//! Manifest loading
//!
//! A missing manifest is normal (older releases never had one), so loading
//! never fails: every failure degrades to an empty manifest and a warning.

use crdoc_core::Manifest;

use crate::source::{DocumentSource, join_path};

/// File name of the per-release manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Loads release manifests from a document source
#[derive(Clone, Copy)]
pub struct ManifestLoader<'a> {
    source: &'a dyn DocumentSource,
}

impl<'a> ManifestLoader<'a> {
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self { source }
    }

    /// Path of a release folder's manifest
    pub fn manifest_path(folder: &str) -> String {
        join_path(&[folder, MANIFEST_FILE])
    }

    /// Load `<folder>/manifest.json`, or an empty manifest if it cannot be read
    pub async fn load(&self, folder: &str) -> Manifest {
        let path = Self::manifest_path(folder);

        let text = match self.source.fetch(&path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Manifest unavailable at {}: {}", path, e);
                return Manifest::empty();
            }
        };

        match Manifest::from_json(&text) {
            Ok(manifest) => {
                tracing::debug!("Loaded manifest {} ({} resources)", path, manifest.len());
                manifest
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable manifest {}: {}", path, e);
                Manifest::empty()
            }
        }
    }
}
