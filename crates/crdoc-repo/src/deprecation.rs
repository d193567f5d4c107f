//! "Deprecated since" lookup across releases

use crdoc_core::{Manifest, Release, ReleaseRegistry};
use futures::StreamExt;

use crate::manifest::ManifestLoader;
use crate::source::DocumentSource;

/// Default number of manifests fetched ahead of the scan
pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Finds the oldest release whose manifest marks a resource version deprecated
#[derive(Clone, Copy)]
pub struct DeprecationScanner<'a> {
    loader: ManifestLoader<'a>,
    concurrency: usize,
}

impl<'a> DeprecationScanner<'a> {
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self {
            loader: ManifestLoader::new(source),
            concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Number of manifests fetched ahead (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Label of the oldest release deprecating `name`/`version`, if any
    ///
    /// The manifest already loaded for `current_release` is reused rather than
    /// fetched again.
    pub async fn scan_deprecated_since(
        &self,
        name: &str,
        version: &str,
        registry: &ReleaseRegistry,
        current_release: &str,
        current_manifest: &Manifest,
    ) -> Option<String> {
        let loader = self.loader;
        let manifests = futures::stream::iter(registry.oldest_first())
            .map(|release| async move {
                if release.name == current_release {
                    ScannedManifest::Current(release)
                } else {
                    ScannedManifest::Loaded(release, loader.load(&release.folder).await)
                }
            })
            .buffered(self.concurrency);
        futures::pin_mut!(manifests);

        while let Some(scanned) = manifests.next().await {
            let (release, manifest) = match &scanned {
                ScannedManifest::Current(release) => (*release, current_manifest),
                ScannedManifest::Loaded(release, manifest) => (*release, manifest),
            };

            if manifest.is_deprecated(name, version) {
                tracing::debug!(
                    "{}/{} deprecated since release {}",
                    name,
                    version,
                    release.name
                );
                return Some(release.display_label().to_string());
            }
        }

        None
    }
}

enum ScannedManifest<'r> {
    Current(&'r Release),
    Loaded(&'r Release, Manifest),
}
