//! Multi-release resource/version resolution
//!
//! Maps a `(resource, version, release?)` request to the metadata and schema
//! document to render:
//!
//! 1. pick the release (requested, else default, else newest)
//! 2. load its manifest (absence tolerated)
//! 3. take resource metadata from the manifest, falling back to the catalog
//! 4. check the version is declared
//! 5. list valid versions, preferring what the release actually ships
//! 6. fetch the document from the release folder, falling back to the legacy
//!    `resources/` folder

use crdoc_core::{
    CoreError, Manifest, Release, ReleaseRegistry, ResourceCatalog, ResourceDocument,
    ResourceEntry, ResourceVersion, VersionSchemas,
};

use crate::error::{RepoError, Result};
use crate::manifest::ManifestLoader;
use crate::source::{DocumentSource, join_path};

/// Folder documents lived in before releases got folders of their own
pub const LEGACY_FOLDER: &str = "resources";

/// Where resource metadata came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSource {
    Manifest,
    Catalog,
}

/// Steps 1-5 of a resolution: everything but the document
#[derive(Debug, Clone)]
pub struct ResolvedMeta {
    /// Selected release
    pub release: Release,
    /// Manifest of the selected release (possibly empty)
    pub manifest: Manifest,
    /// Resource metadata
    pub crd_meta: ResourceEntry,
    /// The requested version's metadata
    pub crd_meta_version: ResourceVersion,
    /// Versions selectable for this resource
    pub valid_versions: Vec<String>,
    /// Where `crd_meta` came from
    pub meta_source: MetaSource,
}

impl ResolvedMeta {
    /// Resource name
    pub fn name(&self) -> &str {
        &self.crd_meta.name
    }

    /// Version on focus
    pub fn version(&self) -> &str {
        &self.crd_meta_version.name
    }
}

/// A fetched and parsed resource document
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Path the document was found at
    pub path: String,
    pub document: ResourceDocument,
    /// Schemas of the requested version
    pub schemas: VersionSchemas,
}

/// A complete resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub meta: ResolvedMeta,
    pub document: FetchedDocument,
}

/// Candidate document paths, in the order they are tried
pub fn document_candidates(folder: &str, name: &str, version: &str) -> Vec<String> {
    let file = format!("{}.yaml", version);
    let mut candidates = vec![join_path(&[folder, name, &file])];

    let legacy = join_path(&[LEGACY_FOLDER, name, &file]);
    if !candidates.contains(&legacy) {
        candidates.push(legacy);
    }
    candidates
}

/// Canonical page path of a resource version
pub fn canonical_path(name: &str, version: &str, release: Option<&str>) -> String {
    match release {
        Some(release) => {
            let encoded: String = url::form_urlencoded::byte_serialize(release.as_bytes()).collect();
            format!("/{}/{}?release={}", name, version, encoded)
        }
        None => format!("/{}/{}", name, version),
    }
}

/// Resolves resources against the catalog, the release registry and the
/// document source
#[derive(Clone, Copy)]
pub struct VersionResolver<'a> {
    catalog: &'a ResourceCatalog,
    releases: &'a ReleaseRegistry,
    source: &'a dyn DocumentSource,
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        catalog: &'a ResourceCatalog,
        releases: &'a ReleaseRegistry,
        source: &'a dyn DocumentSource,
    ) -> Self {
        Self {
            catalog,
            releases,
            source,
        }
    }

    fn loader(&self) -> ManifestLoader<'a> {
        ManifestLoader::new(self.source)
    }

    /// Resolve a resource version and fetch its document
    pub async fn resolve(
        &self,
        name: &str,
        version: &str,
        release: Option<&str>,
    ) -> Result<Resolution> {
        let meta = self.resolve_meta(name, version, release).await?;
        let document = self.fetch_document(&meta).await?;
        Ok(Resolution { meta, document })
    }

    /// Resolve metadata only (steps 1-5)
    pub async fn resolve_meta(
        &self,
        name: &str,
        version: &str,
        release: Option<&str>,
    ) -> Result<ResolvedMeta> {
        let (release, manifest, crd_meta, meta_source) = self.resource_meta(name, release).await?;

        let mut crd_meta_version = crd_meta.version(version).cloned().ok_or_else(|| {
            RepoError::InvalidVersion {
                name: name.to_string(),
                version: version.to_string(),
            }
        })?;
        // manifests do not record app versions
        if crd_meta_version.app_version.is_none() && meta_source == MetaSource::Manifest {
            crd_meta_version.app_version = self.catalog_app_version(name, version);
        }

        let valid_versions = manifest
            .get(name)
            .unwrap_or(&crd_meta)
            .version_names();

        tracing::debug!(
            "Resolved {}/{} in release {} from {:?}",
            name,
            version,
            release.name,
            meta_source
        );

        Ok(ResolvedMeta {
            release,
            manifest,
            crd_meta,
            crd_meta_version,
            valid_versions,
            meta_source,
        })
    }

    async fn resource_meta(
        &self,
        name: &str,
        requested: Option<&str>,
    ) -> Result<(Release, Manifest, ResourceEntry, MetaSource)> {
        let release = self.releases.selected(requested).clone();
        let manifest = self.loader().load(&release.folder).await;

        if let Some(entry) = manifest.unique(name) {
            let entry = entry.clone();
            return Ok((release, manifest, entry, MetaSource::Manifest));
        }
        if manifest.count(name) > 1 {
            tracing::warn!(
                "Manifest of release {} lists {} more than once, using the catalog",
                release.name,
                name
            );
        }

        match self.catalog.lookup_resource(name) {
            Ok(Some(entry)) => {
                let entry = entry.clone();
                Ok((release, manifest, entry, MetaSource::Catalog))
            }
            Ok(None) => Err(RepoError::InvalidResourceName {
                name: name.to_string(),
            }),
            Err(CoreError::DuplicateResource { count, group, .. }) => {
                tracing::error!(
                    "Catalog integrity error: {} is declared {} times in group {}",
                    name,
                    count,
                    group
                );
                Err(RepoError::AmbiguousResource {
                    name: name.to_string(),
                    count,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn catalog_app_version(&self, name: &str, version: &str) -> Option<String> {
        self.catalog
            .lookup_resource(name)
            .ok()
            .flatten()?
            .version(version)?
            .app_version
            .clone()
    }

    /// Fetch the document of a resolved version (step 6)
    ///
    /// Candidates are tried in order; the first one that can be fetched and
    /// carries the requested version's schemas wins.
    pub async fn fetch_document(&self, meta: &ResolvedMeta) -> Result<FetchedDocument> {
        let name = meta.name();
        let version = meta.version();
        let candidates = document_candidates(&meta.release.folder, name, version);

        for (attempt, path) in candidates.iter().enumerate() {
            if attempt > 0 {
                tracing::warn!("Falling back to {} for {}/{}", path, name, version);
            }

            let text = match self.source.fetch(path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("Document fetch failed for {}: {}", path, e);
                    continue;
                }
            };

            let document = match ResourceDocument::parse(&text) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Unreadable document at {}: {}", path, e);
                    continue;
                }
            };

            match document.schemas_for(version) {
                Some(schemas) => {
                    return Ok(FetchedDocument {
                        path: path.clone(),
                        document,
                        schemas,
                    });
                }
                None => {
                    tracing::warn!("Document at {} has no version {}", path, version);
                }
            }
        }

        Err(RepoError::DocumentFetchFailure {
            name: name.to_string(),
            version: version.to_string(),
            attempts: candidates,
        })
    }

    /// Canonical path a version-less request redirects to: the resource's
    /// first declared version
    pub async fn redirect_target(&self, name: &str, release: Option<&str>) -> Result<String> {
        let (selected, _, crd_meta, _) = self.resource_meta(name, release).await?;

        let first = crd_meta
            .first_version()
            .ok_or_else(|| RepoError::InvalidResourceName {
                name: name.to_string(),
            })?;

        let keep_release = release.filter(|r| *r == selected.name);
        Ok(canonical_path(name, &first.name, keep_release))
    }
}
