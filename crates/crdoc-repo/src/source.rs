//! Document sources
//!
//! Manifests and resource documents are fetched by relative path
//! (`<folder>/manifest.json`, `<folder>/<name>/<version>.yaml`) from a
//! document source: a static HTTP site, a local directory, or an in-memory
//! map for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{RepoError, Result};
use crate::http::HttpSource;

/// Where documents are fetched from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Base location (URL or directory)
    fn location(&self) -> &str;

    /// Source type
    fn source_type(&self) -> SourceType;

    /// Fetch a document by path relative to the base location
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Source type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Static site served over HTTP(S)
    Http,

    /// Local directory
    File,

    /// In-memory documents
    Memory,
}

impl SourceType {
    /// Auto-detect source type from a location string
    pub fn detect(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(SourceType::Http)
        } else if location.starts_with("file://")
            || location.starts_with('/')
            || location.starts_with('.')
            || Path::new(location).is_dir()
        {
            Ok(SourceType::File)
        } else {
            Err(RepoError::InvalidSource {
                location: location.to_string(),
                reason: "location must start with http://, https://, file://, or be a directory"
                    .to_string(),
            })
        }
    }
}

/// Create a document source from a location string
pub fn create_source(location: &str) -> Result<Arc<dyn DocumentSource>> {
    match SourceType::detect(location)? {
        SourceType::Http => Ok(Arc::new(HttpSource::new(location)?)),
        SourceType::File => Ok(Arc::new(FileSource::new(location)?)),
        SourceType::Memory => Err(RepoError::InvalidSource {
            location: location.to_string(),
            reason: "memory sources cannot be created from a location".to_string(),
        }),
    }
}

/// Join path segments with `/`, ignoring empty segments and stray slashes
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

// ============ File Source ============

/// Documents under a local directory
pub struct FileSource {
    location: String,
    root: PathBuf,
}

impl FileSource {
    /// Open a directory (plain path or `file://` URL)
    pub fn new(location: impl Into<String>) -> Result<Self> {
        let location = location.into();
        let root = PathBuf::from(location.strip_prefix("file://").unwrap_or(&location));

        if !root.is_dir() {
            return Err(RepoError::InvalidSource {
                location,
                reason: "directory does not exist".to_string(),
            });
        }

        Ok(Self { location, root })
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RepoError::DocumentNotFound {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(RepoError::DocumentNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// ============ Memory Source ============

/// In-memory documents, useful for tests and embedding
#[derive(Clone, Default)]
pub struct MemorySource {
    documents: Arc<RwLock<HashMap<String, String>>>,
    /// Fetch attempts per path, for assertions
    fetches: Arc<RwLock<HashMap<String, usize>>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    pub fn with_document(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a document
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        let path = join_path(&[&path.into()]);
        self.documents
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path, content.into());
    }

    /// Number of fetch attempts for a path (found or not)
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&join_path(&[path]))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of fetch attempts
    pub fn total_fetches(&self) -> usize {
        self.fetches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .sum()
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn location(&self) -> &str {
        "memory://"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Memory
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let path = join_path(&[path]);
        *self
            .fetches
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(path.clone())
            .or_default() += 1;

        self.documents
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&path)
            .cloned()
            .ok_or(RepoError::DocumentNotFound { path })
    }
}
