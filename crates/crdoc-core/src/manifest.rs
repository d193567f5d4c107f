//! Per-release manifest
//!
//! Each release folder may carry a `manifest.json` listing the resources that
//! ship in that release and the deprecation state of their versions. Older
//! releases have none; an absent manifest is simply empty.

use serde::{Deserialize, Serialize};

use crate::catalog::{ResourceEntry, ResourceVersion};
use crate::error::Result;

/// Resources shipped in one release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ResourceEntry>,
}

impl Manifest {
    /// Create a manifest from entries
    pub fn new(entries: Vec<ResourceEntry>) -> Self {
        Self { entries }
    }

    /// An empty manifest
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a manifest from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All entries, in manifest order
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Number of entries named `name`
    pub fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.name == name).count()
    }

    /// The entry named `name`, if exactly one exists
    pub fn unique(&self, name: &str) -> Option<&ResourceEntry> {
        let mut matches = self.entries.iter().filter(|e| e.name == name);
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Some(entry),
            _ => None,
        }
    }

    /// The first entry named `name`
    pub fn get(&self, name: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// A specific version of a resource
    pub fn version(&self, name: &str, version: &str) -> Option<&ResourceVersion> {
        self.get(name)?.version(version)
    }

    /// Whether the manifest marks `name`/`version` as deprecated
    pub fn is_deprecated(&self, name: &str, version: &str) -> bool {
        self.version(name, version).is_some_and(|v| v.deprecated)
    }

    /// Check if the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
