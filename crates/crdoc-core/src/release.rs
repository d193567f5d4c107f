//! Product releases
//!
//! The release configuration lists every published release of the product,
//! newest first. Each release keeps its manifest and resource documents under
//! its own folder.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Release configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Configured releases, newest first
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Release definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Unique name (used in `?release=` selectors)
    pub name: String,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Folder holding `manifest.json` and `<name>/<version>.yaml` documents
    pub folder: String,

    /// Whether this release is shown when none is requested
    #[serde(default)]
    pub default: bool,
}

impl Release {
    /// Create a release
    pub fn new(name: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            folder: folder.into(),
            default: false,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark as the default release
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Label for display, falling back to the name
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Ordered, non-empty list of releases (newest first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReleaseConfig", into = "ReleaseConfig")]
pub struct ReleaseRegistry {
    releases: Vec<Release>,
}

impl TryFrom<ReleaseConfig> for ReleaseRegistry {
    type Error = CoreError;

    fn try_from(config: ReleaseConfig) -> Result<Self> {
        Self::new(config.releases)
    }
}

impl From<ReleaseRegistry> for ReleaseConfig {
    fn from(registry: ReleaseRegistry) -> Self {
        Self {
            releases: registry.releases,
        }
    }
}

impl ReleaseRegistry {
    /// Build a registry, rejecting an empty release list
    pub fn new(releases: Vec<Release>) -> Result<Self> {
        if releases.is_empty() {
            return Err(CoreError::InvalidReleases {
                message: "no releases configured".to_string(),
            });
        }
        if let Some(release) = releases.iter().find(|r| r.name.is_empty()) {
            return Err(CoreError::InvalidReleases {
                message: format!("release with folder '{}' has no name", release.folder),
            });
        }
        Ok(Self { releases })
    }

    /// Parse the release configuration from YAML (or JSON)
    pub fn parse(text: &str) -> Result<Self> {
        let config: ReleaseConfig = serde_yaml::from_str(text)?;
        Self::try_from(config)
    }

    /// Load the release configuration from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Get a release by name
    pub fn get(&self, name: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.name == name)
    }

    /// The first release flagged as default
    pub fn default_release(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.default)
    }

    /// Release to show for a request: the requested one if it exists, else
    /// the default-flagged one, else the first (newest) release.
    pub fn selected(&self, requested: Option<&str>) -> &Release {
        requested
            .and_then(|name| self.get(name))
            .or_else(|| self.default_release())
            .unwrap_or(&self.releases[0])
    }

    /// Releases in registry order (newest first)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Release> {
        self.releases.iter()
    }

    /// Releases from oldest to newest
    pub fn oldest_first(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter().rev()
    }

    /// List all release names
    pub fn names(&self) -> Vec<&str> {
        self.releases.iter().map(|r| r.name.as_str()).collect()
    }

    /// Number of releases (never zero)
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Check if the registry has no releases
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}
