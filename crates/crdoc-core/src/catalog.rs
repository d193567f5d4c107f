//! Static resource catalog
//!
//! The catalog lists every known resource, grouped by API group key, with the
//! versions it declares. It is loaded once at start-up and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CoreError, Result};

/// One declared version of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceVersion {
    /// Version name (e.g., "v1", "v1alpha1")
    pub name: String,

    /// Deprecated flag
    #[serde(default)]
    pub deprecated: bool,

    /// Application version that introduced this schema version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// A resource and its declared versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Full resource name (e.g., "ntpclients.timing.eda.nokia.com")
    pub name: String,

    /// API group
    #[serde(default)]
    pub group: String,

    /// Kind (e.g., "NTPClient")
    #[serde(default)]
    pub kind: String,

    /// Declared versions, in declaration order
    #[serde(default)]
    pub versions: Vec<ResourceVersion>,
}

impl ResourceEntry {
    /// Get a version by name (first match)
    pub fn version(&self, name: &str) -> Option<&ResourceVersion> {
        self.versions.iter().find(|v| v.name == name)
    }

    /// The first declared version
    pub fn first_version(&self) -> Option<&ResourceVersion> {
        self.versions.first()
    }

    /// All version names, in declaration order
    pub fn version_names(&self) -> Vec<String> {
        self.versions.iter().map(|v| v.name.clone()).collect()
    }
}

/// Resources indexed by group key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceCatalog {
    groups: BTreeMap<String, Vec<ResourceEntry>>,
}

impl ResourceCatalog {
    /// Build a catalog from groups, checking every entry declares a version
    pub fn new(groups: BTreeMap<String, Vec<ResourceEntry>>) -> Result<Self> {
        let catalog = Self { groups };
        catalog.check()?;
        Ok(catalog)
    }

    /// Parse a catalog from YAML (or JSON)
    pub fn parse(text: &str) -> Result<Self> {
        let groups: BTreeMap<String, Vec<ResourceEntry>> = serde_yaml::from_str(text)?;
        Self::new(groups)
    }

    /// Load a catalog from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize the catalog as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn check(&self) -> Result<()> {
        for (group, entries) in &self.groups {
            if let Some(entry) = entries.iter().find(|e| e.versions.is_empty()) {
                return Err(CoreError::InvalidCatalog {
                    message: format!("resource '{}' in group '{}' declares no versions", entry.name, group),
                });
            }
        }
        Ok(())
    }

    /// Group key of a resource name: everything after the first `.`
    pub fn group_key(name: &str) -> &str {
        name.split_once('.').map_or(name, |(_, rest)| rest)
    }

    /// Find the unique entry named `name` under `group_key`
    ///
    /// Returns `Ok(None)` when nothing matches and an error when the name is
    /// declared more than once.
    pub fn lookup(&self, group_key: &str, name: &str) -> Result<Option<&ResourceEntry>> {
        let Some(entries) = self.groups.get(group_key) else {
            return Ok(None);
        };

        let mut matches = entries.iter().filter(|e| e.name == name);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(CoreError::DuplicateResource {
                group: group_key.to_string(),
                name: name.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Find a resource by name, deriving the group key from it
    pub fn lookup_resource(&self, name: &str) -> Result<Option<&ResourceEntry>> {
        self.lookup(Self::group_key(name), name)
    }

    /// Entries of a group
    pub fn group(&self, group_key: &str) -> Option<&[ResourceEntry]> {
        self.groups.get(group_key).map(Vec::as_slice)
    }

    /// List all group keys
    pub fn group_keys(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Iterate over every entry
    pub fn entries(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.groups.values().flatten()
    }

    /// Number of resources across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a newer catalog into this one
    ///
    /// Entries are matched by name within a group: the newer entry's group and
    /// kind win, versions are merged by name (newer flags win, an absent
    /// `appVersion` keeps the older one). Entries and versions end up sorted
    /// by name.
    pub fn merge(&mut self, other: ResourceCatalog) {
        for (group, entries) in other.groups {
            let merged = match self.groups.remove(&group) {
                Some(existing) => merge_entries(existing, entries),
                None => entries,
            };
            self.groups.insert(group, merged);
        }
    }
}

fn merge_entries(old: Vec<ResourceEntry>, new: Vec<ResourceEntry>) -> Vec<ResourceEntry> {
    let mut by_name: BTreeMap<String, ResourceEntry> =
        old.into_iter().map(|e| (e.name.clone(), e)).collect();

    for entry in new {
        match by_name.get_mut(&entry.name) {
            Some(existing) => {
                existing.group = entry.group;
                existing.kind = entry.kind;
                let versions = std::mem::take(&mut existing.versions);
                existing.versions = merge_versions(versions, entry.versions);
            }
            None => {
                by_name.insert(entry.name.clone(), entry);
            }
        }
    }

    by_name.into_values().collect()
}

fn merge_versions(old: Vec<ResourceVersion>, new: Vec<ResourceVersion>) -> Vec<ResourceVersion> {
    let mut by_name: BTreeMap<String, ResourceVersion> =
        old.into_iter().map(|v| (v.name.clone(), v)).collect();

    for version in new {
        match by_name.get_mut(&version.name) {
            Some(existing) => {
                existing.deprecated = version.deprecated;
                if version.app_version.is_some() {
                    existing.app_version = version.app_version;
                }
            }
            None => {
                by_name.insert(version.name.clone(), version);
            }
        }
    }

    by_name.into_values().collect()
}
