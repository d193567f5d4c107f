//! Resource documents
//!
//! A resource document holds the OpenAPI schema of one CRD version. Two shapes
//! are accepted:
//!
//! - the per-version document published under `<folder>/<name>/<version>.yaml`,
//!   which is one entry of a CRD's `spec.versions` list;
//! - the legacy all-in-one CustomResourceDefinition carrying every version
//!   under `spec.versions`, along with `spec.group` and `spec.names.kind`.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::schema::Schema;

/// The `spec` and `status` schemas of one version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionSchemas {
    pub spec: Option<Schema>,
    pub status: Option<Schema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OpenApiProperties {
    #[serde(default)]
    properties: IndexMap<String, Schema>,
}

#[derive(Debug, Clone, Deserialize)]
struct VersionSchema {
    #[serde(rename = "openAPIV3Schema", default)]
    open_api_v3_schema: OpenApiProperties,
}

/// One entry of a CRD's `spec.versions`
#[derive(Debug, Clone, Deserialize)]
pub struct CrdVersionDocument {
    /// Version name
    #[serde(default)]
    pub name: Option<String>,

    /// Deprecated flag as written in the CRD
    #[serde(default)]
    pub deprecated: bool,

    schema: VersionSchema,
}

impl CrdVersionDocument {
    /// Extract the `spec` and `status` schemas
    pub fn schemas(&self) -> VersionSchemas {
        let properties = &self.schema.open_api_v3_schema.properties;
        VersionSchemas {
            spec: properties.get("spec").cloned(),
            status: properties.get("status").cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CrdNames {
    #[serde(default)]
    kind: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CrdDefinitionSpec {
    #[serde(default)]
    group: String,
    #[serde(default)]
    names: CrdNames,
    versions: Vec<CrdVersionDocument>,
}

/// A full CustomResourceDefinition (legacy layout)
#[derive(Debug, Clone, Deserialize)]
pub struct CrdDefinitionDocument {
    spec: CrdDefinitionSpec,
}

/// A parsed resource document
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceDocument {
    Version(CrdVersionDocument),
    Definition(CrdDefinitionDocument),
}

impl ResourceDocument {
    /// Parse a document from YAML (or JSON)
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| CoreError::InvalidDocument {
            message: e.to_string(),
        })
    }

    /// Schemas for `version`
    ///
    /// A per-version document answers for whatever version it was fetched
    /// as; a full CRD is searched for the matching `spec.versions` entry.
    pub fn schemas_for(&self, version: &str) -> Option<VersionSchemas> {
        match self {
            Self::Version(doc) => Some(doc.schemas()),
            Self::Definition(doc) => doc
                .spec
                .versions
                .iter()
                .find(|v| v.name.as_deref() == Some(version))
                .map(CrdVersionDocument::schemas),
        }
    }

    /// API group, when the document carries one
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Definition(doc) if !doc.spec.group.is_empty() => Some(doc.spec.group.as_str()),
            _ => None,
        }
    }

    /// Kind, when the document carries one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Definition(doc) if !doc.spec.names.kind.is_empty() => Some(doc.spec.names.kind.as_str()),
            _ => None,
        }
    }

    /// Version names declared by the document
    pub fn version_names(&self) -> Vec<&str> {
        match self {
            Self::Version(doc) => doc.name.as_deref().into_iter().collect(),
            Self::Definition(doc) => doc
                .spec
                .versions
                .iter()
                .filter_map(|v| v.name.as_deref())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_DOC: &str = r#"
name: v1
served: true
storage: true
schema:
  openAPIV3Schema:
    type: object
    properties:
      apiVersion:
        type: string
      spec:
        type: object
        description: NTPClientSpec defines the desired state of NTPClient
        properties:
          servers:
            type: array
            items:
              type: string
      status:
        type: object
        properties:
          synchronized:
            type: boolean
"#;

    const DEFINITION_DOC: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: ntpclients.timing.eda.nokia.com
spec:
  group: timing.eda.nokia.com
  names:
    kind: NTPClient
    plural: ntpclients
  versions:
    - name: v1alpha1
      deprecated: true
      schema:
        openAPIV3Schema:
          properties:
            spec:
              type: object
              description: old spec
    - name: v1
      schema:
        openAPIV3Schema:
          properties:
            spec:
              type: object
              description: new spec
            status:
              type: object
"#;

    #[test]
    fn test_parse_version_document() {
        let doc = ResourceDocument::parse(VERSION_DOC).unwrap();
        assert!(matches!(doc, ResourceDocument::Version(_)));
        assert_eq!(doc.version_names(), vec!["v1"]);
        assert_eq!(doc.group(), None);

        let schemas = doc.schemas_for("v1").unwrap();
        let spec = schemas.spec.unwrap();
        assert_eq!(
            spec.meta.description.as_deref(),
            Some("NTPClientSpec defines the desired state of NTPClient")
        );
        assert!(spec.properties().unwrap().contains_key("servers"));
        assert!(schemas.status.is_some());
    }

    #[test]
    fn test_parse_definition_document() {
        let doc = ResourceDocument::parse(DEFINITION_DOC).unwrap();
        assert!(matches!(doc, ResourceDocument::Definition(_)));
        assert_eq!(doc.group(), Some("timing.eda.nokia.com"));
        assert_eq!(doc.kind(), Some("NTPClient"));
        assert_eq!(doc.version_names(), vec!["v1alpha1", "v1"]);

        let old = doc.schemas_for("v1alpha1").unwrap();
        assert_eq!(old.spec.unwrap().meta.description.as_deref(), Some("old spec"));
        assert!(old.status.is_none());

        let new = doc.schemas_for("v1").unwrap();
        assert_eq!(new.spec.unwrap().meta.description.as_deref(), Some("new spec"));

        assert!(doc.schemas_for("v2").is_none());
    }

    #[test]
    fn test_parse_invalid_document() {
        assert!(matches!(
            ResourceDocument::parse("just: text"),
            Err(CoreError::InvalidDocument { .. })
        ));
        assert!(ResourceDocument::parse("::: not yaml").is_err());
    }

    #[test]
    fn test_fields_keep_document_order() {
        let doc = ResourceDocument::parse(
            r#"
name: v1
schema:
  openAPIV3Schema:
    properties:
      spec:
        type: object
        properties:
          zeta:
            type: string
          alpha:
            type: integer
          middle:
            type: object
            properties:
              second: {type: string}
              first: {type: string}
"#,
        )
        .unwrap();

        let spec = doc.schemas_for("v1").unwrap().spec.unwrap();
        let names: Vec<String> = crate::field::field_views(&spec)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "middle"]);

        let middle = &spec.properties().unwrap()["middle"];
        let nested: Vec<&str> = middle.properties().unwrap().keys().map(String::as_str).collect();
        assert_eq!(nested, vec!["second", "first"]);
    }
}
