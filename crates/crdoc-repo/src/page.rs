//! Resource pages
//!
//! Routes map to one of three outcomes: a rendered [`ResolvedView`], a
//! redirect to a canonical `/<name>/<version>` path, or not found.

use serde::Serialize;
use std::sync::Arc;

use crdoc_core::{ReleaseRegistry, ResourceCatalog, Schema};

use crate::deprecation::{DEFAULT_SCAN_CONCURRENCY, DeprecationScanner};
use crate::error::Result;
use crate::resolver::{FetchedDocument, ResolvedMeta, VersionResolver, canonical_path};
use crate::source::DocumentSource;

/// Everything a resource page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedView {
    pub name: String,
    pub kind: String,
    pub group: String,
    pub version_on_focus: String,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    pub valid_versions: Vec<String>,
    pub spec: Option<Schema>,
    pub status: Option<Schema>,
    pub release_name: String,
    pub release_label: String,
    pub deprecated_since: Option<String>,
}

impl ResolvedView {
    fn assemble(meta: ResolvedMeta, fetched: FetchedDocument, deprecated_since: Option<String>) -> Self {
        let kind = if meta.crd_meta.kind.is_empty() {
            fetched.document.kind().unwrap_or_default().to_string()
        } else {
            meta.crd_meta.kind.clone()
        };
        let group = if meta.crd_meta.group.is_empty() {
            fetched.document.group().unwrap_or_default().to_string()
        } else {
            meta.crd_meta.group.clone()
        };

        Self {
            name: meta.crd_meta.name,
            kind,
            group,
            version_on_focus: meta.crd_meta_version.name,
            deprecated: meta.crd_meta_version.deprecated,
            app_version: meta.crd_meta_version.app_version,
            valid_versions: meta.valid_versions,
            spec: fetched.schemas.spec,
            status: fetched.schemas.status,
            release_label: meta.release.display_label().to_string(),
            release_name: meta.release.name,
            deprecated_since,
        }
    }
}

/// A parsed page route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoute {
    pub name: String,
    pub version: Option<String>,
    pub release: Option<String>,
    /// Old single-segment `<name>_<version>` link
    pub legacy: bool,
}

impl PageRoute {
    /// Route for `/<name>/<version>`
    pub fn version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            release: None,
            legacy: false,
        }
    }

    /// Route for `/<name>`
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            release: None,
            legacy: false,
        }
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Parse a path with optional query string
    ///
    /// Returns `None` for paths that are not resource pages.
    pub fn parse(path_and_query: &str) -> Option<Self> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        let release = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "release")
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        });

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut route = match segments.as_slice() {
            [name, version] => Self::version(*name, *version),
            [single] => match single.split_once('_') {
                Some((name, version)) if !name.is_empty() && !version.is_empty() => Self {
                    legacy: true,
                    ..Self::version(name, version)
                },
                _ => Self::resource(*single),
            },
            _ => return None,
        };
        route.release = release;
        Some(route)
    }
}

/// Outcome of handling a route
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse {
    Render(Box<ResolvedView>),
    Redirect { location: String },
    NotFound { message: String },
}

impl PageResponse {
    /// HTTP status equivalent
    pub fn status(&self) -> u16 {
        match self {
            PageResponse::Render(_) => 200,
            PageResponse::Redirect { .. } => 307,
            PageResponse::NotFound { .. } => 404,
        }
    }
}

/// Builds resource pages from the shared catalog, release registry and
/// document source
#[derive(Clone)]
pub struct ResourcePageLoader {
    catalog: Arc<ResourceCatalog>,
    releases: Arc<ReleaseRegistry>,
    source: Arc<dyn DocumentSource>,
    scan_concurrency: usize,
}

impl ResourcePageLoader {
    pub fn new(
        catalog: Arc<ResourceCatalog>,
        releases: Arc<ReleaseRegistry>,
        source: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            catalog,
            releases,
            source,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }

    /// Set how many release manifests the deprecation scan fetches ahead
    pub fn with_scan_concurrency(mut self, concurrency: usize) -> Self {
        self.scan_concurrency = concurrency.max(1);
        self
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn releases(&self) -> &ReleaseRegistry {
        &self.releases
    }

    pub fn source(&self) -> &dyn DocumentSource {
        self.source.as_ref()
    }

    /// Resolver over this loader's catalog, registry and source
    pub fn resolver(&self) -> VersionResolver<'_> {
        VersionResolver::new(&self.catalog, &self.releases, self.source.as_ref())
    }

    /// Deprecation scanner over this loader's source
    pub fn scanner(&self) -> DeprecationScanner<'_> {
        DeprecationScanner::new(self.source.as_ref()).with_concurrency(self.scan_concurrency)
    }

    /// Resolve a resource version and assemble its view
    ///
    /// The document fetch and the deprecation scan run concurrently once the
    /// metadata is resolved.
    pub async fn load_view(
        &self,
        name: &str,
        version: &str,
        release: Option<&str>,
    ) -> Result<ResolvedView> {
        let resolver = self.resolver();
        let meta = resolver.resolve_meta(name, version, release).await?;

        let scanner = self.scanner();
        let (fetched, deprecated_since) = futures::join!(
            resolver.fetch_document(&meta),
            scanner.scan_deprecated_since(
                meta.name(),
                meta.version(),
                &self.releases,
                &meta.release.name,
                &meta.manifest,
            ),
        );

        Ok(ResolvedView::assemble(meta, fetched?, deprecated_since))
    }

    /// Handle a page route
    pub async fn handle(&self, route: &PageRoute) -> PageResponse {
        let release = route.release.as_deref();

        let outcome = match (&route.version, route.legacy) {
            (Some(version), true) => self
                .resolver()
                .resolve_meta(&route.name, version, release)
                .await
                .map(|meta| {
                    let keep_release = release.filter(|r| *r == meta.release.name);
                    PageResponse::Redirect {
                        location: canonical_path(meta.name(), meta.version(), keep_release),
                    }
                }),
            (Some(version), false) => self
                .load_view(&route.name, version, release)
                .await
                .map(|view| PageResponse::Render(Box::new(view))),
            (None, _) => self
                .resolver()
                .redirect_target(&route.name, release)
                .await
                .map(|location| PageResponse::Redirect { location }),
        };

        outcome.unwrap_or_else(|e| {
            if !e.is_not_found() {
                tracing::warn!("Page {} failed: {}", route.name, e);
            }
            PageResponse::NotFound {
                message: e.to_string(),
            }
        })
    }

    /// Parse and handle a raw path
    pub async fn handle_path(&self, path_and_query: &str) -> PageResponse {
        match PageRoute::parse(path_and_query) {
            Some(route) => self.handle(&route).await,
            None => PageResponse::NotFound {
                message: format!("No page at {}", path_and_query),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crdoc_core::Release;

    const NAME: &str = "foo.example.com";

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::parse(
            r#"
example.com:
  - name: foo.example.com
    group: example.com
    kind: Foo
    versions:
      - name: v1alpha1
        deprecated: true
        appVersion: "24.12.1"
      - name: v1
"#,
        )
        .unwrap()
    }

    fn releases() -> ReleaseRegistry {
        ReleaseRegistry::new(vec![
            Release::new("r3", "releases/r3").with_label("25.8.1").as_default(),
            Release::new("r2", "releases/r2").with_label("25.4.1"),
            Release::new("r1", "releases/r1").with_label("24.12.1"),
        ])
        .unwrap()
    }

    fn manifest(v1alpha1_deprecated: bool) -> String {
        format!(
            r#"[{{"name": "foo.example.com", "group": "example.com", "kind": "Foo",
                 "versions": [{{"name": "v1alpha1", "deprecated": {}}}, {{"name": "v1"}}]}}]"#,
            v1alpha1_deprecated
        )
    }

    const DOC: &str = r#"
name: v1alpha1
schema:
  openAPIV3Schema:
    properties:
      spec:
        type: object
        required: [interval]
        properties:
          interval:
            type: integer
            default: 30
      status:
        type: object
"#;

    fn loader(source: &MemorySource) -> ResourcePageLoader {
        ResourcePageLoader::new(
            Arc::new(catalog()),
            Arc::new(releases()),
            Arc::new(source.clone()),
        )
    }

    fn populated() -> MemorySource {
        MemorySource::new()
            .with_document("releases/r1/manifest.json", manifest(false))
            .with_document("releases/r2/manifest.json", manifest(true))
            .with_document("releases/r3/manifest.json", manifest(true))
            .with_document("releases/r3/foo.example.com/v1alpha1.yaml", DOC)
    }

    #[tokio::test]
    async fn test_load_view() {
        let source = populated();
        let view = loader(&source).load_view(NAME, "v1alpha1", None).await.unwrap();

        assert_eq!(view.name, NAME);
        assert_eq!(view.kind, "Foo");
        assert_eq!(view.group, "example.com");
        assert_eq!(view.version_on_focus, "v1alpha1");
        // the r3 manifest marks it deprecated, and so does the catalog
        assert!(view.deprecated);
        assert_eq!(view.valid_versions, vec!["v1alpha1", "v1"]);
        assert_eq!(view.release_name, "r3");
        assert_eq!(view.release_label, "25.8.1");
        assert_eq!(view.deprecated_since.as_deref(), Some("25.4.1"));

        let spec = view.spec.unwrap();
        assert!(spec.is_required("interval"));
        assert!(view.status.is_some());

        // the current release's manifest is fetched once, by the resolver
        assert_eq!(source.fetch_count("releases/r3/manifest.json"), 1);
    }

    #[tokio::test]
    async fn test_view_serializes_camel_case() {
        let source = populated();
        let view = loader(&source).load_view(NAME, "v1alpha1", None).await.unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["versionOnFocus"], "v1alpha1");
        assert_eq!(json["deprecatedSince"], "25.4.1");
        assert_eq!(json["spec"]["properties"]["interval"]["default"], 30);
    }

    #[tokio::test]
    async fn test_name_route_redirects() {
        let source = populated();
        let response = loader(&source).handle_path("/foo.example.com").await;

        assert_eq!(response.status(), 307);
        assert_eq!(
            response,
            PageResponse::Redirect {
                location: "/foo.example.com/v1alpha1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_legacy_route_redirects() {
        let source = populated();
        let response = loader(&source).handle_path("/foo.example.com_v1?release=r2").await;

        assert_eq!(
            response,
            PageResponse::Redirect {
                location: "/foo.example.com/v1?release=r2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_legacy_route_is_validated() {
        let source = populated();
        let loader = loader(&source);

        let response = loader.handle_path("/bar.example.com_v1").await;
        assert_eq!(response.status(), 404);
        match response {
            PageResponse::NotFound { message } => assert!(message.contains("Invalid resource name")),
            other => panic!("unexpected response: {other:?}"),
        }

        let response = loader.handle_path("/foo.example.com_v9").await;
        assert_eq!(response.status(), 404);

        // unknown releases fall back to the default and are dropped from the link
        assert_eq!(
            loader.handle_path("/foo.example.com_v1?release=r9").await,
            PageResponse::Redirect {
                location: "/foo.example.com/v1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_render_route() {
        let source = populated();
        let response = loader(&source).handle_path("/foo.example.com/v1alpha1").await;

        assert_eq!(response.status(), 200);
        match response {
            PageResponse::Render(view) => assert_eq!(view.release_name, "r3"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failures_are_not_found() {
        let source = populated();
        let loader = loader(&source);

        for path in [
            "/bar.example.com/v1",
            "/foo.example.com/v9",
            "/foo.example.com/v1",
            "/bar.example.com",
            "/bar.example.com_v1",
            "/foo.example.com_v9",
            "/a/b/c",
        ] {
            assert_eq!(loader.handle_path(path).await.status(), 404, "{path}");
        }
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(PageRoute::parse("/foo.example.com"), Some(PageRoute::resource(NAME)));
        assert_eq!(
            PageRoute::parse("/foo.example.com/v1/"),
            Some(PageRoute::version(NAME, "v1"))
        );
        assert_eq!(
            PageRoute::parse("/foo.example.com/v1?release=r2&x=1"),
            Some(PageRoute::version(NAME, "v1").with_release("r2"))
        );
        assert_eq!(
            PageRoute::parse("/foo.example.com?release="),
            Some(PageRoute::resource(NAME))
        );

        let legacy = PageRoute::parse("/foo.example.com_v1").unwrap();
        assert!(legacy.legacy);
        assert_eq!(legacy.version.as_deref(), Some("v1"));

        assert_eq!(PageRoute::parse("/"), None);
        assert_eq!(PageRoute::parse("/a/b/c"), None);
    }
}
