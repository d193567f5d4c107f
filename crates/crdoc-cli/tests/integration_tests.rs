//! Integration tests for CLI commands

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const INTERFACES: &str = "interfaces.interfaces.eda.nokia.com";

const CATALOG: &str = r#"
interfaces.eda.nokia.com:
  - name: interfaces.interfaces.eda.nokia.com
    group: interfaces.eda.nokia.com
    kind: Interface
    versions:
      - name: v1alpha1
        deprecated: true
        appVersion: "24.12.1"
      - name: v1
timing.eda.nokia.com:
  - name: ntpclients.timing.eda.nokia.com
    group: timing.eda.nokia.com
    kind: NTPClient
    versions:
      - name: v1alpha1
"#;

const RELEASES: &str = r#"
releases:
  - name: "25.8"
    label: "25.8.1"
    folder: releases/25.8
    default: true
  - name: "25.4"
    label: "25.4.2"
    folder: releases/25.4
  - name: "24.12"
    folder: releases/24.12
"#;

const INTERFACE_V1: &str = r#"
name: v1
schema:
  openAPIV3Schema:
    properties:
      spec:
        type: object
        description: Interface configuration
        required: [type]
        properties:
          type:
            type: string
            enum: [interface, lag]
            default: interface
          members:
            type: array
            items:
              type: object
              properties:
                node:
                  type: string
      status:
        type: object
        properties:
          operationalState:
            type: string
"#;

const INTERFACE_V1ALPHA1: &str = r#"
name: v1alpha1
schema:
  openAPIV3Schema:
    properties:
      spec:
        type: object
        properties:
          mtu:
            type: integer
            minimum: 1450
            maximum: 9500
"#;

const NTP_CRD: &str = r#"
spec:
  group: timing.eda.nokia.com
  names:
    kind: NTPClient
  versions:
    - name: v1alpha1
      schema:
        openAPIV3Schema:
          properties:
            spec:
              type: object
              properties:
                servers:
                  type: array
                  items:
                    type: string
"#;

fn manifest(v1alpha1_deprecated: bool) -> String {
    format!(
        r#"[{{"name": "{}", "group": "interfaces.eda.nokia.com", "kind": "Interface",
             "versions": [{{"name": "v1alpha1", "deprecated": {}}}, {{"name": "v1", "deprecated": false}}]}}]"#,
        INTERFACES, v1alpha1_deprecated
    )
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

/// Build a documentation site: three releases, 24.12 without a manifest,
/// the NTP client only available in the legacy folder
fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "resources.yaml", CATALOG);
    write(root, "releases.yaml", RELEASES);
    write(root, "site/releases/25.8/manifest.json", &manifest(true));
    write(root, "site/releases/25.4/manifest.json", &manifest(true));
    write(
        root,
        &format!("site/releases/25.8/{}/v1.yaml", INTERFACES),
        INTERFACE_V1,
    );
    write(
        root,
        &format!("site/releases/25.8/{}/v1alpha1.yaml", INTERFACES),
        INTERFACE_V1ALPHA1,
    );
    write(
        root,
        "site/resources/ntpclients.timing.eda.nokia.com/v1alpha1.yaml",
        NTP_CRD,
    );

    dir
}

/// Helper to run crdoc against a site
fn crdoc(site: &TempDir, args: &[&str]) -> std::process::Output {
    let root = site.path();
    Command::new(env!("CARGO_BIN_EXE_crdoc"))
        .args(args)
        .env("CRDOC_CATALOG", root.join("resources.yaml"))
        .env("CRDOC_RELEASES", root.join("releases.yaml"))
        .env("CRDOC_SOURCE", root.join("site"))
        .env_remove("CRDOC_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute crdoc")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

mod show_command {
    use super::*;

    #[test]
    fn test_show_json() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "v1", "--json"]);

        assert!(output.status.success(), "{:?}", output);
        let json: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");

        assert_eq!(json["name"], INTERFACES);
        assert_eq!(json["kind"], "Interface");
        assert_eq!(json["versionOnFocus"], "v1");
        assert_eq!(json["deprecated"], false);
        assert_eq!(json["releaseName"], "25.8");
        assert_eq!(json["releaseLabel"], "25.8.1");
        assert_eq!(json["validVersions"], serde_json::json!(["v1alpha1", "v1"]));
        assert_eq!(json["spec"]["required"], serde_json::json!(["type"]));
        assert!(json["deprecatedSince"].is_null());
    }

    #[test]
    fn test_show_deprecated_version() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "v1alpha1", "--json"]);

        assert!(output.status.success(), "{:?}", output);
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["deprecated"], true);
        assert_eq!(json["appVersion"], "24.12.1");
        // 24.12 has no manifest, 25.4 is the oldest marking it deprecated
        assert_eq!(json["deprecatedSince"], "25.4.2");
    }

    #[test]
    fn test_show_without_version_follows_redirect() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "--json"]);

        assert!(output.status.success(), "{:?}", output);
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["versionOnFocus"], "v1alpha1");
    }

    #[test]
    fn test_show_tree() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "v1"]);

        assert!(output.status.success(), "{:?}", output);
        let out = stdout(&output);
        assert!(out.contains(INTERFACES));
        assert!(out.contains("Interface configuration"));
        assert!(out.contains("enum: [interface, lag]"));
        assert!(out.contains("[]object"));
        assert!(out.contains("node"));
        assert!(out.contains("operationalState"));
    }

    #[test]
    fn test_show_legacy_document() {
        let site = site();
        let output = crdoc(
            &site,
            &["show", "ntpclients.timing.eda.nokia.com", "v1alpha1", "--json"],
        );

        assert!(output.status.success(), "{:?}", output);
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(json["spec"]["properties"]["servers"]["type"], "array");
        assert!(json["status"].is_null());
    }

    #[test]
    fn test_show_unknown_resource() {
        let site = site();
        let output = crdoc(&site, &["show", "widgets.example.com", "v1"]);

        assert_eq!(output.status.code(), Some(6));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid resource name"));
    }

    #[test]
    fn test_show_unknown_version() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "v2"]);

        assert_eq!(output.status.code(), Some(6));
    }

    #[test]
    fn test_show_missing_document() {
        let site = site();
        let output = crdoc(&site, &["show", INTERFACES, "v1", "--release", "25.4"]);

        assert_eq!(output.status.code(), Some(6));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error fetching resource"));
    }
}

mod route_command {
    use super::*;

    #[test]
    fn test_name_route_redirects() {
        let site = site();
        let output = crdoc(&site, &["route", &format!("/{}", INTERFACES)]);

        assert!(output.status.success(), "{:?}", output);
        assert_eq!(
            stdout(&output).trim(),
            format!("307 /{}/v1alpha1", INTERFACES)
        );
    }

    #[test]
    fn test_legacy_route_redirects() {
        let site = site();
        let output = crdoc(&site, &["route", &format!("/{}_v1?release=25.4", INTERFACES)]);

        assert!(output.status.success(), "{:?}", output);
        assert_eq!(
            stdout(&output).trim(),
            format!("307 /{}/v1?release=25.4", INTERFACES)
        );
    }

    #[test]
    fn test_unknown_legacy_route() {
        let site = site();

        let output = crdoc(&site, &["route", "/widgets.example.com_v1"]);
        assert_eq!(output.status.code(), Some(6));
        assert_eq!(stdout(&output).trim(), "404");

        let output = crdoc(&site, &["route", &format!("/{}_v9", INTERFACES)]);
        assert_eq!(output.status.code(), Some(6));
        assert_eq!(stdout(&output).trim(), "404");
    }

    #[test]
    fn test_render_route() {
        let site = site();
        let output = crdoc(&site, &["route", &format!("/{}/v1", INTERFACES)]);

        assert!(output.status.success(), "{:?}", output);
        let out = stdout(&output);
        let (status, body) = out.split_once('\n').unwrap();
        assert_eq!(status, "200");
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["versionOnFocus"], "v1");
    }

    #[test]
    fn test_not_found_route() {
        let site = site();
        let output = crdoc(&site, &["route", "/widgets.example.com/v1"]);

        assert_eq!(output.status.code(), Some(6));
        assert_eq!(stdout(&output).trim(), "404");
    }
}

mod deprecated_since_command {
    use super::*;

    #[test]
    fn test_deprecated_since() {
        let site = site();
        let output = crdoc(&site, &["deprecated-since", INTERFACES, "v1alpha1"]);

        assert!(output.status.success(), "{:?}", output);
        assert_eq!(stdout(&output).trim(), "25.4.2");
    }

    #[test]
    fn test_sequential_scan() {
        let site = site();
        let output = crdoc(
            &site,
            &["deprecated-since", INTERFACES, "v1alpha1", "--scan-concurrency", "1"],
        );

        assert!(output.status.success(), "{:?}", output);
        assert_eq!(stdout(&output).trim(), "25.4.2");
    }

    #[test]
    fn test_not_deprecated() {
        let site = site();
        let output = crdoc(&site, &["deprecated-since", INTERFACES, "v1"]);

        assert!(output.status.success(), "{:?}", output);
        assert!(stdout(&output).trim().is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("is not deprecated"));
    }
}

mod releases_command {
    use super::*;

    #[test]
    fn test_releases_table() {
        let site = site();
        let output = crdoc(&site, &["releases"]);

        assert!(output.status.success(), "{:?}", output);
        let out = stdout(&output);
        assert!(out.contains("25.8.1"));
        assert!(out.contains("releases/24.12"));
    }

    #[test]
    fn test_releases_json() {
        let site = site();
        let output = crdoc(&site, &["releases", "--json"]);

        assert!(output.status.success(), "{:?}", output);
        let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        let releases = json["releases"].as_array().unwrap();
        assert_eq!(releases.len(), 3);
        assert_eq!(releases[0]["default"], true);
    }

    #[test]
    fn test_missing_release_config() {
        let site = site();
        let output = Command::new(env!("CARGO_BIN_EXE_crdoc"))
            .arg("releases")
            .env_remove("CRDOC_RELEASES")
            .env("NO_COLOR", "1")
            .current_dir(site.path())
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(7));
    }

    #[test]
    fn test_unreadable_release_config() {
        let site = site();
        write(site.path(), "releases.yaml", "releases: []");
        let output = crdoc(&site, &["releases"]);

        assert_eq!(output.status.code(), Some(7));
    }
}

mod catalog_command {
    use super::*;

    #[test]
    fn test_merge_catalogs() {
        let site = site();
        write(
            site.path(),
            "newer.yaml",
            r#"
interfaces.eda.nokia.com:
  - name: interfaces.interfaces.eda.nokia.com
    group: interfaces.eda.nokia.com
    kind: Interface
    versions:
      - name: v1
        deprecated: true
      - name: v2
"#,
        );
        let out_path = site.path().join("merged.yaml");
        let output = crdoc(
            &site,
            &[
                "catalog",
                "merge",
                site.path().join("resources.yaml").to_str().unwrap(),
                site.path().join("newer.yaml").to_str().unwrap(),
                "-o",
                out_path.to_str().unwrap(),
            ],
        );

        assert!(output.status.success(), "{:?}", output);
        let merged: serde_json::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
        let versions = merged["interfaces.eda.nokia.com"][0]["versions"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = versions.iter().map(|v| v["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["v1", "v1alpha1", "v2"]);
        assert_eq!(versions[0]["deprecated"], true);
        assert_eq!(versions[1]["appVersion"], "24.12.1");
        assert!(merged.get("timing.eda.nokia.com").is_some());
    }

    #[test]
    fn test_merge_to_stdout() {
        let site = site();
        let output = crdoc(
            &site,
            &[
                "catalog",
                "merge",
                site.path().join("resources.yaml").to_str().unwrap(),
            ],
        );

        assert!(output.status.success(), "{:?}", output);
        assert!(stdout(&output).contains("ntpclients.timing.eda.nokia.com"));
    }

    #[test]
    fn test_merge_missing_file() {
        let site = site();
        let output = crdoc(&site, &["catalog", "merge", "does-not-exist.yaml"]);

        assert_eq!(output.status.code(), Some(7));
    }
}
