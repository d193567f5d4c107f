//! Deprecated-since command

use console::style;

use crdoc_repo::{DeprecationScanner, ManifestLoader};

use crate::error::Result;
use crate::site::SiteArgs;

/// Print the label of the oldest release deprecating `name`/`version`
pub async fn run(site: &SiteArgs, name: &str, version: &str, release: Option<&str>) -> Result<()> {
    let releases = site.load_releases()?;
    let source = site.open_source()?;

    let current = releases.selected(release);
    let manifest = ManifestLoader::new(source.as_ref()).load(&current.folder).await;

    let since = DeprecationScanner::new(source.as_ref())
        .with_concurrency(site.scan_concurrency)
        .scan_deprecated_since(name, version, &releases, &current.name, &manifest)
        .await;

    match since {
        Some(label) => println!("{}", label),
        None => eprintln!(
            "{} {}/{} is not deprecated in any release",
            style("✓").green(),
            name,
            version
        ),
    }

    Ok(())
}
