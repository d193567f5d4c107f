//! Show command - display a resource version

use crdoc_repo::{PageResponse, PageRoute, ResolvedView, ResourcePageLoader};

use crate::display;
use crate::error::{CliError, Result};

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 3;

pub async fn run(
    loader: &ResourcePageLoader,
    name: &str,
    version: Option<&str>,
    release: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut route = match version {
        Some(version) => PageRoute::version(name, version),
        None => PageRoute::resource(name),
    };
    route.release = release.map(str::to_string);

    let view = follow(loader, route).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        display::print_view(&view);
    }

    Ok(())
}

/// Handle a route the way a browser would, following redirects
pub async fn follow(loader: &ResourcePageLoader, mut route: PageRoute) -> Result<ResolvedView> {
    for _ in 0..=MAX_REDIRECTS {
        match loader.handle(&route).await {
            PageResponse::Render(view) => return Ok(*view),
            PageResponse::Redirect { location } => {
                tracing::debug!("Following redirect to {}", location);
                route = PageRoute::parse(&location).ok_or_else(|| {
                    CliError::internal(format!("Invalid redirect target: {}", location))
                })?;
            }
            PageResponse::NotFound { message } => {
                return Err(CliError::not_found_with_help(
                    message,
                    "Check the resource name and version against the catalog, or pick another --release",
                ));
            }
        }
    }

    Err(CliError::internal(format!(
        "Too many redirects for {}",
        route.name
    )))
}
