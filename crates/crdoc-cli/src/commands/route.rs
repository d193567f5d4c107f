//! Route command - answer a page path like the site would

use crdoc_repo::{PageResponse, ResourcePageLoader};

use crate::error::{CliError, Result};

/// Print the status of `path`, then the redirect location or the view as JSON
pub async fn run(loader: &ResourcePageLoader, path: &str) -> Result<()> {
    let response = loader.handle_path(path).await;
    let status = response.status();

    match response {
        PageResponse::Render(view) => {
            println!("{}", status);
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        PageResponse::Redirect { location } => {
            println!("{} {}", status, location);
            Ok(())
        }
        PageResponse::NotFound { message } => {
            println!("{}", status);
            Err(CliError::not_found(message))
        }
    }
}
