//! Releases command - list configured releases

use crate::display;
use crate::error::Result;
use crate::site::SiteArgs;

pub fn run(site: &SiteArgs, json: bool) -> Result<()> {
    let releases = site.load_releases()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&releases)?);
    } else {
        display::print_releases(&releases);
    }

    Ok(())
}
