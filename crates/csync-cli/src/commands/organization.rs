//! `csync organization` subcommands

use crate::error::Result;
use crate::session;
use colored::Colorize;
use csync_core::Error;

pub fn run_organization_list() -> Result<()> {
    let provider = session::connect()?;
    let organizations = provider.get_organizations().map_err(Error::from)?;

    if organizations.is_empty() {
        println!("No organizations available.");
        return Ok(());
    }
    for org in &organizations {
        if org.capabilities.is_empty() {
            println!("{}  {}", org.id.dimmed(), org.name);
        } else {
            println!(
                "{}  {} [{}]",
                org.id.dimmed(),
                org.name,
                org.capabilities.join(", ")
            );
        }
    }
    Ok(())
}
