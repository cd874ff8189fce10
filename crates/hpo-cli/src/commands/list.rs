//! List command - show the CRD catalog

use console::style;
use hpo_kube::CrdCatalog;

use crate::error::Result;

/// Run the list command
pub fn run() -> Result<()> {
    let catalog = CrdCatalog::list();

    println!(
        "{:<24} {:<36} {:<20} {:<10} {}",
        style("GROUP").bold(),
        style("NAME").bold(),
        style("KEY").bold(),
        style("VERSION").bold(),
        style("OWNER").bold()
    );

    for (group, def) in catalog.iter() {
        println!(
            "{:<24} {:<36} {:<20} {:<10} {}",
            group.to_string(),
            def.name(),
            def.group_key(),
            def.version(),
            style(group.description()).dim()
        );
    }

    Ok(())
}
