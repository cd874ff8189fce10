//! Write command - one YAML file per CRD resource

use std::path::Path;

use console::style;
use hpo_kube::CrdCatalog;
use hpo_kube::crd::{CatalogWriteReport, WriteReport, write_catalog};

use crate::error::Result;

/// Run the write command
pub async fn run(crd_dir: &Path, crd_dep_dir: &Path) -> Result<()> {
    let catalog = CrdCatalog::list();
    let report = write_catalog(&catalog, crd_dir, crd_dep_dir).await?;

    print_report("CRDs", &report.crds);
    print_report("Dependency CRDs", &report.dependencies);
    print_summary(&report);

    // Individual file failures are reported, not fatal
    Ok(())
}

fn print_report(title: &str, report: &WriteReport) {
    println!(
        "{} {} in {}",
        style("→").blue().bold(),
        title,
        style(report.dir.display()).cyan()
    );

    for path in report.written() {
        println!("  {} {}", style("✓").green(), path.display());
    }
    for (key, err) in report.failures() {
        println!("  {} {}: {}", style("⚠").yellow(), key, err);
    }
}

fn print_summary(report: &CatalogWriteReport) {
    let written = report.crds.written().len() + report.dependencies.written().len();
    if report.is_complete() {
        println!("{} Wrote {} file(s)", style("✓").green().bold(), written);
    } else {
        let failed = report.crds.failures().len() + report.dependencies.failures().len();
        println!(
            "{} Wrote {} file(s), {} failed",
            style("⚠").yellow().bold(),
            written,
            failed
        );
    }
}
