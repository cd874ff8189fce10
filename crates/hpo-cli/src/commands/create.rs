//! Create command - install missing CRDs into the cluster

use std::time::Duration;

use console::style;
use hpo_kube::{
    CrdCatalog, KubeCrdClient, KubeRuntimeInspector, Planner, PlannerConfig,
};

use crate::error::{CliError, Result};

/// Run the create command
pub async fn run(update_crds: bool, detect_k3s_rke2: bool, timeout: u64) -> Result<()> {
    let client = kube::Client::try_default().await.map_err(|e| {
        CliError::cluster_with_help(
            format!("failed to create Kubernetes client: {}", e),
            "Check your kubeconfig or in-cluster service account.",
        )
    })?;

    let config = PlannerConfig::new()
        .with_runtime_detection(detect_k3s_rke2)
        .with_establish_timeout(Duration::from_secs(timeout));

    let planner = Planner::new(
        KubeCrdClient::new(client.clone()),
        KubeRuntimeInspector::new(client),
        config,
    );

    if update_crds {
        println!(
            "{} Update mode: every CRD will be re-applied",
            style("→").blue().bold()
        );
    }

    let report = planner.install(&CrdCatalog::list(), update_crds).await?;

    for skipped in &report.skipped {
        println!(
            "  {} {} ({})",
            style("-").dim(),
            skipped.name,
            style(skipped.reason).dim()
        );
    }
    for applied in &report.applied {
        println!("  {} {}", style("✓").green(), applied.message());
    }

    println!(
        "{} {} CRD(s) applied, {} skipped",
        style("✓").green().bold(),
        report.applied.len(),
        report.skipped.len()
    );

    Ok(())
}
