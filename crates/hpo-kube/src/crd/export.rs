//! CRD export to files and streams
//!
//! Two modes:
//!
//! - **File mode**: definitions are bucketed by group key (first segment of
//!   the CRD name) and each bucket is written to `<key>.yaml`. Primary and
//!   dependency CRDs go to separate directories: uninstalling a chart that
//!   owns a dependency CRD would delete resources other components (e.g. a
//!   k3s or RKE2 cluster's own HelmCharts) rely on.
//! - **Stream mode**: each list is written, unbucketed, to a sink.
//!
//! File writes fan out one task per bucket. A failed bucket is logged and
//! reported, never fatal to its siblings or to the export.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tracing::{debug, error};

use super::catalog::CrdCatalog;
use super::definition::CrdDefinition;
use crate::error::{CrdError, Result};

/// YAML document separator
const DOCUMENT_SEPARATOR: &str = "---\n";

/// Render definitions into one YAML stream per group key
pub fn render_buckets(definitions: &[CrdDefinition]) -> Result<BTreeMap<String, String>> {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for def in definitions {
        buckets
            .entry(def.group_key().to_string())
            .or_default()
            .push(def.to_yaml()?);
    }

    Ok(buckets
        .into_iter()
        .map(|(key, docs)| (key, docs.join(DOCUMENT_SEPARATOR)))
        .collect())
}

/// Render definitions into a single YAML stream
pub fn render_stream(definitions: &[CrdDefinition]) -> Result<String> {
    let docs = definitions
        .iter()
        .map(CrdDefinition::to_yaml)
        .collect::<Result<Vec<_>>>()?;
    Ok(docs.join(DOCUMENT_SEPARATOR))
}

/// Per-bucket outcome of a file-mode export
#[derive(Debug)]
pub struct WriteReport {
    pub dir: PathBuf,
    /// Group key to written path, or the error that prevented the write
    pub results: BTreeMap<String, Result<PathBuf>>,
}

impl WriteReport {
    /// Paths that were written
    pub fn written(&self) -> Vec<&Path> {
        self.results
            .values()
            .filter_map(|r| r.as_ref().ok())
            .map(PathBuf::as_path)
            .collect()
    }

    /// Buckets that failed, with their errors
    pub fn failures(&self) -> Vec<(&str, &CrdError)> {
        self.results
            .iter()
            .filter_map(|(key, r)| r.as_ref().err().map(|e| (key.as_str(), e)))
            .collect()
    }

    /// Whether every bucket was written
    pub fn is_complete(&self) -> bool {
        self.results.values().all(Result::is_ok)
    }
}

/// Reports for the two target directories of [`write_catalog`]
#[derive(Debug)]
pub struct CatalogWriteReport {
    pub crds: WriteReport,
    pub dependencies: WriteReport,
}

impl CatalogWriteReport {
    pub fn is_complete(&self) -> bool {
        self.crds.is_complete() && self.dependencies.is_complete()
    }
}

/// Write one file per group key under `dir`, creating it if needed.
///
/// Serialization and directory creation errors are returned; per-file
/// write errors are logged and recorded in the report.
pub async fn write_files(dir: &Path, definitions: &[CrdDefinition]) -> Result<WriteReport> {
    tokio::fs::create_dir_all(dir).await?;
    let buckets = render_buckets(definitions)?;
    let keys: BTreeSet<String> = buckets.keys().cloned().collect();

    let mut tasks = JoinSet::new();
    for (key, data) in buckets {
        let path = dir.join(format!("{}.yaml", key));
        tasks.spawn(async move {
            let outcome = match tokio::fs::write(&path, data.as_bytes()).await {
                Ok(()) => Ok(path),
                Err(source) => Err(CrdError::WriteFile { path, source }),
            };
            (key, outcome)
        });
    }

    let mut results = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((key, outcome)) => {
                match &outcome {
                    Ok(path) => debug!(path = %path.display(), "wrote CRD file"),
                    Err(e) => error!(bucket = %key, error = %e, "failed to write CRD file"),
                }
                results.insert(key, outcome);
            }
            Err(e) => error!(error = %e, "CRD write task failed"),
        }
    }

    // A task that panicked never reported its key
    for key in keys {
        results
            .entry(key)
            .or_insert_with(|| Err(CrdError::Task("write task did not complete".to_string())));
    }

    Ok(WriteReport {
        dir: dir.to_path_buf(),
        results,
    })
}

/// Write the catalog: primary CRDs to `crd_dir`, dependencies to `dep_dir`
pub async fn write_catalog(
    catalog: &CrdCatalog,
    crd_dir: &Path,
    dep_dir: &Path,
) -> Result<CatalogWriteReport> {
    let crds = write_files(crd_dir, &catalog.primary).await?;
    let dependencies = write_files(dep_dir, &catalog.dependencies()).await?;
    Ok(CatalogWriteReport { crds, dependencies })
}

/// Print the catalog: primary CRDs to `out`, dependencies to `dep_out`
pub fn print_catalog<W, D>(catalog: &CrdCatalog, out: &mut W, dep_out: &mut D) -> Result<()>
where
    W: Write + ?Sized,
    D: Write + ?Sized,
{
    let primary = render_stream(&catalog.primary)?;
    out.write_all(primary.as_bytes())?;

    let dependencies = render_stream(&catalog.dependencies())?;
    dep_out.write_all(dependencies.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_count(yaml: &str) -> usize {
        yaml.matches("kind: CustomResourceDefinition").count()
    }

    #[test]
    fn test_render_buckets_keys() {
        let buckets = render_buckets(&CrdCatalog::list().dependencies()).unwrap();
        let keys: Vec<&String> = buckets.keys().collect();
        insta::assert_debug_snapshot!(keys, @r###"
        [
            "helmchartconfigs",
            "helmcharts",
            "helmreleases",
        ]
        "###);
    }

    #[test]
    fn test_bucket_holds_only_matching_definitions() {
        let buckets = render_buckets(&CrdCatalog::list().dependencies()).unwrap();
        let charts = &buckets["helmcharts"];
        assert_eq!(document_count(charts), 1);
        assert!(charts.contains("name: helmcharts.helm.cattle.io"));
        assert!(!charts.contains("name: helmchartconfigs.helm.cattle.io"));
    }

    #[test]
    fn test_shared_key_is_multi_document() {
        let def = CrdCatalog::list().primary[0].clone();
        let buckets = render_buckets(&[def.clone(), def]).unwrap();
        assert_eq!(buckets.len(), 1);

        let yaml = &buckets["projecthelmcharts"];
        assert_eq!(document_count(yaml), 2);
        assert_eq!(yaml.matches(DOCUMENT_SEPARATOR).count(), 1);
    }

    #[test]
    fn test_render_stream_is_unbucketed() {
        let stream = render_stream(&CrdCatalog::list().dependencies()).unwrap();
        assert_eq!(document_count(&stream), 3);
        let releases = stream.find("helmreleases.helm.cattle.io").unwrap();
        let charts = stream.find("name: helmcharts.helm.cattle.io").unwrap();
        assert!(releases < charts);
    }

    #[test]
    fn test_print_catalog() {
        let mut out = Vec::new();
        let mut dep_out = Vec::new();
        print_catalog(&CrdCatalog::list(), &mut out, &mut dep_out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let dep_out = String::from_utf8(dep_out).unwrap();
        assert_eq!(document_count(&out), 1);
        assert!(out.contains("projecthelmcharts.helm.cattle.io"));
        assert_eq!(document_count(&dep_out), 3);
        assert!(!dep_out.contains("projecthelmcharts"));
    }

    #[tokio::test]
    async fn test_write_files_one_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("crds");

        let report = write_files(&target, &CrdCatalog::list().dependencies())
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.written().len(), 3);
        for key in ["helmreleases", "helmcharts", "helmchartconfigs"] {
            let content = std::fs::read_to_string(target.join(format!("{key}.yaml"))).unwrap();
            assert!(content.contains(&format!("name: {key}.helm.cattle.io")));
        }
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_siblings() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes that one write fail
        std::fs::create_dir_all(dir.path().join("helmcharts.yaml")).unwrap();

        let report = write_files(dir.path(), &CrdCatalog::list().dependencies())
            .await
            .unwrap();

        assert!(!report.is_complete());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "helmcharts");
        assert!(matches!(failures[0].1, CrdError::WriteFile { .. }));

        assert_eq!(report.written().len(), 2);
        assert!(dir.path().join("helmreleases.yaml").is_file());
        assert!(dir.path().join("helmchartconfigs.yaml").is_file());
    }

    #[tokio::test]
    async fn test_write_catalog_splits_directories() {
        let dir = tempfile::tempdir().unwrap();
        let crd_dir = dir.path().join("templates");
        let dep_dir = dir.path().join("crds");

        let report = write_catalog(&CrdCatalog::list(), &crd_dir, &dep_dir)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert!(crd_dir.join("projecthelmcharts.yaml").is_file());
        assert!(!dep_dir.join("projecthelmcharts.yaml").exists());
        assert!(dep_dir.join("helmreleases.yaml").is_file());
        assert_eq!(report.dependencies.written().len(), 3);
    }
}
