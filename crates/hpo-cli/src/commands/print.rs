//! Print command - CRDs as YAML streams

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use hpo_kube::CrdCatalog;
use hpo_kube::crd::print_catalog;

use crate::error::Result;

/// Run the print command
///
/// Primary CRDs go to stdout. Dependencies go to `dep_output` when given,
/// otherwise to stdout after a document separator.
pub fn run(dep_output: Option<&Path>) -> Result<()> {
    let catalog = CrdCatalog::list();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match dep_output {
        Some(path) => {
            let mut dep_out = File::create(path)?;
            print_catalog(&catalog, &mut out, &mut dep_out)?;
            dep_out.flush()?;
        }
        None => {
            let mut deps = Vec::new();
            print_catalog(&catalog, &mut out, &mut deps)?;
            out.write_all(b"---\n")?;
            out.write_all(&deps)?;
        }
    }

    out.flush()?;
    Ok(())
}
