//! Manifest persistence.

use std::fs;

use tracing::{debug, info};

use crate::error::GenerateResult;
use crate::generator::GenerateReport;

/// Writes a pass's manifests to the output directory.
pub struct ManifestWriter;

impl ManifestWriter {
    /// Write every manifest in the report, creating the output directory
    /// if it does not exist.
    pub fn write_all(report: &GenerateReport) -> GenerateResult<()> {
        fs::create_dir_all(&report.output_dir)?;

        for manifest in &report.manifests {
            debug!("writing manifest to {:?}", manifest.output_path);
            fs::write(&manifest.output_path, &manifest.content)?;
        }

        info!(
            "wrote {} manifest(s) to {:?}",
            report.manifests.len(),
            report.output_dir
        );
        Ok(())
    }
}
