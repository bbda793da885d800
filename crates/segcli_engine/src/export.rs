use std::path::{Path, PathBuf};

use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::SegmentReport;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub csv_filename: String,
    /// Machine-readable summary written next to the CSV; `None` skips it.
    pub manifest_filename: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            csv_filename: "segments.csv".to_string(),
            manifest_filename: Some("summary.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub output_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Renders a report as CSV (`segment,customers,share`) plus an optional
/// JSON summary, written atomically into `output_dir`.
pub fn write_report_csv(
    output_dir: &Path,
    report: &SegmentReport,
    options: ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let mut buffer = String::from("segment,customers,share\n");
    for (label, count) in &report.cluster_sizes {
        buffer.push_str(&csv_field(label));
        buffer.push(',');
        buffer.push_str(&count.to_string());
        buffer.push(',');
        buffer.push_str(&share_of(*count, report.total_customers));
        buffer.push('\n');
    }

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let output_path = writer.write(&options.csv_filename, &buffer)?;

    let manifest_path = if let Some(name) = options.manifest_filename {
        let manifest = json!({
            "total_customers": report.total_customers,
            "n_clusters": report.n_clusters,
            "cluster_sizes": report.cluster_sizes,
        });
        let path = writer.write(&name, &manifest.to_string())?;
        Some(path)
    } else {
        None
    };

    Ok(ExportSummary {
        row_count: report.cluster_sizes.len(),
        output_path,
        manifest_path,
    })
}

fn share_of(count: u64, total: u64) -> String {
    // Zero totals must not leak NaN into the export.
    if total == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
