use std::fs;
use std::path::Path;

use chrono::Utc;
use client_logging::{client_error, client_warn};
use segcli_core::SegmentReport;
use segcli_engine::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const HISTORY_FILENAME: &str = ".segcli_history.ron";

/// One finished analysis run, as kept in the output directory's history
/// file across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub finished_utc: String,
    pub total_customers: u64,
    pub n_clusters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HistoryFile {
    runs: Vec<RunRecord>,
}

pub(crate) fn load_history(output_dir: &Path) -> Vec<RunRecord> {
    let path = output_dir.join(HISTORY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            client_warn!("Failed to read run history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    match ron::from_str::<HistoryFile>(&content) {
        Ok(history) => history.runs,
        Err(err) => {
            client_warn!("Failed to parse run history from {:?}: {}", path, err);
            Vec::new()
        }
    }
}

/// Appends a finished run to the history file, stamped with the current
/// UTC time.
pub(crate) fn record_run(output_dir: &Path, report: &SegmentReport) {
    append_run(
        output_dir,
        RunRecord {
            finished_utc: Utc::now().to_rfc3339(),
            total_customers: report.total_customers,
            n_clusters: report.n_clusters,
        },
    );
}

pub(crate) fn append_run(output_dir: &Path, record: RunRecord) {
    let mut runs = load_history(output_dir);
    runs.push(record);

    let history = HistoryFile { runs };
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&history, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize run history: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    if let Err(err) = writer.write(HISTORY_FILENAME, &content) {
        client_error!("Failed to write run history to {:?}: {}", output_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(total: u64) -> RunRecord {
        RunRecord {
            finished_utc: "2026-08-04T12:00:00+00:00".to_string(),
            total_customers: total,
            n_clusters: 4,
        }
    }

    #[test]
    fn history_round_trips_and_appends() {
        let temp = TempDir::new().unwrap();
        assert!(load_history(temp.path()).is_empty());

        append_run(temp.path(), record(100));
        append_run(temp.path(), record(250));

        let runs = load_history(temp.path());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].total_customers, 100);
        assert_eq!(runs[1].total_customers, 250);
    }

    #[test]
    fn unreadable_history_is_treated_as_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(HISTORY_FILENAME), "not ron at all").unwrap();
        assert!(load_history(temp.path()).is_empty());
    }
}
