//! Persisted result records shared with the dashboard.
//!
//! Records have exactly the fields `Test`, `Status` and `Fehler`:
//!
//! ```json
//! [
//!   { "Test": "Transaktion ID nicht null", "Status": "✅", "Fehler": 0 },
//!   { "Test": "Quantity 1-10", "Status": "❌", "Fehler": 479 }
//! ]
//! ```
//!
//! The field names and status glyphs are an external contract. Record order
//! follows result order.

use crate::core::{summarize, Outcome, Summary, ValidationResult};
use crate::labels::LabelTable;
use crate::prelude::*;
use crate::scoring::{Badge, ScoreClassifier};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const STATUS_PASSED: &str = "✅";
pub const STATUS_FAILED: &str = "❌";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "✅")]
    Passed,
    #[serde(rename = "❌")]
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Passed => STATUS_PASSED,
            RecordStatus::Failed => STATUS_FAILED,
        }
    }
}

impl From<bool> for RecordStatus {
    fn from(success: bool) -> Self {
        if success {
            RecordStatus::Passed
        } else {
            RecordStatus::Failed
        }
    }
}

/// One persisted result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Test")]
    pub test: String,
    #[serde(rename = "Status")]
    pub status: RecordStatus,
    #[serde(rename = "Fehler")]
    pub unexpected_count: u64,
}

impl Outcome for ResultRecord {
    fn is_success(&self) -> bool {
        self.status == RecordStatus::Passed
    }

    fn unexpected_count(&self) -> u64 {
        self.unexpected_count
    }
}

/// Maps results to records, labeling each through `labels`.
pub fn to_records(results: &[ValidationResult], labels: &LabelTable) -> Vec<ResultRecord> {
    results
        .iter()
        .map(|result| ResultRecord {
            test: labels.label_for_result(result).into_owned(),
            status: RecordStatus::from(result.success()),
            unexpected_count: result.unexpected_count(),
        })
        .collect()
}

/// Writes records as a JSON array, replacing any existing file.
#[instrument(skip(records), fields(records = records.len()))]
pub fn write_records(path: &Path, records: &[ResultRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write results to {}", path.display()))?;
    info!(path = %path.display(), "Wrote validation results");
    Ok(())
}

/// Reads records written by [`write_records`].
///
/// An absent file is not an error; it yields [`ResultArtifact::Missing`].
#[instrument]
pub fn load_records(path: &Path) -> Result<ResultArtifact> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No persisted results");
            return Ok(ResultArtifact::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let records: Vec<ResultRecord> = serde_json::from_str(&json)?;
    debug!(records = records.len(), "Loaded persisted results");
    Ok(ResultArtifact::Available(records))
}

/// Persisted results, or the fact that none exist yet.
///
/// Both states flow through the same summary and badge logic; a missing
/// artifact summarizes like an empty result set.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultArtifact {
    Available(Vec<ResultRecord>),
    Missing { path: PathBuf },
}

impl ResultArtifact {
    pub fn records(&self) -> &[ResultRecord] {
        match self {
            ResultArtifact::Available(records) => records,
            ResultArtifact::Missing { .. } => &[],
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ResultArtifact::Missing { .. })
    }

    pub fn summary(&self) -> Summary {
        summarize(self.records())
    }

    pub fn badge(&self) -> Badge {
        ScoreClassifier::classify_summary(&self.summary())
    }

    /// Returns the records, or [`DqError::MissingArtifact`] if there are none.
    pub fn require(self) -> Result<Vec<ResultRecord>> {
        match self {
            ResultArtifact::Available(records) => Ok(records),
            ResultArtifact::Missing { path } => Err(DqError::MissingArtifact {
                path: path.display().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Expectation, ExpectationSuite, RuleKind, ValidationEngine};
    use crate::dataset::Dataset;
    use crate::scoring::BadgeTier;
    use arrow::array::{ArrayRef, Int64Array};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn results() -> Vec<ValidationResult> {
        let dataset = Dataset::from_columns(vec![(
            "id",
            Arc::new(Int64Array::from(vec![Some(1), Some(1), None])) as ArrayRef,
        )])
        .unwrap();
        let suite = ExpectationSuite::builder("ids")
            .expectation(Expectation::not_null("id"))
            .expectation(Expectation::unique("id"))
            .build();
        ValidationEngine::new().evaluate(&dataset, &suite).unwrap()
    }

    #[test]
    fn test_record_field_names() {
        let labels = LabelTable::new().with_label(RuleKind::NotNull, "id", "ID nicht null");
        let records = to_records(&results(), &labels);

        let json = serde_json::to_value(&records).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "Test": "ID nicht null", "Status": "❌", "Fehler": 1 },
                { "Test": "Unbekannte Prüfung (unique)", "Status": "❌", "Fehler": 2 }
            ])
        );
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        let records = to_records(&results(), &LabelTable::new());

        write_records(&path, &records).unwrap();
        let artifact = load_records(&path).unwrap();

        assert!(!artifact.is_missing());
        assert_eq!(artifact.records(), records.as_slice());
        assert_eq!(artifact.summary().total_unexpected, 3);
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let artifact = load_records(&dir.path().join("absent.json")).unwrap();

        assert!(artifact.is_missing());
        assert_eq!(artifact.summary(), Summary::empty());
        assert_eq!(artifact.badge().tier, BadgeTier::None);
        assert!(matches!(
            artifact.require(),
            Err(DqError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn test_reads_external_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        fs::write(
            &path,
            r#"[{"Test":"a","Status":"✅","Fehler":0},{"Test":"b","Status":"✅","Fehler":0},{"Test":"c","Status":"❌","Fehler":12}]"#,
        )
        .unwrap();

        let artifact = load_records(&path).unwrap();
        let summary = artifact.summary();
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.total_unexpected, 12);
        assert_eq!(artifact.badge().tier, BadgeTier::Bronze);
    }

    #[test]
    fn test_huge_external_counts_saturate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        fs::write(
            &path,
            r#"[{"Test":"a","Status":"❌","Fehler":18446744073709551615},{"Test":"b","Status":"❌","Fehler":1}]"#,
        )
        .unwrap();

        let summary = load_records(&path).unwrap().summary();
        assert_eq!(summary.total_checks, 2);
        assert_eq!(summary.total_unexpected, u64::MAX);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, r#"[{"Test":"a","Status":"ok","Fehler":0}]"#).unwrap();
        assert!(matches!(load_records(&path), Err(DqError::Json(_))));
    }
}
