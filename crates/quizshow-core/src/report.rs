//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::ScoreSummary;

/// The outcome of one completed quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the quiz was finished.
    pub created_at: DateTime<Utc>,
    /// Name of the bank that was played.
    pub bank: String,
    /// Score and incorrect-answer review.
    pub summary: ScoreSummary,
}

impl SessionReport {
    /// Create a report stamped with a fresh id and the current time.
    pub fn new(bank: impl Into<String>, summary: ScoreSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: bank.into(),
            summary,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
