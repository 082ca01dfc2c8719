pub mod cache;
pub mod cancel;
pub mod client;
pub mod error;
pub mod session;
pub mod utils;
pub mod validate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task state as reported by the analysis service. The service says `queued`
/// for a task that has not started yet; the session treats that as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[serde(alias = "queued")]
    Pending,
    Processing,
    Completed,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub rows: u64,
    pub size_mb: f64,
    #[serde(default)]
    pub columns_found: Vec<String>,
    #[serde(default)]
    pub has_nps_column: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub task_id: String,
    #[serde(default)]
    pub estimated_time_seconds: u64,
    pub file_info: FileInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub estimated_remaining_seconds: Option<u64>,
    #[serde(default)]
    pub processed_rows: Option<u64>,
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub results_available: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsMetrics {
    pub score: f64,
    pub promoters: u64,
    pub promoters_percentage: f64,
    pub passives: u64,
    pub passives_percentage: f64,
    pub detractors: u64,
    pub detractors_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnDistribution {
    pub very_low: u64,
    pub low: u64,
    pub moderate: u64,
    pub high: u64,
    pub very_high: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnMetrics {
    pub average: f64,
    pub high_risk_count: u64,
    pub high_risk_percentage: f64,
    pub distribution: ChurnDistribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainPoint {
    pub category: String,
    pub count: u64,
    pub percentage: f64,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Aggregated metrics the CLI reports on; per-row analysis and insight blobs
/// stay opaque and are written to disk as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub nps: NpsMetrics,
    pub churn_risk: ChurnMetrics,
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,
    #[serde(default)]
    pub emotions: serde_json::Value,
    #[serde(default)]
    pub sentiment_distribution: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub task_id: String,
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub rows: serde_json::Value,
    #[serde(default)]
    pub aggregated_insights: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}
