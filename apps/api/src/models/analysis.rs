use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted analysis record, keyed by owner and timestamp. The scoring
/// payloads are stored as JSON exactly as they were served, so history
/// entries render identically to live results.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub analysis_type: String,
    pub job_role: String,
    pub job_category: String,
    pub job_description: Option<String>,
    pub source_filename: String,
    pub scores: Value,
    pub keyword_match: Value,
    pub suggestions: Value,
    pub contact: Value,
    pub ai_analysis: Option<Value>,
    pub created_at: DateTime<Utc>,
}
