//! Persistence collaborator — stores assembled results keyed by owner and
//! timestamp, and serves the owner-scoped history operations. The engine
//! hands results over unchanged; nothing here recomputes or mutates them.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::result::AnalysisResult;
use crate::models::analysis::AnalysisRow;

/// Inserts an assembled result for `user_id` and returns the record id.
pub async fn insert_analysis(
    pool: &PgPool,
    user_id: Uuid,
    job_description: Option<&str>,
    result: &AnalysisResult,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO analyses
            (id, user_id, analysis_type, job_role, job_category, job_description,
             source_filename, scores, keyword_match, suggestions, contact,
             ai_analysis, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(result.analysis_type.as_str())
    .bind(&result.job_role)
    .bind(&result.job_category)
    .bind(job_description)
    .bind(&result.source_filename)
    .bind(serde_json::to_value(result.scores).context("serializing scores")?)
    .bind(serde_json::to_value(&result.keyword_match).context("serializing keyword match")?)
    .bind(serde_json::to_value(&result.suggestions).context("serializing suggestions")?)
    .bind(serde_json::to_value(&result.contact).context("serializing contact")?)
    .bind(
        result
            .ai_analysis
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("serializing AI analysis")?,
    )
    .bind(result.created_at)
    .execute(pool)
    .await
    .context("inserting analysis record")?;

    Ok(id)
}

/// The owner's analysis history, newest first.
pub async fn list_analyses(pool: &PgPool, user_id: Uuid) -> Result<Vec<AnalysisRow>> {
    sqlx::query_as("SELECT * FROM analyses WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("listing analyses")
}

/// A single record, owner-scoped.
pub async fn get_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<AnalysisRow>> {
    sqlx::query_as("SELECT * FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("fetching analysis")
}

/// Deletes an owner's record. Returns whether a row was removed.
pub async fn delete_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("deleting analysis")?;
    Ok(result.rows_affected() > 0)
}
