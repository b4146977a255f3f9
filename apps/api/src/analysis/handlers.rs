use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::extract::RawDocument;
use crate::analysis::result::{AnalysisResult, AnalysisType, RequestMeta};
use crate::analysis::store;
use crate::analysis::taxonomy::{resolve_profile, RoleTaxonomy};
use crate::analysis::AnalysisRequest;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    #[serde(rename = "analysisId")]
    pub analysis_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct AnalysisListResponse {
    pub success: bool,
    pub analyses: Vec<AnalysisRow>,
}

#[derive(Serialize)]
pub struct AnalysisItemResponse {
    pub success: bool,
    pub analysis: AnalysisRow,
}

/// The multipart upload form shared by both analysis routes.
struct UploadForm {
    document: Option<RawDocument>,
    job_role: Option<String>,
    job_category: Option<String>,
    job_description: Option<String>,
    user_id: Option<Uuid>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm {
        document: None,
        job_role: None,
        job_category: None,
        job_description: None,
        user_id: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                form.document = Some(RawDocument {
                    bytes,
                    filename,
                    content_type,
                });
            }
            "job_role" => form.job_role = Some(read_text(field).await?),
            "job_category" => form.job_category = Some(read_text(field).await?),
            "job_description" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    form.job_description = Some(text);
                }
            }
            "user_id" => {
                let raw = read_text(field).await?;
                let parsed = raw
                    .parse::<Uuid>()
                    .map_err(|_| AppError::Validation(format!("invalid user_id '{raw}'")))?;
                form.user_id = Some(parsed);
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))
}

async fn run_analysis(
    state: AppState,
    multipart: Multipart,
    mode: AnalysisType,
) -> Result<Json<AnalysisResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let document = form
        .document
        .ok_or_else(|| AppError::Validation("no resume file uploaded".to_string()))?;
    let job_role = form
        .job_role
        .ok_or_else(|| AppError::Validation("job_role is required".to_string()))?;
    let job_category = form
        .job_category
        .ok_or_else(|| AppError::Validation("job_category is required".to_string()))?;

    let profile = resolve_profile(
        &state.engine.taxonomy,
        &state.engine.phrases,
        &job_role,
        &job_category,
        form.job_description.as_deref(),
    )?;

    let meta = RequestMeta {
        document_id: Uuid::new_v4(),
        source_filename: document.filename.clone(),
        job_role: profile.role.clone(),
        job_category: profile.category.clone(),
    };

    info!(
        mode = mode.as_str(),
        role = %profile.role,
        file = %meta.source_filename,
        "analysis requested"
    );

    let request = AnalysisRequest {
        document,
        profile,
        job_description: form.job_description.clone(),
        meta,
    };
    let result = state.analyzer(mode).produce_analysis(request).await?;

    // Anonymous callers get their result back but nothing is persisted.
    let analysis_id = match form.user_id {
        Some(user_id) => Some(
            store::insert_analysis(&state.db, user_id, form.job_description.as_deref(), &result)
                .await?,
        ),
        None => None,
    };

    Ok(Json(AnalysisResponse {
        success: true,
        analysis: result,
        analysis_id,
    }))
}

/// POST /api/v1/analysis/standard
pub async fn handle_standard_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(state, multipart, AnalysisType::Standard).await
}

/// POST /api/v1/analysis/ai
pub async fn handle_ai_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(state, multipart, AnalysisType::Ai).await
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RoleTaxonomy> {
    Json(state.engine.taxonomy.clone())
}

/// GET /api/v1/analysis
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisListResponse>, AppError> {
    let analyses = store::list_analyses(&state.db, params.user_id).await?;
    Ok(Json(AnalysisListResponse {
        success: true,
        analyses,
    }))
}

/// GET /api/v1/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisItemResponse>, AppError> {
    let analysis = store::get_analysis(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(AnalysisItemResponse {
        success: true,
        analysis,
    }))
}

/// DELETE /api/v1/analysis/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let deleted = store::delete_analysis(&state.db, params.user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
