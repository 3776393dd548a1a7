//! Axum route handlers for the Ranking API.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ranking::models::{RankedResult, ResumeUpload};
use crate::ranking::pipeline::rank;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub run_id: Uuid,
    pub ranked_at: DateTime<Utc>,
    /// Already in ranked order: match percentage descending, upload order on ties.
    pub results: Vec<RankedResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rankings
///
/// Multipart form: one `job_description` text field plus one or more
/// `resumes` PDF file parts (the part's file name becomes the display name).
/// An empty job description or an empty batch is rejected here; the pipeline
/// is never entered.
pub async fn handle_rank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankResponse>, AppError> {
    let mut job_description = String::new();
    let mut resumes: Vec<ResumeUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                job_description = field.text().await?;
            }
            "resumes" => {
                let display_name = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("resume-{}.pdf", resumes.len() + 1));
                let content = field.bytes().await?;
                resumes.push(ResumeUpload {
                    display_name,
                    content,
                });
            }
            // Unknown parts are ignored.
            _ => {}
        }
    }

    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "upload at least one resume under the 'resumes' field".to_string(),
        ));
    }

    let results = rank(state.evaluator.as_ref(), &resumes, &job_description).await;

    Ok(Json(RankResponse {
        run_id: Uuid::new_v4(),
        ranked_at: Utc::now(),
        results,
    }))
}
