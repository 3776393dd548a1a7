//! Evaluator — scores one resume against one job description by delegating
//! to the Gemini model and parsing its JSON reply.

use async_trait::async_trait;
use tracing::warn;

use crate::gemini::{GeminiClient, Part};
use crate::ranking::models::{Evaluation, ResumeUpload};
use crate::ranking::parse::parse_reply;
use crate::ranking::prompts::{ATS_RUBRIC, JOB_DESCRIPTION_PREFIX};

/// The evaluator seam. Implement this to swap the scoring backend without
/// touching the pipeline or handlers.
///
/// Carried in `AppState` as `Arc<dyn ResumeEvaluator>`.
#[async_trait]
pub trait ResumeEvaluator: Send + Sync {
    /// Total: every failure mode collapses into [`Evaluation::Fallback`],
    /// never a propagated error.
    async fn evaluate(&self, resume: &ResumeUpload, job_description: &str) -> Evaluation;
}

/// Production evaluator: one Files API upload plus one generateContent call
/// per resume. Service failures and unparseable replies alike become
/// fallback outcomes, so one bad document never aborts the rest of a run.
pub struct GeminiEvaluator {
    client: GeminiClient,
}

impl GeminiEvaluator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeEvaluator for GeminiEvaluator {
    async fn evaluate(&self, resume: &ResumeUpload, job_description: &str) -> Evaluation {
        let file = match self
            .client
            .upload_pdf(&resume.display_name, resume.content.clone())
            .await
        {
            Ok(file) => file,
            Err(e) => {
                warn!("Upload failed for '{}': {e}", resume.display_name);
                return Evaluation::Fallback {
                    reason: e.to_string(),
                };
            }
        };

        let reply = self
            .client
            .generate(build_parts(&file.uri, job_description))
            .await;

        // The provider-side copy is transient; release it whether or not
        // generation succeeded. A failed delete is logged, nothing more.
        if let Err(e) = self.client.delete_file(&file.name).await {
            warn!("Could not delete uploaded file {}: {e}", file.name);
        }

        let raw = match reply {
            Ok(text) => text,
            Err(e) => {
                warn!("generateContent failed for '{}': {e}", resume.display_name);
                return Evaluation::Fallback {
                    reason: e.to_string(),
                };
            }
        };

        match parse_reply(&raw) {
            Ok(record) => Evaluation::Parsed(record),
            Err(e) => {
                warn!("Unparseable reply for '{}': {e}", resume.display_name);
                Evaluation::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Request parts in their fixed order: rubric, resume file reference, then
/// the job description.
fn build_parts(file_uri: &str, job_description: &str) -> Vec<Part> {
    vec![
        Part::text(ATS_RUBRIC),
        Part::pdf(file_uri),
        Part::text(format!("{JOB_DESCRIPTION_PREFIX}{job_description}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parts_order_and_shape() {
        let parts = build_parts("https://files/abc", "Senior Data Analyst");
        let values: Vec<serde_json::Value> = parts
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect();

        assert_eq!(values.len(), 3);
        assert!(values[0]["text"]
            .as_str()
            .unwrap()
            .contains("Applicant Tracking System"));
        assert_eq!(values[1]["fileData"]["fileUri"], "https://files/abc");
        assert_eq!(values[1]["fileData"]["mimeType"], "application/pdf");
        assert_eq!(
            values[2]["text"].as_str().unwrap(),
            "Job Description:\nSenior Data Analyst"
        );
    }
}
