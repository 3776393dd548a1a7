/// Gemini Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model and file-storage interactions MUST go through this module.
///
/// Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// The model used for all evaluation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("resumable upload handshake returned no upload URL")]
    UploadSession,

    #[error("model returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Gemini REST, camelCase)
// ────────────────────────────────────────────────────────────────────────────

/// One content part of a generateContent request: plain text or a reference
/// to a previously uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    file_uri: String,
    mime_type: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    pub fn pdf(file_uri: impl Into<String>) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                file_uri: file_uri.into(),
                mime_type: PDF_MIME.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first text part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

/// Addressable reference to a file held in the provider's transient storage.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    /// Resource name, e.g. `files/abc-123`. Used for deletion.
    pub name: String,
    /// URI handed back into generateContent as `fileData.fileUri`.
    pub uri: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileRef,
}

#[derive(Debug, Serialize)]
struct UploadStartRequest<'a> {
    file: UploadFileMetadata<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadFileMetadata<'a> {
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Gemini client used by the evaluator. Wraps the Files API and
/// the generateContent endpoint. Each call is made exactly once: failures are
/// reported, never retried.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Uploads a PDF to the provider's file storage and returns its
    /// addressable reference.
    ///
    /// Files API resumable protocol, two requests: a `start` handshake
    /// carrying the metadata, then a single `upload, finalize` request with
    /// the raw bytes sent to the URL returned by the handshake. The bytes go
    /// straight from memory; nothing is staged on local disk.
    pub async fn upload_pdf(
        &self,
        display_name: &str,
        content: Bytes,
    ) -> Result<FileRef, GeminiError> {
        let size = content.len();
        let start = self
            .client
            .post(format!("{GEMINI_API_BASE}/upload/v1beta/files"))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size)
            .header("X-Goog-Upload-Header-Content-Type", PDF_MIME)
            .json(&UploadStartRequest {
                file: UploadFileMetadata { display_name },
            })
            .send()
            .await?;

        let status = start.status();
        if !status.is_success() {
            let body = start.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: extract_api_message(body),
            });
        }

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(GeminiError::UploadSession)?;

        let finalize = self
            .client
            .post(upload_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(content)
            .send()
            .await?;

        let status = finalize.status();
        let body = finalize.text().await?;
        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: extract_api_message(body),
            });
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)?;
        debug!(
            "Uploaded '{}' as {} ({size} bytes)",
            display_name, uploaded.file.name
        );

        Ok(uploaded.file)
    }

    /// Makes one generateContent call and returns the reply text.
    /// No retry, no backoff: a failed call surfaces immediately.
    pub async fn generate(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(format!(
                "{GEMINI_API_BASE}/v1beta/models/{MODEL}:generateContent"
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: extract_api_message(body),
            });
        }

        let reply: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &reply.usage_metadata {
            debug!(
                "generateContent succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        reply
            .text()
            .map(str::to_owned)
            .ok_or(GeminiError::EmptyContent)
    }

    /// Deletes an uploaded file from the provider's storage.
    /// Callers treat this as best-effort cleanup; files expire server-side anyway.
    pub async fn delete_file(&self, name: &str) -> Result<(), GeminiError> {
        let response = self
            .client
            .delete(format!("{GEMINI_API_BASE}/v1beta/{name}"))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: extract_api_message(body),
            });
        }
        Ok(())
    }
}

/// Pulls the human-readable message out of the provider's JSON error
/// envelope, falling back to the raw body.
fn extract_api_message(body: String) -> String {
    serde_json::from_str::<GeminiApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_part_serializes_without_file_data() {
        let value = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(value, json!({ "text": "hello" }));
    }

    #[test]
    fn test_pdf_part_serializes_to_camel_case_file_data() {
        let value = serde_json::to_value(Part::pdf("https://files/abc")).unwrap();
        assert_eq!(
            value,
            json!({
                "fileData": {
                    "fileUri": "https://files/abc",
                    "mimeType": "application/pdf"
                }
            })
        );
    }

    #[test]
    fn test_response_text_returns_first_text_part() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {"text": "{\"ats_score\": 80}"}
                        ],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": {
                "promptTokenCount": 1200,
                "candidatesTokenCount": 90,
                "totalTokenCount": 1290
            }
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), Some("{\"ats_score\": 80}"));
        assert_eq!(
            response.usage_metadata.unwrap().prompt_token_count,
            Some(1200)
        );
    }

    #[test]
    fn test_response_text_is_none_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_upload_response_deserializes_file_ref() {
        let raw = r#"{
            "file": {
                "name": "files/abc-123",
                "displayName": "resume.pdf",
                "mimeType": "application/pdf",
                "sizeBytes": "53412",
                "uri": "https://generativelanguage.googleapis.com/v1beta/files/abc-123",
                "state": "ACTIVE"
            }
        }"#;
        let parsed: UploadResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.file.name, "files/abc-123");
        assert!(parsed.file.uri.ends_with("files/abc-123"));
    }

    #[test]
    fn test_extract_api_message_prefers_error_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_api_message(body.to_string()), "API key not valid");
    }

    #[test]
    fn test_extract_api_message_falls_back_to_raw_body() {
        assert_eq!(
            extract_api_message("<html>502</html>".to_string()),
            "<html>502</html>"
        );
    }
}
