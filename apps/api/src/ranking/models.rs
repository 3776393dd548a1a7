//! Data model for resume evaluation and ranking.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One scored resume, as returned by the evaluation model.
///
/// All six fields are required on deserialization — a reply missing any of
/// them fails parsing and is replaced by [`ScoreRecord::fallback`]. Scores
/// are whatever integers the model returned; the 0–100 range the rubric asks
/// for is not enforced locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ats_score: i64,
    pub match_percentage: i64,
    pub skills_missing: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub summary: String,
}

impl ScoreRecord {
    /// The zero-valued record substituted when a reply cannot be used.
    /// Distinguishable from a genuinely low-scoring resume only via `summary`.
    pub fn fallback(reason: &str) -> Self {
        Self {
            ats_score: 0,
            match_percentage: 0,
            skills_missing: vec![],
            strengths: vec![],
            weaknesses: vec![],
            summary: format!("Parsing error: {reason}"),
        }
    }
}

/// Outcome of evaluating one resume.
///
/// `Fallback` is an explicit branch, not an exception side effect; callers
/// pattern-match or collapse via [`Evaluation::into_record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Parsed(ScoreRecord),
    Fallback { reason: String },
}

impl Evaluation {
    /// Collapses the outcome into a displayable record.
    pub fn into_record(self) -> ScoreRecord {
        match self {
            Evaluation::Parsed(record) => record,
            Evaluation::Fallback { reason } => ScoreRecord::fallback(&reason),
        }
    }
}

/// One uploaded PDF resume: raw bytes plus the display name shown in results.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub display_name: String,
    pub content: Bytes,
}

/// A resume's position in the ranked output: display name, the two headline
/// scores copied out for summary tables, and the full detail record.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub resume_name: String,
    pub ats_score: i64,
    pub match_percentage: i64,
    pub details: ScoreRecord,
}

impl RankedResult {
    pub fn new(resume_name: String, evaluation: Evaluation) -> Self {
        let details = evaluation.into_record();
        Self {
            resume_name,
            ats_score: details.ats_score,
            match_percentage: details.match_percentage,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_record_is_all_zero_with_diagnostic_summary() {
        let record = ScoreRecord::fallback("Could not decode response.");
        assert_eq!(record.ats_score, 0);
        assert_eq!(record.match_percentage, 0);
        assert!(record.skills_missing.is_empty());
        assert!(record.strengths.is_empty());
        assert!(record.weaknesses.is_empty());
        assert_eq!(record.summary, "Parsing error: Could not decode response.");
    }

    #[test]
    fn test_into_record_passes_parsed_through_unchanged() {
        let record = ScoreRecord {
            ats_score: 80,
            match_percentage: 75,
            skills_missing: vec!["Kafka".to_string()],
            strengths: vec!["SQL".to_string()],
            weaknesses: vec![],
            summary: "Solid analyst profile.".to_string(),
        };
        let out = Evaluation::Parsed(record.clone()).into_record();
        assert_eq!(out, record);
    }

    #[test]
    fn test_into_record_collapses_fallback() {
        let out = Evaluation::Fallback {
            reason: "invalid JSON".to_string(),
        }
        .into_record();
        assert_eq!(out.match_percentage, 0);
        assert!(out.summary.contains("Parsing error"));
        assert!(out.summary.contains("invalid JSON"));
    }

    #[test]
    fn test_ranked_result_copies_headline_scores_from_details() {
        let record = ScoreRecord {
            ats_score: 40,
            match_percentage: 20,
            skills_missing: vec![],
            strengths: vec![],
            weaknesses: vec!["No cloud experience".to_string()],
            summary: "Partial match.".to_string(),
        };
        let ranked = RankedResult::new("cand.pdf".to_string(), Evaluation::Parsed(record));
        assert_eq!(ranked.resume_name, "cand.pdf");
        assert_eq!(ranked.ats_score, 40);
        assert_eq!(ranked.match_percentage, 20);
        assert_eq!(ranked.details.match_percentage, 20);
    }
}
