//! Ranking pipeline — evaluates uploads one at a time, then sorts once.
//!
//! Flow: for each upload in order → evaluate (upload + generate + cleanup
//! completes before the next document starts) → collect → stable sort by
//! match percentage descending.

use tracing::info;

use crate::ranking::evaluator::ResumeEvaluator;
use crate::ranking::models::{RankedResult, ResumeUpload};

/// Evaluates every upload and returns results sorted by `match_percentage`,
/// highest first.
///
/// Results are collected in literal upload order before sorting, and the
/// sort is stable, so equal scores keep their upload order. No call overlaps
/// another; the only state shared between iterations is the append-only
/// output vector.
pub async fn rank(
    evaluator: &dyn ResumeEvaluator,
    resumes: &[ResumeUpload],
    job_description: &str,
) -> Vec<RankedResult> {
    let mut results = Vec::with_capacity(resumes.len());

    for (idx, resume) in resumes.iter().enumerate() {
        info!(
            "Evaluating resume {}/{}: '{}'",
            idx + 1,
            resumes.len(),
            resume.display_name
        );
        let evaluation = evaluator.evaluate(resume, job_description).await;
        results.push(RankedResult::new(resume.display_name.clone(), evaluation));
    }

    results.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    results
}
