// Prompt constants for resume evaluation. The rubric travels ahead of every
// resume; the job description is appended as its own part after the file.

/// Evaluation rubric sent as the first content part of every scoring call.
/// The model must answer with strict JSON carrying exactly these six fields.
pub const ATS_RUBRIC: &str = r#"You are an ATS (Applicant Tracking System).
Evaluate the candidate's resume strictly in relation to the given job description.

Return ONLY this JSON:

{
  "ats_score": 0-100,
  "match_percentage": 0-100,
  "skills_missing": [],
  "strengths": [],
  "weaknesses": [],
  "summary": ""
}

Evaluation Rules:
1. Score ONLY based on skills, tools, and responsibilities clearly written in the resume.
2. The score MUST be relative to the job description provided.
3. Different job descriptions MUST produce different scores.
4. If the resume matches many core requirements, give high scores.
5. If partially matched, give medium scores.
6. If barely matched, give low scores.
7. This system MUST work for ALL types of resumes — HR, BDA, Data Analyst, ML, Cloud, etc.
8. Output STRICT JSON ONLY."#;

/// Prefix for the job-description part that closes the request.
pub const JOB_DESCRIPTION_PREFIX: &str = "Job Description:\n";
