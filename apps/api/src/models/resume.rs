use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeCritique {
    #[serde(alias = "missingKeywords")]
    pub missing_keywords: Vec<String>,
    #[serde(alias = "quantificationFeedback")]
    pub quantification_feedback: String,
    #[serde(alias = "formattingFeedback")]
    pub formatting_feedback: String,
}

/// An ATS-oriented rewrite of a resume for one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResumeSuggestion {
    #[serde(alias = "tailoredResume")]
    pub tailored_resume: String,
    pub explanation: String,
}
