use serde::{Deserialize, Serialize};

/// Model evaluation of one answer. Scores are expected to lie in 1–10 but are not clamped.
///
/// Field aliases accept the camelCase keys the evaluation prompt asks the model for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    #[serde(alias = "starScore")]
    pub star_score: f64,
    #[serde(alias = "contentScore")]
    pub content_score: f64,
    #[serde(alias = "clarityScore")]
    pub clarity_score: f64,
    #[serde(alias = "confidenceScore")]
    pub confidence_score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl AnswerFeedback {
    pub fn mean_score(&self) -> f64 {
        (self.star_score + self.content_score + self.clarity_score + self.confidence_score) / 4.0
    }
}

/// One answered question, in the order the questions were asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub question: String,
    pub answer: String,
    pub feedback: AnswerFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassLikelihood {
    /// Percentage, 0–100.
    pub likelihood: f64,
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_feedback_accepts_model_keys() {
        let json = r#"{
            "starScore": 7,
            "contentScore": 8.5,
            "clarityScore": 6,
            "confidenceScore": 9,
            "strengths": ["Clear structure"],
            "improvements": ["Quantify the result"]
        }"#;
        let feedback: AnswerFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.star_score, 7.0);
        assert_eq!(feedback.content_score, 8.5);
        assert!((feedback.mean_score() - 7.625).abs() < 1e-9);
    }

    #[test]
    fn test_answer_feedback_missing_scores_is_rejected() {
        let json = r#"{"starScore": 7, "strengths": [], "improvements": []}"#;
        assert!(serde_json::from_str::<AnswerFeedback>(json).is_err());
    }
}
