//! Resume features: critique against a target role and ATS tailoring.

use crate::coach::prompts::{CRITIQUE_PROMPT_TEMPLATE, TAILOR_PROMPT_TEMPLATE};
use crate::coach::{or_fallback, Coach, CoachError};
use crate::llm_client::schema;
use crate::models::resume::{ResumeCritique, TailoredResumeSuggestion};

impl Coach {
    pub async fn critique_resume(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<ResumeCritique, CoachError> {
        self.ensure_configured()?;

        let prompt = CRITIQUE_PROMPT_TEMPLATE
            .replace("{resume_text}", resume_text)
            .replace("{target_role}", target_role);
        let response_schema = schema::object(&[
            ("missingKeywords", schema::array(schema::string())),
            ("quantificationFeedback", schema::string()),
            ("formattingFeedback", schema::string()),
        ]);

        let result = self.call_json(&prompt, &response_schema).await;
        Ok(or_fallback("critiquing resume", result, fallback_critique))
    }

    pub async fn tailor_resume_for_ats(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<TailoredResumeSuggestion, CoachError> {
        self.ensure_configured()?;

        let prompt = TAILOR_PROMPT_TEMPLATE
            .replace("{resume_text}", resume_text)
            .replace("{job_description}", job_description);
        let response_schema = schema::object(&[
            ("tailoredResume", schema::string()),
            ("explanation", schema::string()),
        ]);

        let result = self.call_json(&prompt, &response_schema).await;
        Ok(or_fallback("tailoring resume", result, fallback_tailoring))
    }
}

pub fn fallback_critique() -> ResumeCritique {
    ResumeCritique {
        missing_keywords: vec!["Error processing keywords.".to_string()],
        quantification_feedback: "Could not analyze quantification.".to_string(),
        formatting_feedback: "Could not analyze formatting.".to_string(),
    }
}

pub fn fallback_tailoring() -> TailoredResumeSuggestion {
    TailoredResumeSuggestion {
        tailored_resume: "There was an error generating the tailored resume. Please try again."
            .to_string(),
        explanation: "Could not generate an explanation due to an error.".to_string(),
    }
}
