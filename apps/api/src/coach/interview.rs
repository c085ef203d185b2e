//! Interview features: question generation, answer evaluation, pass likelihood
//! and example answers.

use crate::coach::prompts::{
    EVALUATION_PROMPT_TEMPLATE, EXAMPLE_ANSWER_PROMPT_TEMPLATE, PASS_LIKELIHOOD_PROMPT_TEMPLATE,
    QUESTIONS_PROMPT_TEMPLATE,
};
use crate::coach::{or_fallback, Coach, CoachError};
use crate::llm_client::prompts::PRIVACY_INSTRUCTION;
use crate::llm_client::{schema, LlmError};
use crate::models::feedback::{AnswerFeedback, PassLikelihood};
use crate::models::profile::UserProfile;

pub const PASS_LIKELIHOOD_FALLBACK_RATIONALE: &str =
    "This is a solid score, showing good potential for success.";
pub const EXAMPLE_ANSWER_FALLBACK: &str =
    "Sorry, I couldn't generate an example answer at this time. Please try again later.";

impl Coach {
    /// Generates the ordered question list for an interview.
    /// Anything other than a non-empty array of strings yields the generic five.
    pub async fn generate_interview_questions(
        &self,
        profile: &UserProfile,
    ) -> Result<Vec<String>, CoachError> {
        self.ensure_configured()?;

        let prompt = QUESTIONS_PROMPT_TEMPLATE
            .replace("{experience_level}", profile.experience_level.label())
            .replace("{job_title}", &profile.job_title)
            .replace("{industry}", profile.industry.label())
            .replace("{interview_type}", profile.interview_type.label());

        let result = self
            .call_json::<Vec<String>>(&prompt, &schema::array(schema::string()))
            .await
            .and_then(|questions| {
                if questions.is_empty() {
                    Err(LlmError::InvalidShape(
                        "question list was empty".to_string(),
                    ))
                } else {
                    Ok(questions)
                }
            });

        Ok(or_fallback("generating questions", result, || {
            fallback_questions(&profile.job_title)
        }))
    }

    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<AnswerFeedback, CoachError> {
        self.ensure_configured()?;

        let prompt = EVALUATION_PROMPT_TEMPLATE
            .replace("{question}", question)
            .replace("{answer}", answer)
            .replace("{privacy_instruction}", PRIVACY_INSTRUCTION);

        let response_schema = schema::object(&[
            ("starScore", schema::number()),
            ("contentScore", schema::number()),
            ("clarityScore", schema::number()),
            ("confidenceScore", schema::number()),
            ("strengths", schema::array(schema::string())),
            ("improvements", schema::array(schema::string())),
        ]);

        let result = self.call_json(&prompt, &response_schema).await;
        Ok(or_fallback("evaluating answer", result, fallback_evaluation))
    }

    /// Estimates the chance of passing from the averaged 0–10 interview score.
    pub async fn generate_pass_likelihood(
        &self,
        overall_score: f64,
    ) -> Result<PassLikelihood, CoachError> {
        self.ensure_configured()?;

        let prompt = PASS_LIKELIHOOD_PROMPT_TEMPLATE
            .replace("{overall_score}", &format!("{overall_score:.1}"));
        let response_schema = schema::object(&[
            ("likelihood", schema::number()),
            ("rationale", schema::string()),
        ]);

        let result = self.call_json(&prompt, &response_schema).await;
        Ok(or_fallback("generating pass likelihood", result, || {
            fallback_pass_likelihood(overall_score)
        }))
    }

    /// Free-text model answer for one question, written as the profile's role.
    pub async fn generate_example_answer(
        &self,
        question: &str,
        profile: &UserProfile,
    ) -> Result<String, CoachError> {
        self.ensure_configured()?;

        let prompt = EXAMPLE_ANSWER_PROMPT_TEMPLATE
            .replace("{experience_level}", profile.experience_level.label())
            .replace("{job_title}", &profile.job_title)
            .replace("{industry}", profile.industry.label())
            .replace("{question}", question);

        let result = self.call_text(&prompt).await;
        Ok(or_fallback("generating example answer", result, || {
            EXAMPLE_ANSWER_FALLBACK.to_string()
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallbacks
// ────────────────────────────────────────────────────────────────────────────

pub fn fallback_questions(job_title: &str) -> Vec<String> {
    let field = job_title.split(' ').next().unwrap_or_default();
    vec![
        "Tell me about a challenging project you worked on.".to_string(),
        "How do you handle disagreements with team members?".to_string(),
        "Describe a time you had to learn a new technology quickly.".to_string(),
        format!("What are the core concepts of {field} that you find most important?"),
        "Where do you see yourself in 5 years?".to_string(),
    ]
}

pub fn fallback_evaluation() -> AnswerFeedback {
    AnswerFeedback {
        star_score: 5.0,
        content_score: 5.0,
        clarity_score: 5.0,
        confidence_score: 5.0,
        strengths: vec!["Completed the answer.".to_string()],
        improvements: vec![
            "There was an issue processing detailed feedback. Please try again.".to_string(),
        ],
    }
}

pub fn fallback_pass_likelihood(overall_score: f64) -> PassLikelihood {
    PassLikelihood {
        likelihood: (overall_score * 10.0).round().clamp(0.0, 100.0),
        rationale: PASS_LIKELIHOOD_FALLBACK_RATIONALE.to_string(),
    }
}
