//! Skill features: assessment questions and learning paths.

use tracing::warn;

use crate::coach::prompts::{ASSESSMENT_PROMPT_TEMPLATE, LEARNING_PATH_PROMPT_TEMPLATE};
use crate::coach::{or_fallback, Coach, CoachError};
use crate::llm_client::prompts::COACH_PERSONA;
use crate::llm_client::{schema, LlmError};
use crate::models::learning::{AssessmentQuestion, LearningResource, ResourceType};

impl Coach {
    /// One multiple-choice question for `skill`. Rejects anything but four options.
    pub async fn generate_assessment_question(
        &self,
        skill: &str,
    ) -> Result<AssessmentQuestion, CoachError> {
        self.ensure_configured()?;

        let prompt = ASSESSMENT_PROMPT_TEMPLATE.replace("{skill}", skill);
        let response_schema = schema::object(&[
            ("question", schema::string()),
            ("options", schema::array(schema::string())),
            ("correctOptionIndex", schema::number()),
            ("explanation", schema::string()),
        ]);

        let result = self
            .call_json::<AssessmentQuestion>(&prompt, &response_schema)
            .await
            .and_then(|question| {
                if question.is_well_formed() {
                    Ok(question)
                } else {
                    warn!(
                        "Assessment question had {} options (correct index {})",
                        question.options.len(),
                        question.correct_option_index
                    );
                    Err(LlmError::InvalidShape(
                        "API returned incorrect number of options.".to_string(),
                    ))
                }
            });

        Ok(or_fallback(
            "generating assessment question",
            result,
            fallback_assessment_question,
        ))
    }

    pub async fn generate_learning_path(
        &self,
        goal: &str,
    ) -> Result<Vec<LearningResource>, CoachError> {
        self.ensure_configured()?;

        let prompt = LEARNING_PATH_PROMPT_TEMPLATE
            .replace("{coach_persona}", COACH_PERSONA)
            .replace("{goal}", goal);
        let response_schema = schema::array(schema::object(&[
            ("type", schema::string()),
            ("title", schema::string()),
            ("description", schema::string()),
        ]));

        let result = self.call_json(&prompt, &response_schema).await;
        Ok(or_fallback(
            "generating learning path",
            result,
            fallback_learning_path,
        ))
    }
}

pub fn fallback_assessment_question() -> AssessmentQuestion {
    AssessmentQuestion {
        question: "Which of the following is NOT a core principle of Object-Oriented Programming?"
            .to_string(),
        options: ["Encapsulation", "Inheritance", "Polymorphism", "Compilation"]
            .into_iter()
            .map(String::from)
            .collect(),
        correct_option_index: 3,
        explanation: "Compilation is the process of converting source code into machine code; \
            it is not a principle of OOP. The other three are core concepts of OOP."
            .to_string(),
    }
}

pub fn fallback_learning_path() -> Vec<LearningResource> {
    vec![LearningResource {
        kind: ResourceType::Article,
        title: "Getting Started with Your Goal".to_string(),
        description: "An error occurred generating your path. Start by searching for \
            introductory articles on your topic."
            .to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;

    #[tokio::test]
    async fn test_assessment_with_three_options_falls_back() {
        let coach = Coach::new(Arc::new(ScriptedBackend::with_responses([
            r#"{"question": "Q?", "options": ["a", "b", "c"], "correctOptionIndex": 0, "explanation": "e"}"#,
        ])));
        let question = coach.generate_assessment_question("SQL").await.unwrap();
        assert_eq!(question, fallback_assessment_question());
        assert_eq!(question.correct_option_index, 3);
    }

    #[tokio::test]
    async fn test_assessment_with_four_options_passes() {
        let backend = Arc::new(ScriptedBackend::with_responses([
            r#"{"question": "Which join keeps unmatched left rows?",
                "options": ["INNER", "LEFT", "CROSS", "SELF"],
                "correctOptionIndex": 1,
                "explanation": "LEFT JOIN keeps every left row."}"#,
        ]));
        let coach = Coach::new(backend.clone());
        let question = coach.generate_assessment_question("SQL").await.unwrap();
        assert_eq!(question.options[question.correct_option_index], "LEFT");
        assert!(backend.prompts()[0].contains("test a candidate's SQL"));
    }

    #[tokio::test]
    async fn test_assessment_with_float_index_passes() {
        let coach = Coach::new(Arc::new(ScriptedBackend::with_responses([
            r#"{"question": "Which keyword removes duplicate rows?",
                "options": ["UNIQUE", "DISTINCT", "SINGLE", "ONLY"],
                "correctOptionIndex": 1.0,
                "explanation": "SELECT DISTINCT drops duplicates."}"#,
        ])));
        let question = coach.generate_assessment_question("SQL").await.unwrap();
        assert_ne!(question, fallback_assessment_question());
        assert_eq!(question.options[question.correct_option_index], "DISTINCT");
    }

    #[tokio::test]
    async fn test_learning_path_parsed() {
        let coach = Coach::new(Arc::new(ScriptedBackend::with_responses([
            r#"[{"type": "Course", "title": "SQL Basics", "description": "Learn SELECT."},
                {"type": "Practice", "title": "Query a dataset", "description": "Hands on."}]"#,
        ])));
        let path = coach.generate_learning_path("Learn SQL").await.unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].kind, ResourceType::Course);
    }

    #[tokio::test]
    async fn test_learning_path_fallback_on_unknown_type() {
        let coach = Coach::new(Arc::new(ScriptedBackend::with_responses([
            r#"[{"type": "Podcast", "title": "t", "description": "d"}]"#,
        ])));
        let path = coach.generate_learning_path("goal").await.unwrap();
        assert_eq!(path, fallback_learning_path());
    }

    #[tokio::test]
    async fn test_learning_path_missing_credential() {
        let coach = Coach::new(Arc::new(ScriptedBackend::unconfigured()));
        assert!(coach.generate_learning_path("goal").await.is_err());
    }
}
