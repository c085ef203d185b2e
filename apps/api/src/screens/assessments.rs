//! Skill assessments: pick a skill, answer one generated question, see the result.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::coach::CoachError;
use crate::models::learning::AssessmentQuestion;
use crate::screens::FormError;
use crate::ticket::{self, Ticket};

pub const QUESTION_FAILED: &str = "Failed to load assessment question. Please try again.";
pub const NO_OPTION_SELECTED: &str = "Please select an answer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skill {
    Communication,
    #[serde(rename = "Problem-Solving")]
    ProblemSolving,
    #[serde(rename = "SQL")]
    Sql,
}

impl Skill {
    pub fn label(&self) -> &'static str {
        match self {
            Skill::Communication => "Communication",
            Skill::ProblemSolving => "Problem-Solving",
            Skill::Sql => "SQL",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    #[default]
    Selection,
    Taking,
    Result,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Assessments {
    stage: AssessmentStage,
    skill: Option<Skill>,
    question: Option<AssessmentQuestion>,
    selected_option: Option<usize>,
    is_correct: Option<bool>,
    #[serde(rename = "loading", serialize_with = "ticket::serialize_outstanding")]
    in_flight: Option<Ticket>,
    error: Option<&'static str>,
}

impl Assessments {
    pub fn stage(&self) -> AssessmentStage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Enters the taking stage and waits for the question.
    pub fn select_skill(&mut self, skill: Skill) -> Result<Ticket, FormError> {
        if self.stage != AssessmentStage::Selection || self.is_loading() {
            return Err(FormError::Busy);
        }
        self.skill = Some(skill);
        self.stage = AssessmentStage::Taking;
        self.error = None;
        let ticket = Ticket::issue();
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    pub fn question_loaded(
        &mut self,
        ticket: Ticket,
        outcome: Result<AssessmentQuestion, CoachError>,
    ) -> Result<(), FormError> {
        if self.in_flight != Some(ticket) {
            return Err(FormError::Stale);
        }
        self.in_flight = None;
        match outcome {
            Ok(question) => {
                self.question = Some(question);
                Ok(())
            }
            Err(e) => {
                error!("Error loading assessment question: {e}");
                self.stage = AssessmentStage::Selection;
                self.skill = None;
                self.error = Some(QUESTION_FAILED);
                Err(FormError::Failed(QUESTION_FAILED))
            }
        }
    }

    pub fn choose_option(&mut self, index: usize) -> Result<(), FormError> {
        let question = self.taking_question()?;
        if index >= question.options.len() {
            return Err(FormError::Invalid(NO_OPTION_SELECTED));
        }
        self.selected_option = Some(index);
        Ok(())
    }

    /// Grades the chosen option. Does nothing without a selection.
    pub fn submit(&mut self) -> Result<bool, FormError> {
        let correct_index = self.taking_question()?.correct_option_index;
        let selected = self
            .selected_option
            .ok_or(FormError::Invalid(NO_OPTION_SELECTED))?;
        let correct = selected == correct_index;
        self.is_correct = Some(correct);
        self.stage = AssessmentStage::Result;
        Ok(correct)
    }

    /// Goal handed to the learning path from the result screen.
    pub fn learning_goal(&self) -> Option<String> {
        match (self.stage, self.skill) {
            (AssessmentStage::Result, Some(skill)) => {
                Some(format!("Improve my {} skills", skill.label()))
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn taking_question(&self) -> Result<&AssessmentQuestion, FormError> {
        match (&self.question, self.stage, self.is_loading()) {
            (Some(question), AssessmentStage::Taking, false) => Ok(question),
            _ => Err(FormError::Busy),
        }
    }
}
