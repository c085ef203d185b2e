use serde::Serialize;

use crate::coach::CoachError;
use crate::models::learning::LearningResource;
use crate::screens::single_shot::SingleShot;
use crate::screens::FormError;
use crate::ticket::Ticket;

pub const GOAL_REQUIRED: &str = "Please enter a skill or goal.";
pub const PATH_FAILED: &str =
    "An error occurred while generating the learning path. Please try again.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct LearningPathScreen {
    goal: String,
    #[serde(flatten)]
    flow: SingleShot<Vec<LearningResource>>,
}

impl LearningPathScreen {
    /// Screen opened with a goal handed over from another screen.
    pub fn with_goal(goal: &str) -> Self {
        Self {
            goal: goal.to_string(),
            ..Self::default()
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// True when the screen was opened with a goal and has not generated yet.
    pub fn needs_initial_generation(&self) -> bool {
        !self.goal.trim().is_empty()
            && self.flow.result().is_none()
            && !self.flow.is_loading()
            && self.flow.error().is_none()
    }

    pub fn begin(&mut self, goal: String) -> Result<Ticket, FormError> {
        if goal.trim().is_empty() {
            return Err(self.flow.reject(GOAL_REQUIRED));
        }
        let ticket = self.flow.begin()?;
        self.goal = goal;
        Ok(ticket)
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<LearningResource>, CoachError>,
    ) -> Result<Vec<LearningResource>, FormError> {
        self.flow.complete(ticket, outcome, PATH_FAILED)
    }

}
