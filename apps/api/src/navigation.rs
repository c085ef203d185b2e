//! View routing: the current screen plus the state shared between screens.
//!
//! Screens that need data which does not exist yet redirect instead of
//! rendering. "Back" always goes to a fixed parent, never through history.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::feedback::InterviewFeedback;
use crate::models::profile::UserProfile;
use crate::models::resume::ResumeCritique;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    #[default]
    Landing,
    Dashboard,
    Onboarding,
    Interview,
    Feedback,
    ResumeAnalyzer,
    Assessments,
    ResumeTailor,
    LearningPath,
    RecruiterDashboard,
    CoachDashboard,
    CombinedReport,
    Pricing,
    Kpis,
    TestingPlan,
    Roadmap,
    Infrastructure,
    Partnerships,
    EdgeCases,
    Deliverables,
    AcceptanceCriteria,
    Marketing,
}

impl View {
    /// Where "back" leads from this view.
    pub fn parent(self) -> View {
        match self {
            View::Landing | View::Dashboard => View::Landing,
            _ => View::Dashboard,
        }
    }

    /// Static pages with no behavior of their own.
    pub fn is_informational(self) -> bool {
        matches!(
            self,
            View::Landing
                | View::RecruiterDashboard
                | View::CoachDashboard
                | View::Kpis
                | View::TestingPlan
                | View::Roadmap
                | View::Infrastructure
                | View::Partnerships
                | View::EdgeCases
                | View::Deliverables
                | View::AcceptanceCriteria
                | View::Marketing
        )
    }
}

/// Current view and the cross-screen state. Owned by one client session.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    view: View,
    profile: Option<UserProfile>,
    feedback: Option<Vec<InterviewFeedback>>,
    resume_critique: Option<ResumeCritique>,
    learning_goal: String,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn feedback(&self) -> Option<&[InterviewFeedback]> {
        self.feedback.as_deref()
    }

    pub fn resume_critique(&self) -> Option<&ResumeCritique> {
        self.resume_critique.as_ref()
    }

    pub fn learning_goal(&self) -> &str {
        &self.learning_goal
    }

    /// Resolves redirect guards for `target` without changing anything.
    pub fn resolve(&self, target: View) -> View {
        match target {
            View::Interview if self.profile.is_none() => View::Onboarding,
            View::Feedback if self.feedback.is_none() || self.profile.is_none() => {
                View::Dashboard
            }
            View::CombinedReport
                if self.feedback.is_none()
                    || self.resume_critique.is_none()
                    || self.profile.is_none() =>
            {
                View::Dashboard
            }
            other => other,
        }
    }

    /// Switches to `target`, or to its redirect. Returns the view actually shown.
    pub fn navigate(&mut self, target: View) -> View {
        let resolved = self.resolve(target);
        if resolved != target {
            debug!("Redirecting {:?} -> {:?}", target, resolved);
        }
        self.view = resolved;
        resolved
    }

    pub fn back(&mut self) -> View {
        if self.view == View::LearningPath {
            self.learning_goal.clear();
        }
        let parent = self.view.parent();
        self.navigate(parent)
    }

    pub fn start_interview(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
        self.feedback = None;
        self.view = View::Interview;
    }

    /// Stores the completed feedback and shows the combined report when a
    /// resume critique already exists, otherwise the plain feedback report.
    pub fn finish_interview(&mut self, feedback: Vec<InterviewFeedback>) -> View {
        self.feedback = Some(feedback);
        let next = if self.resume_critique.is_some() {
            View::CombinedReport
        } else {
            View::Feedback
        };
        self.navigate(next)
    }

    pub fn resume_analyzed(&mut self, critique: ResumeCritique) {
        self.resume_critique = Some(critique);
    }

    pub fn create_learning_path(&mut self, goal: String) {
        self.learning_goal = goal;
        self.view = View::LearningPath;
    }

    /// Drops all shared state and returns to the landing page.
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
