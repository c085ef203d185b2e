//! Resume analyzer and ATS tailor screens.

use serde::Serialize;

use crate::coach::CoachError;
use crate::models::resume::{ResumeCritique, TailoredResumeSuggestion};
use crate::screens::single_shot::SingleShot;
use crate::screens::FormError;
use crate::ticket::Ticket;

pub const ANALYZE_MISSING_INPUT: &str = "Please provide both resume text and a target role.";
pub const ANALYZE_FAILED: &str =
    "An error occurred while analyzing the resume. Please try again.";
pub const TAILOR_MISSING_INPUT: &str = "Please provide both your resume and a job description.";
pub const TAILOR_FAILED: &str = "An error occurred while tailoring the resume. Please try again.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeAnalyzer {
    resume_text: String,
    target_role: String,
    #[serde(flatten)]
    flow: SingleShot<ResumeCritique>,
}

impl ResumeAnalyzer {
    pub fn begin(
        &mut self,
        resume_text: String,
        target_role: String,
    ) -> Result<Ticket, FormError> {
        if resume_text.trim().is_empty() || target_role.trim().is_empty() {
            return Err(self.flow.reject(ANALYZE_MISSING_INPUT));
        }
        let ticket = self.flow.begin()?;
        self.resume_text = resume_text;
        self.target_role = target_role;
        Ok(ticket)
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<ResumeCritique, CoachError>,
    ) -> Result<ResumeCritique, FormError> {
        self.flow.complete(ticket, outcome, ANALYZE_FAILED)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeTailor {
    resume_text: String,
    job_description: String,
    #[serde(flatten)]
    flow: SingleShot<TailoredResumeSuggestion>,
}

impl ResumeTailor {
    pub fn begin(
        &mut self,
        resume_text: String,
        job_description: String,
    ) -> Result<Ticket, FormError> {
        if resume_text.trim().is_empty() || job_description.trim().is_empty() {
            return Err(self.flow.reject(TAILOR_MISSING_INPUT));
        }
        let ticket = self.flow.begin()?;
        self.resume_text = resume_text;
        self.job_description = job_description;
        Ok(ticket)
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<TailoredResumeSuggestion, CoachError>,
    ) -> Result<TailoredResumeSuggestion, FormError> {
        self.flow.complete(ticket, outcome, TAILOR_FAILED)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
