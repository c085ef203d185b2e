//! Feedback and combined reports shown after an interview.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, error};

use crate::coach::CoachError;
use crate::models::feedback::{AnswerFeedback, InterviewFeedback, PassLikelihood};
use crate::models::profile::UserProfile;
use crate::models::resume::ResumeCritique;
use crate::navigation::Navigator;
use crate::screens::FormError;
use crate::ticket::Ticket;

pub const EXAMPLE_ANSWER_FAILED: &str = "Could not load example answer.";
/// Improvements listed per answer before "show more".
pub const IMPROVEMENTS_PREVIEW: usize = 3;

const NO_SUCH_QUESTION: &str = "No answer exists at that position.";

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// Band for a 1–10 score.
    pub fn for_score(score: f64) -> Self {
        Self::banded(score, 8.0, 5.0)
    }

    pub fn for_percentage(percent: f64) -> Self {
        Self::banded(percent, 75.0, 50.0)
    }

    fn banded(value: f64, high: f64, medium: f64) -> Self {
        if value >= high {
            ScoreBand::High
        } else if value >= medium {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub value: f64,
    pub band: ScoreBand,
}

impl Score {
    fn new(value: f64) -> Self {
        Self {
            value,
            band: ScoreBand::for_score(value),
        }
    }
}

/// Per-dimension means over every answer, and their mean as the overall score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub overall: Score,
    pub star: Score,
    pub content: Score,
    pub clarity: Score,
    pub confidence: Score,
}

impl ScoreSummary {
    /// `None` when there is nothing to average.
    pub fn from_feedback(feedback: &[InterviewFeedback]) -> Option<Self> {
        if feedback.is_empty() {
            return None;
        }
        let n = feedback.len() as f64;
        let mean = |f: fn(&AnswerFeedback) -> f64| {
            feedback.iter().map(|item| f(&item.feedback)).sum::<f64>() / n
        };
        let star = mean(|f| f.star_score);
        let content = mean(|f| f.content_score);
        let clarity = mean(|f| f.clarity_score);
        let confidence = mean(|f| f.confidence_score);
        let overall = (star + content + clarity + confidence) / 4.0;

        Some(Self {
            overall: Score::new(overall),
            star: Score::new(star),
            content: Score::new(content),
            clarity: Score::new(clarity),
            confidence: Score::new(confidence),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback report
// ────────────────────────────────────────────────────────────────────────────

/// What the host should do for an example-answer request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleLookup {
    Cached(String),
    Fetch { ticket: Ticket, question: String },
}

#[derive(Debug, Clone)]
pub struct FeedbackReport {
    profile: UserProfile,
    feedback: Vec<InterviewFeedback>,
    summary: Option<ScoreSummary>,
    pass_likelihood: Option<PassLikelihood>,
    pass_likelihood_request: Option<Ticket>,
    example_answers: BTreeMap<usize, String>,
    example_request: Option<(usize, Ticket)>,
    expanded: BTreeSet<usize>,
}

impl FeedbackReport {
    pub fn new(profile: UserProfile, feedback: Vec<InterviewFeedback>) -> Self {
        let summary = ScoreSummary::from_feedback(&feedback);
        Self {
            profile,
            feedback,
            summary,
            pass_likelihood: None,
            pass_likelihood_request: None,
            example_answers: BTreeMap::new(),
            example_request: None,
            expanded: BTreeSet::new(),
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Overall score to estimate from, when the estimate is still owed.
    pub fn begin_pass_likelihood(&mut self) -> Option<(Ticket, f64)> {
        if self.pass_likelihood.is_some() || self.pass_likelihood_request.is_some() {
            return None;
        }
        let overall = self.summary.as_ref()?.overall.value;
        let ticket = Ticket::issue();
        self.pass_likelihood_request = Some(ticket);
        Some((ticket, overall))
    }

    /// An estimate requested by a report that has since been replaced is dropped.
    pub fn pass_likelihood_loaded(
        &mut self,
        ticket: Ticket,
        outcome: Result<PassLikelihood, CoachError>,
    ) -> Result<(), CoachError> {
        if self.pass_likelihood_request != Some(ticket) {
            debug!("Dropping pass likelihood for a replaced report");
            return Ok(());
        }
        self.pass_likelihood_request = None;
        self.pass_likelihood = Some(outcome?);
        Ok(())
    }

    pub fn begin_example(&mut self, index: usize) -> Result<ExampleLookup, FormError> {
        let item = self
            .feedback
            .get(index)
            .ok_or(FormError::Invalid(NO_SUCH_QUESTION))?;
        if let Some(answer) = self.example_answers.get(&index) {
            return Ok(ExampleLookup::Cached(answer.clone()));
        }
        if self.example_request.is_some() {
            return Err(FormError::Busy);
        }
        let ticket = Ticket::issue();
        self.example_request = Some((index, ticket));
        Ok(ExampleLookup::Fetch {
            ticket,
            question: item.question.clone(),
        })
    }

    /// Caches the example fetched under `ticket`. A failed call caches the
    /// apology message.
    pub fn example_loaded(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, CoachError>,
    ) -> Result<String, FormError> {
        let index = match self.example_request {
            Some((index, outstanding)) if outstanding == ticket => index,
            _ => return Err(FormError::Stale),
        };
        self.example_request = None;
        let answer = outcome.unwrap_or_else(|e| {
            error!("Failed to load example answer: {e}");
            EXAMPLE_ANSWER_FAILED.to_string()
        });
        self.example_answers.insert(index, answer.clone());
        Ok(answer)
    }

    /// Flips "show more" for one answer's improvements. Returns the new state.
    pub fn toggle_improvements(&mut self, index: usize) -> Result<bool, FormError> {
        if index >= self.feedback.len() {
            return Err(FormError::Invalid(NO_SUCH_QUESTION));
        }
        if self.expanded.remove(&index) {
            Ok(false)
        } else {
            self.expanded.insert(index);
            Ok(true)
        }
    }

    pub fn visible_improvements(&self, index: usize) -> &[String] {
        let Some(item) = self.feedback.get(index) else {
            return &[];
        };
        let all = &item.feedback.improvements;
        if self.expanded.contains(&index) {
            all.as_slice()
        } else {
            &all[..all.len().min(IMPROVEMENTS_PREVIEW)]
        }
    }

    pub fn snapshot(&self) -> FeedbackReportView {
        let items = self
            .feedback
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let visible = self.visible_improvements(index).to_vec();
                FeedbackItemView {
                    question: item.question.clone(),
                    answer: item.answer.clone(),
                    mean_score: Score::new(item.feedback.mean_score()),
                    strengths: item.feedback.strengths.clone(),
                    hidden_improvements: item.feedback.improvements.len() - visible.len(),
                    improvements: visible,
                    expanded: self.expanded.contains(&index),
                    example_answer: self.example_answers.get(&index).cloned(),
                    example_loading: self
                        .example_request
                        .is_some_and(|(loading, _)| loading == index),
                }
            })
            .collect();

        FeedbackReportView {
            profile: self.profile.clone(),
            summary: self.summary.clone(),
            pass_likelihood: self.pass_likelihood.as_ref().map(|p| PassLikelihoodView {
                likelihood: p.likelihood,
                rationale: p.rationale.clone(),
                band: ScoreBand::for_percentage(p.likelihood),
            }),
            pass_likelihood_loading: self.pass_likelihood_request.is_some(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PassLikelihoodView {
    pub likelihood: f64,
    pub rationale: String,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackItemView {
    pub question: String,
    pub answer: String,
    pub mean_score: Score,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Count behind "Show N More...".
    pub hidden_improvements: usize,
    pub expanded: bool,
    pub example_answer: Option<String>,
    pub example_loading: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReportView {
    pub profile: UserProfile,
    pub summary: Option<ScoreSummary>,
    pub pass_likelihood: Option<PassLikelihoodView>,
    pub pass_likelihood_loading: bool,
    pub items: Vec<FeedbackItemView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Combined report
// ────────────────────────────────────────────────────────────────────────────

/// Interview results next to the stored resume critique.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub profile: UserProfile,
    pub summary: Option<ScoreSummary>,
    pub feedback: Vec<InterviewFeedback>,
    pub resume_critique: ResumeCritique,
}

impl CombinedReport {
    /// `None` until a profile, a finished interview and a critique all exist.
    pub fn from_navigator(navigator: &Navigator) -> Option<Self> {
        let profile = navigator.profile()?;
        let feedback = navigator.feedback()?;
        let critique = navigator.resume_critique()?;
        Some(Self {
            profile: profile.clone(),
            summary: ScoreSummary::from_feedback(feedback),
            feedback: feedback.to_vec(),
            resume_critique: critique.clone(),
        })
    }
}
