//! Interview Session: the question/answer loop of one mock interview.
//!
//! Flow: Idle → QuestionLoading → Answering ⇄ Evaluating → Finished.
//!
//! Submission is split in two (`begin_submission` / `complete_submission`) so a
//! host can release its session lock while the evaluation call is in flight.
//! While an answer is being evaluated every further submit is rejected.
//! Outcomes carry the [`Ticket`] issued when the call started; one that does
//! not match the outstanding ticket is refused as stale.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::coach::CoachError;
use crate::interview::voice::{
    AudioContextState, RecordingState, VoiceCapture, VoiceEffect, VoiceEvent,
};
use crate::interview::volume::lit_bars;
use crate::models::feedback::{AnswerFeedback, InterviewFeedback};
use crate::models::profile::{InterviewMode, UserProfile};
use crate::ticket::Ticket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    Idle,
    QuestionLoading,
    Answering,
    Evaluating,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("Interview cannot do that while {0:?}")]
    InvalidPhase(InterviewPhase),

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("An answer is already being evaluated")]
    EvaluationInProgress,

    #[error("Voice capture is only available in voice interviews")]
    VoiceUnavailable,

    #[error("The interview is no longer waiting for this result")]
    Stale,

    #[error(transparent)]
    Coach(#[from] CoachError),
}

/// An answer handed off for evaluation.
#[derive(Debug, Clone)]
pub struct PendingEvaluation {
    pub ticket: Ticket,
    pub question: String,
    pub answer: String,
    /// Effects needed to stop a recording that was live at submit time.
    pub effects: Vec<VoiceEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    NextQuestion { index: usize, question: String },
    /// Every question answered; feedback is in question order.
    Finished(Vec<InterviewFeedback>),
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    profile: UserProfile,
    phase: InterviewPhase,
    questions: Vec<String>,
    current_index: usize,
    current_answer: String,
    conversation: Vec<ConversationEntry>,
    feedback: Vec<InterviewFeedback>,
    voice: Option<VoiceCapture>,
    in_flight: Option<Ticket>,
}

impl InterviewSession {
    pub fn new(profile: UserProfile) -> Self {
        let voice = (profile.interview_mode == InterviewMode::Voice).then(VoiceCapture::new);
        Self {
            profile,
            phase: InterviewPhase::Idle,
            questions: Vec::new(),
            current_index: 0,
            current_answer: String::new(),
            conversation: Vec::new(),
            feedback: Vec::new(),
            voice,
            in_flight: None,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn current_answer(&self) -> &str {
        &self.current_answer
    }

    pub fn conversation(&self) -> &[ConversationEntry] {
        &self.conversation
    }

    pub fn can_submit(&self) -> bool {
        self.phase == InterviewPhase::Answering && !self.current_answer.trim().is_empty()
    }

    // ── question loading ────────────────────────────────────────────────────

    pub fn begin_loading(&mut self) -> Result<Ticket, InterviewError> {
        if self.phase != InterviewPhase::Idle {
            return Err(InterviewError::InvalidPhase(self.phase));
        }
        self.phase = InterviewPhase::QuestionLoading;
        Ok(self.issue_ticket())
    }

    pub fn questions_loaded(
        &mut self,
        ticket: Ticket,
        questions: Vec<String>,
    ) -> Result<(), InterviewError> {
        self.redeem(ticket)?;
        if self.phase != InterviewPhase::QuestionLoading {
            return Err(InterviewError::InvalidPhase(self.phase));
        }
        self.conversation = questions
            .first()
            .map(|q| ConversationEntry {
                speaker: Speaker::Bot,
                text: q.clone(),
            })
            .into_iter()
            .collect();
        self.phase = if questions.is_empty() {
            InterviewPhase::Finished
        } else {
            InterviewPhase::Answering
        };
        self.questions = questions;
        self.current_index = 0;
        info!(
            "Interview ready with {} questions for '{}'",
            self.questions.len(),
            self.profile.job_title
        );
        Ok(())
    }

    pub fn loading_failed(&mut self, ticket: Ticket) {
        if self.redeem(ticket).is_ok() && self.phase == InterviewPhase::QuestionLoading {
            self.phase = InterviewPhase::Idle;
        }
    }

    // ── answering ───────────────────────────────────────────────────────────

    pub fn set_answer(&mut self, text: String) -> Result<(), InterviewError> {
        if self.phase != InterviewPhase::Answering {
            return Err(InterviewError::InvalidPhase(self.phase));
        }
        self.current_answer = text;
        Ok(())
    }

    /// Feeds a media event to the voice recorder.
    /// Transcripts only reach the pending answer while answering.
    pub fn handle_voice(&mut self, event: VoiceEvent) -> Result<Vec<VoiceEffect>, InterviewError> {
        if self.phase == InterviewPhase::Finished {
            return Err(InterviewError::InvalidPhase(self.phase));
        }
        let voice = self.voice.as_mut().ok_or(InterviewError::VoiceUnavailable)?;
        if self.phase == InterviewPhase::Answering {
            Ok(voice.handle(event, &mut self.current_answer))
        } else {
            let mut discarded = String::new();
            Ok(voice.handle(event, &mut discarded))
        }
    }

    // ── submission ──────────────────────────────────────────────────────────

    pub fn begin_submission(&mut self) -> Result<PendingEvaluation, InterviewError> {
        match self.phase {
            InterviewPhase::Answering => {}
            InterviewPhase::Evaluating => return Err(InterviewError::EvaluationInProgress),
            other => return Err(InterviewError::InvalidPhase(other)),
        }
        if self.current_answer.trim().is_empty() {
            return Err(InterviewError::EmptyAnswer);
        }

        let effects = match self.voice.as_mut() {
            Some(voice) if voice.state() == RecordingState::Recording => voice.stop(),
            _ => Vec::new(),
        };

        let answer = std::mem::take(&mut self.current_answer);
        self.conversation.push(ConversationEntry {
            speaker: Speaker::User,
            text: answer.clone(),
        });
        self.phase = InterviewPhase::Evaluating;

        Ok(PendingEvaluation {
            ticket: self.issue_ticket(),
            question: self.questions[self.current_index].clone(),
            answer,
            effects,
        })
    }

    /// Records the evaluation and moves to the next question, or finishes.
    pub fn complete_submission(
        &mut self,
        pending: PendingEvaluation,
        evaluation: AnswerFeedback,
    ) -> Result<Progress, InterviewError> {
        self.redeem(pending.ticket)?;
        if self.phase != InterviewPhase::Evaluating {
            return Err(InterviewError::InvalidPhase(self.phase));
        }
        self.feedback.push(InterviewFeedback {
            question: pending.question,
            answer: pending.answer,
            feedback: evaluation,
        });

        let next = self.current_index + 1;
        if next < self.questions.len() {
            self.current_index = next;
            let question = self.questions[next].clone();
            self.conversation.push(ConversationEntry {
                speaker: Speaker::Bot,
                text: question.clone(),
            });
            self.phase = InterviewPhase::Answering;
            Ok(Progress::NextQuestion {
                index: next,
                question,
            })
        } else {
            self.phase = InterviewPhase::Finished;
            info!(
                "Interview finished with {} answers",
                self.feedback.len()
            );
            Ok(Progress::Finished(self.feedback.clone()))
        }
    }

    /// Puts the answer back after a failed evaluation so the user can resend it.
    pub fn abort_submission(&mut self, pending: PendingEvaluation) {
        if self.redeem(pending.ticket).is_err() || self.phase != InterviewPhase::Evaluating {
            return;
        }
        if self
            .conversation
            .last()
            .is_some_and(|e| e.speaker == Speaker::User)
        {
            self.conversation.pop();
        }
        self.current_answer = pending.answer;
        self.phase = InterviewPhase::Answering;
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = Ticket::issue();
        self.in_flight = Some(ticket);
        ticket
    }

    /// Clears the outstanding ticket if `ticket` is it.
    fn redeem(&mut self, ticket: Ticket) -> Result<(), InterviewError> {
        if self.in_flight != Some(ticket) {
            return Err(InterviewError::Stale);
        }
        self.in_flight = None;
        Ok(())
    }

    /// Releases media resources when the interview screen goes away.
    pub fn teardown(&mut self) -> Vec<VoiceEffect> {
        self.voice
            .as_mut()
            .map(VoiceCapture::teardown)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> InterviewSnapshot {
        InterviewSnapshot {
            phase: self.phase,
            mode: self.profile.interview_mode,
            conversation: self.conversation.clone(),
            current_answer: self.current_answer.clone(),
            can_submit: self.can_submit(),
            question_number: (self.current_index + 1).min(self.questions.len()),
            question_count: self.questions.len(),
            progress_label: format!(
                "Question {} of {}",
                (self.current_index + 1).min(self.questions.len()),
                self.questions.len()
            ),
            voice: self.voice.as_ref().map(VoiceSnapshot::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSnapshot {
    pub phase: InterviewPhase,
    pub mode: InterviewMode,
    pub conversation: Vec<ConversationEntry>,
    pub current_answer: String,
    pub can_submit: bool,
    pub question_number: usize,
    pub question_count: usize,
    pub progress_label: String,
    pub voice: Option<VoiceSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceSnapshot {
    pub state: RecordingState,
    pub is_recording: bool,
    pub consent_given: bool,
    pub volume: f32,
    pub lit_bars: usize,
    pub analyser_connected: bool,
    pub audio_context: Option<AudioContextState>,
}

impl From<&VoiceCapture> for VoiceSnapshot {
    fn from(voice: &VoiceCapture) -> Self {
        Self {
            state: voice.state(),
            is_recording: voice.is_recording(),
            consent_given: voice.consent_given(),
            volume: voice.volume(),
            analyser_connected: voice.analyser_connected(),
            audio_context: voice.audio_context(),
            lit_bars: if voice.is_recording() {
                lit_bars(voice.volume())
            } else {
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::coach::Coach;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::models::profile::{ExperienceLevel, Industry, InterviewType};

    fn profile(mode: InterviewMode) -> UserProfile {
        UserProfile {
            job_title: "Backend Engineer".to_string(),
            experience_level: ExperienceLevel::MidLevel,
            industry: Industry::Technology,
            interview_type: InterviewType::Technical,
            interview_mode: mode,
        }
    }

    fn evaluation(star: f64, content: f64, clarity: f64, confidence: f64) -> String {
        format!(
            r#"{{"starScore": {star}, "contentScore": {content}, "clarityScore": {clarity},
                "confidenceScore": {confidence}, "strengths": ["s"], "improvements": ["i"]}}"#
        )
    }

    fn scores(fb: &AnswerFeedback) -> (f64, f64, f64, f64) {
        (
            fb.star_score,
            fb.content_score,
            fb.clarity_score,
            fb.confidence_score,
        )
    }

    async fn start(session: &mut InterviewSession, coach: &Coach) -> Result<(), InterviewError> {
        let ticket = session.begin_loading()?;
        match coach.generate_interview_questions(session.profile()).await {
            Ok(questions) => session.questions_loaded(ticket, questions),
            Err(e) => {
                session.loading_failed(ticket);
                Err(e.into())
            }
        }
    }

    async fn submit(
        session: &mut InterviewSession,
        coach: &Coach,
    ) -> Result<(Progress, Vec<VoiceEffect>), InterviewError> {
        let pending = session.begin_submission()?;
        match coach.evaluate_answer(&pending.question, &pending.answer).await {
            Ok(evaluation) => {
                let effects = pending.effects.clone();
                let progress = session.complete_submission(pending, evaluation)?;
                Ok((progress, effects))
            }
            Err(e) => {
                session.abort_submission(pending);
                Err(e.into())
            }
        }
    }

    fn ready(mode: InterviewMode, questions: &[&str]) -> InterviewSession {
        let mut session = InterviewSession::new(profile(mode));
        let ticket = session.begin_loading().unwrap();
        session
            .questions_loaded(ticket, questions.iter().map(|q| q.to_string()).collect())
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_full_text_interview_collects_feedback_in_order() {
        let backend = ScriptedBackend::with_responses([r#"["Q1","Q2","Q3","Q4","Q5"]"#]);
        for (star, content, clarity, confidence) in [
            (8.0, 7.0, 9.0, 6.0),
            (5.0, 5.0, 5.0, 5.0),
            (10.0, 9.0, 8.0, 7.0),
            (3.0, 4.0, 5.0, 6.0),
            (7.0, 7.0, 7.0, 7.0),
        ] {
            backend.push_ok(evaluation(star, content, clarity, confidence));
        }
        let coach = Coach::new(Arc::new(backend));

        let mut session = InterviewSession::new(profile(InterviewMode::Text));
        start(&mut session, &coach).await.unwrap();
        assert_eq!(session.phase(), InterviewPhase::Answering);
        assert_eq!(session.conversation()[0].text, "Q1");

        let mut finished = None;
        for n in 1..=5 {
            session.set_answer(format!("Answer {n}")).unwrap();
            let (progress, effects) = submit(&mut session, &coach).await.unwrap();
            assert!(effects.is_empty());
            if let Progress::Finished(feedback) = progress {
                finished = Some(feedback);
            }
        }

        let feedback = finished.expect("interview should finish after 5 answers");
        assert_eq!(feedback.len(), 5);
        for (n, item) in feedback.iter().enumerate() {
            assert_eq!(item.question, format!("Q{}", n + 1));
            assert_eq!(item.answer, format!("Answer {}", n + 1));
        }
        assert_eq!(scores(&feedback[2].feedback), (10.0, 9.0, 8.0, 7.0));
        assert_eq!(session.phase(), InterviewPhase::Finished);
        assert_eq!(session.conversation().len(), 10);
    }

    #[test]
    fn test_blank_answer_is_rejected() {
        let mut session = ready(InterviewMode::Text, &["Q1"]);
        session.set_answer("   ".to_string()).unwrap();
        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submission(),
            Err(InterviewError::EmptyAnswer)
        ));
        assert_eq!(session.phase(), InterviewPhase::Answering);
    }

    #[test]
    fn test_second_submit_while_evaluating_is_rejected() {
        let mut session = ready(InterviewMode::Text, &["Q1", "Q2"]);
        session.set_answer("first".to_string()).unwrap();
        let pending = session.begin_submission().unwrap();
        assert_eq!(pending.question, "Q1");
        assert_eq!(session.current_answer(), "");

        assert!(matches!(
            session.begin_submission(),
            Err(InterviewError::EvaluationInProgress)
        ));
        assert!(session.set_answer("typing".to_string()).is_err());
    }

    #[test]
    fn test_next_question_is_posted_by_bot() {
        let mut session = ready(InterviewMode::Text, &["Q1", "Q2"]);
        session.set_answer("first".to_string()).unwrap();
        let pending = session.begin_submission().unwrap();
        let progress = session
            .complete_submission(pending, crate::coach::interview::fallback_evaluation())
            .unwrap();
        assert_eq!(
            progress,
            Progress::NextQuestion {
                index: 1,
                question: "Q2".to_string()
            }
        );
        let last = session.conversation().last().unwrap();
        assert_eq!(last.speaker, Speaker::Bot);
        assert_eq!(session.snapshot().question_number, 2);
    }

    #[test]
    fn test_abort_restores_answer() {
        let mut session = ready(InterviewMode::Text, &["Q1"]);
        session.set_answer("my answer".to_string()).unwrap();
        let pending = session.begin_submission().unwrap();
        session.abort_submission(pending);
        assert_eq!(session.phase(), InterviewPhase::Answering);
        assert_eq!(session.current_answer(), "my answer");
        assert_eq!(session.conversation().len(), 1);
    }

    #[test]
    fn test_evaluation_from_another_interview_is_stale() {
        let mut old = ready(InterviewMode::Text, &["A1"]);
        old.set_answer("old answer".to_string()).unwrap();
        let old_pending = old.begin_submission().unwrap();

        let mut current = ready(InterviewMode::Text, &["B1", "B2"]);
        current.set_answer("new answer".to_string()).unwrap();
        let pending = current.begin_submission().unwrap();

        let evaluation = crate::coach::interview::fallback_evaluation();
        assert!(matches!(
            current.complete_submission(old_pending.clone(), evaluation.clone()),
            Err(InterviewError::Stale)
        ));
        current.abort_submission(old_pending);
        assert_eq!(current.phase(), InterviewPhase::Evaluating);

        current.complete_submission(pending, evaluation).unwrap();
        assert_eq!(current.feedback.len(), 1);
        assert_eq!(current.feedback[0].question, "B1");
        assert_eq!(current.feedback[0].answer, "new answer");
    }

    #[test]
    fn test_outcome_is_redeemed_once() {
        let mut session = ready(InterviewMode::Text, &["Q1", "Q2"]);
        session.set_answer("first".to_string()).unwrap();
        let pending = session.begin_submission().unwrap();
        let evaluation = crate::coach::interview::fallback_evaluation();
        session
            .complete_submission(pending.clone(), evaluation.clone())
            .unwrap();
        assert!(matches!(
            session.complete_submission(pending, evaluation),
            Err(InterviewError::Stale)
        ));
        assert_eq!(session.feedback.len(), 1);
    }

    #[test]
    fn test_questions_for_another_interview_are_stale() {
        let mut old = InterviewSession::new(profile(InterviewMode::Text));
        let old_ticket = old.begin_loading().unwrap();
        let mut current = InterviewSession::new(profile(InterviewMode::Text));
        current.begin_loading().unwrap();

        assert!(matches!(
            current.questions_loaded(old_ticket, vec!["A1".to_string()]),
            Err(InterviewError::Stale)
        ));
        current.loading_failed(old_ticket);
        assert_eq!(current.phase(), InterviewPhase::QuestionLoading);
    }

    #[tokio::test]
    async fn test_missing_credential_during_evaluation_propagates() {
        let mut session = ready(InterviewMode::Text, &["Q1"]);
        let coach = Coach::new(Arc::new(ScriptedBackend::unconfigured()));
        session.set_answer("answer".to_string()).unwrap();
        let err = submit(&mut session, &coach).await.unwrap_err();
        assert!(matches!(err, InterviewError::Coach(CoachError::MissingApiKey)));
        assert_eq!(session.current_answer(), "answer");
    }

    #[tokio::test]
    async fn test_start_failure_returns_to_idle() {
        let coach = Coach::new(Arc::new(ScriptedBackend::unconfigured()));
        let mut session = InterviewSession::new(profile(InterviewMode::Text));
        assert!(start(&mut session, &coach).await.is_err());
        assert_eq!(session.phase(), InterviewPhase::Idle);
    }

    #[test]
    fn test_voice_events_rejected_in_text_mode() {
        let mut session = ready(InterviewMode::Text, &["Q1"]);
        assert!(matches!(
            session.handle_voice(VoiceEvent::ToggleRecording),
            Err(InterviewError::VoiceUnavailable)
        ));
    }

    #[test]
    fn test_voice_transcript_becomes_answer_and_submit_stops_recording() {
        let mut session = ready(InterviewMode::Voice, &["Q1"]);
        session.handle_voice(VoiceEvent::ToggleRecording).unwrap();
        session.handle_voice(VoiceEvent::ConsentAccepted).unwrap();
        session.handle_voice(VoiceEvent::MicrophoneGranted).unwrap();
        session
            .handle_voice(VoiceEvent::Transcript {
                text: "I profiled the hot path".to_string(),
            })
            .unwrap();
        assert_eq!(session.current_answer(), "I profiled the hot path");

        let pending = session.begin_submission().unwrap();
        assert_eq!(pending.answer, "I profiled the hot path");
        assert_eq!(pending.effects, vec![VoiceEffect::StopTranscription]);
        assert_eq!(
            session.voice.as_ref().unwrap().state(),
            RecordingState::Stopping
        );
    }

    #[test]
    fn test_retry_during_voice_answer() {
        let mut session = ready(InterviewMode::Voice, &["Q1"]);
        session.handle_voice(VoiceEvent::ToggleRecording).unwrap();
        session.handle_voice(VoiceEvent::ConsentAccepted).unwrap();
        session.handle_voice(VoiceEvent::MicrophoneGranted).unwrap();
        session
            .handle_voice(VoiceEvent::Transcript {
                text: "false start".to_string(),
            })
            .unwrap();
        session.handle_voice(VoiceEvent::Retry).unwrap();

        assert_eq!(session.current_answer(), "");
        assert!(session.snapshot().voice.unwrap().is_recording);
    }

    #[test]
    fn test_teardown_closes_voice_resources() {
        let mut session = ready(InterviewMode::Voice, &["Q1"]);
        session.handle_voice(VoiceEvent::ToggleRecording).unwrap();
        session.handle_voice(VoiceEvent::ConsentAccepted).unwrap();
        session.handle_voice(VoiceEvent::MicrophoneGranted).unwrap();
        let effects = session.teardown();
        assert!(effects.contains(&VoiceEffect::CloseAudioContext));
        assert!(!session.voice.as_ref().unwrap().analyser_connected());
    }
}
