//! Per-client application state and the in-memory store that holds it.
//!
//! A `Session` pairs the navigator with the state of each screen. Screen
//! state lives only while its view is shown: leaving a view resets it, and
//! leaving the interview releases its media resources.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::session::{InterviewSession, InterviewSnapshot};
use crate::interview::voice::VoiceEffect;
use crate::models::feedback::InterviewFeedback;
use crate::models::profile::UserProfile;
use crate::models::resume::ResumeCritique;
use crate::navigation::{Navigator, View};
use crate::screens::assessments::Assessments;
use crate::screens::dashboard::PrivacyPreferences;
use crate::screens::learning_path::LearningPathScreen;
use crate::screens::onboarding::OnboardingForm;
use crate::screens::report::{CombinedReport, FeedbackReport, FeedbackReportView};
use crate::screens::resume::{ResumeAnalyzer, ResumeTailor};
use crate::screens::FormError;

/// Result of any action that may change the view.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub view: View,
    /// Media clean-up the client must perform, e.g. after leaving a voice interview.
    pub voice_effects: Vec<VoiceEffect>,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    navigator: Navigator,
    pub interview: Option<InterviewSession>,
    pub report: Option<FeedbackReport>,
    pub resume_analyzer: ResumeAnalyzer,
    pub resume_tailor: ResumeTailor,
    pub assessments: Assessments,
    pub learning_path: LearningPathScreen,
    pub preferences: PrivacyPreferences,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            navigator: Navigator::new(),
            interview: None,
            report: None,
            resume_analyzer: ResumeAnalyzer::default(),
            resume_tailor: ResumeTailor::default(),
            assessments: Assessments::default(),
            learning_path: LearningPathScreen::default(),
            preferences: PrivacyPreferences::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn view(&self) -> View {
        self.navigator.view()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // ── navigation actions ──────────────────────────────────────────────────

    pub fn navigate(&mut self, target: View) -> Transition {
        self.transition(|nav| {
            nav.navigate(target);
        })
    }

    pub fn back(&mut self) -> Transition {
        self.transition(|nav| {
            nav.back();
        })
    }

    pub fn restart(&mut self) -> Transition {
        let transition = self.transition(Navigator::restart);
        self.preferences = PrivacyPreferences::default();
        transition
    }

    pub fn submit_onboarding(&mut self, form: OnboardingForm) -> Result<Transition, FormError> {
        let profile = form.submit()?;
        info!(
            "Session {} starting {} interview for '{}'",
            self.id, profile.interview_type, profile.job_title
        );
        Ok(self.start_interview(profile))
    }

    /// Always mounts a fresh interview, even over one already on screen.
    pub fn start_interview(&mut self, profile: UserProfile) -> Transition {
        let mut voice_effects = self.teardown();
        self.interview = None;
        let mut transition = self.transition(|nav| nav.start_interview(profile));
        voice_effects.append(&mut transition.voice_effects);
        transition.voice_effects = voice_effects;
        transition
    }

    pub fn finish_interview(&mut self, feedback: Vec<InterviewFeedback>) -> Transition {
        self.transition(|nav| {
            nav.finish_interview(feedback);
        })
    }

    pub fn create_learning_path(&mut self, goal: String) -> Transition {
        self.transition(|nav| nav.create_learning_path(goal))
    }

    /// Stores a finished resume critique for the combined report.
    pub fn resume_analyzed(&mut self, critique: ResumeCritique) {
        self.navigator.resume_analyzed(critique);
    }

    /// Releases media resources before the session is dropped.
    pub fn teardown(&mut self) -> Vec<VoiceEffect> {
        self.interview
            .as_mut()
            .map(InterviewSession::teardown)
            .unwrap_or_default()
    }

    /// Applies a navigator change, then unmounts the old screen and mounts the new one.
    fn transition(&mut self, change: impl FnOnce(&mut Navigator)) -> Transition {
        let from = self.navigator.view();
        change(&mut self.navigator);
        let to = self.navigator.view();

        let mut voice_effects = Vec::new();
        if from != to {
            debug!("Session {}: {:?} -> {:?}", self.id, from, to);
            voice_effects = self.unmount(from);
        }
        self.mount(to);

        Transition {
            view: to,
            voice_effects,
        }
    }

    fn unmount(&mut self, view: View) -> Vec<VoiceEffect> {
        match view {
            View::Interview => {
                let effects = self.teardown();
                self.interview = None;
                return effects;
            }
            View::Feedback => self.report = None,
            View::ResumeAnalyzer => self.resume_analyzer.reset(),
            View::ResumeTailor => self.resume_tailor.reset(),
            View::Assessments => self.assessments.reset(),
            View::LearningPath => self.learning_path = LearningPathScreen::default(),
            _ => {}
        }
        Vec::new()
    }

    /// Creates screen state for `view` if it is not already mounted.
    fn mount(&mut self, view: View) {
        match view {
            View::Interview if self.interview.is_none() => {
                if let Some(profile) = self.navigator.profile() {
                    self.interview = Some(InterviewSession::new(profile.clone()));
                }
            }
            View::Feedback if self.report.is_none() => {
                if let (Some(profile), Some(feedback)) =
                    (self.navigator.profile(), self.navigator.feedback())
                {
                    self.report = Some(FeedbackReport::new(profile.clone(), feedback.to_vec()));
                }
            }
            View::LearningPath if self.learning_path.goal().is_empty() => {
                self.learning_path = LearningPathScreen::with_goal(self.navigator.learning_goal());
            }
            _ => {}
        }
    }

    // ── views ───────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionView {
        let screen = match self.view() {
            View::Onboarding => ScreenView::Onboarding,
            View::Interview => match &self.interview {
                Some(interview) => ScreenView::Interview(interview.snapshot()),
                None => ScreenView::Informational,
            },
            View::Feedback => match &self.report {
                Some(report) => ScreenView::Feedback(report.snapshot()),
                None => ScreenView::Informational,
            },
            View::CombinedReport => match CombinedReport::from_navigator(&self.navigator) {
                Some(report) => ScreenView::CombinedReport(report),
                None => ScreenView::Informational,
            },
            View::ResumeAnalyzer => ScreenView::ResumeAnalyzer(self.resume_analyzer.clone()),
            View::ResumeTailor => ScreenView::ResumeTailor(self.resume_tailor.clone()),
            View::Assessments => ScreenView::Assessments(self.assessments.clone()),
            View::LearningPath => ScreenView::LearningPath(self.learning_path.clone()),
            View::Dashboard => ScreenView::Dashboard {
                preferences: self.preferences,
            },
            _ => ScreenView::Informational,
        };

        SessionView {
            id: self.id,
            created_at: self.created_at,
            view: self.view(),
            informational: self.view().is_informational(),
            profile: self.navigator.profile().cloned(),
            has_feedback: self.navigator.feedback().is_some(),
            has_resume_critique: self.navigator.resume_critique().is_some(),
            learning_goal: self.navigator.learning_goal().to_string(),
            screen,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum ScreenView {
    Onboarding,
    Interview(InterviewSnapshot),
    Feedback(FeedbackReportView),
    CombinedReport(CombinedReport),
    ResumeAnalyzer(ResumeAnalyzer),
    ResumeTailor(ResumeTailor),
    Assessments(Assessments),
    LearningPath(LearningPathScreen),
    Dashboard { preferences: PrivacyPreferences },
    Informational,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub view: View,
    /// Static page with no actions of its own.
    pub informational: bool,
    pub profile: Option<UserProfile>,
    pub has_feedback: bool,
    pub has_resume_critique: bool,
    pub learning_goal: String,
    pub screen: ScreenView,
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

pub type SessionHandle = Arc<Mutex<Session>>;

struct StoredSession {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory session map. Sessions are locked individually and evicted once
/// idle for longer than the configured time to live.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let session = Session::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            StoredSession {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        info!("Session {id} created");
        (id, handle)
    }

    /// Looks a session up and marks it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id)?;
        stored.last_seen = Instant::now();
        Some(stored.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        let removed = self.sessions.write().await.remove(&id);
        if removed.is_some() {
            info!("Session {id} removed");
        }
        removed.map(|stored| stored.handle)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for longer than `ttl` and releases its media
    /// resources. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let expired: Vec<(Uuid, SessionHandle)> = {
            let mut sessions = self.sessions.write().await;
            let now = Instant::now();
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, stored)| now.duration_since(stored.last_seen) > ttl)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|stored| (id, stored.handle)))
                .collect()
        };

        for (id, handle) in &expired {
            let effects = handle.lock().await.teardown();
            info!(
                "Session {id} evicted after {}s idle ({} media effects dropped)",
                ttl.as_secs(),
                effects.len()
            );
        }
        expired.len()
    }

    /// Runs `evict_idle` every `period` in the background.
    pub fn spawn_sweeper(&self, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    debug!("Session sweep evicted {evicted}");
                }
            }
        })
    }
}
