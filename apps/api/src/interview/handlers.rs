//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{InterviewSession, InterviewSnapshot, Progress};
use crate::interview::voice::{VoiceEffect, VoiceEvent};
use crate::navigation::View;
use crate::session::handlers::{find_session, require_view};
use crate::session::{Session, SessionHandle, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// View after the submission: still INTERVIEW, or the report once finished.
    pub view: View,
    pub voice_effects: Vec<VoiceEffect>,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub effects: Vec<VoiceEffect>,
    pub interview: InterviewSnapshot,
}

fn mounted_interview(session: &mut Session) -> Result<&mut InterviewSession, AppError> {
    session
        .interview
        .as_mut()
        .ok_or_else(|| AppError::Conflict("No interview is open".to_string()))
}

/// Locks the session and checks the interview view is shown.
async fn lock_interview(
    state: &AppState,
    id: Uuid,
) -> Result<(SessionHandle, OwnedMutexGuard<Session>), AppError> {
    let handle = find_session(state, id).await?;
    let session = handle.clone().lock_owned().await;
    require_view(&session, View::Interview)?;
    Ok((handle, session))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/interview/start
///
/// Fetches the questions and posts the first one. Questions that arrive after
/// the interview was left or restarted are refused with 409.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let (handle, mut session) = lock_interview(&state, id).await?;
    let interview = mounted_interview(&mut session)?;
    let ticket = interview.begin_loading()?;
    let profile = interview.profile().clone();
    drop(session);

    let outcome = state.coach.generate_interview_questions(&profile).await;

    let mut session = handle.lock().await;
    let interview = mounted_interview(&mut session)?;
    match outcome {
        Ok(questions) => interview.questions_loaded(ticket, questions)?,
        Err(e) => {
            interview.loading_failed(ticket);
            return Err(e.into());
        }
    }
    let snapshot = interview.snapshot();
    Ok(Json(snapshot))
}

/// GET /api/v1/sessions/:id/interview
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let (_handle, mut session) = lock_interview(&state, id).await?;
    let interview = mounted_interview(&mut session)?;
    let snapshot = interview.snapshot();
    Ok(Json(snapshot))
}

/// PUT /api/v1/sessions/:id/interview/answer
///
/// Replaces the pending (typed) answer.
pub async fn handle_set_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let (_handle, mut session) = lock_interview(&state, id).await?;
    let interview = mounted_interview(&mut session)?;
    interview.set_answer(request.text)?;
    let snapshot = interview.snapshot();
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/interview/submit
///
/// Evaluates the pending answer, then posts the next question or finishes the
/// interview and opens the report.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let (handle, mut session) = lock_interview(&state, id).await?;
    let pending = mounted_interview(&mut session)?.begin_submission()?;
    drop(session);

    let outcome = state
        .coach
        .evaluate_answer(&pending.question, &pending.answer)
        .await;

    let mut session = handle.lock().await;
    let interview = mounted_interview(&mut session)?;
    let evaluation = match outcome {
        Ok(evaluation) => evaluation,
        Err(e) => {
            interview.abort_submission(pending);
            return Err(e.into());
        }
    };

    let mut voice_effects = pending.effects.clone();
    let progress = interview.complete_submission(pending, evaluation)?;
    let view = match progress {
        Progress::NextQuestion { .. } => View::Interview,
        Progress::Finished(feedback) => {
            let mut transition = session.finish_interview(feedback);
            voice_effects.append(&mut transition.voice_effects);
            transition.view
        }
    };

    Ok(Json(SubmitResponse {
        view,
        voice_effects,
        session: session.snapshot(),
    }))
}

/// POST /api/v1/sessions/:id/interview/voice
///
/// Feeds one media event to the voice recorder and returns the effects to perform.
pub async fn handle_voice_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<VoiceEvent>,
) -> Result<Json<VoiceResponse>, AppError> {
    let (_handle, mut session) = lock_interview(&state, id).await?;
    let interview = mounted_interview(&mut session)?;
    let effects = interview.handle_voice(event)?;
    Ok(Json(VoiceResponse {
        effects,
        interview: interview.snapshot(),
    }))
}
