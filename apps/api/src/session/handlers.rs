//! Axum route handlers for sessions, navigation and the dashboard.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::voice::VoiceEffect;
use crate::navigation::View;
use crate::screens::dashboard::{
    export_data, request_deletion, DataExport, DeletionNotice, PreferencesUpdate,
    PrivacyPreferences,
};
use crate::screens::onboarding::OnboardingForm;
use crate::screens::pricing::{plans, BillingCycle, PricingPlan};
use crate::session::{Session, SessionHandle, SessionView, Transition};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub view: View,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    #[serde(flatten)]
    pub transition: Transition,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub voice_effects: Vec<VoiceEffect>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PricingQuery {
    #[serde(default)]
    pub cycle: BillingCycle,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub cycle: BillingCycle,
    pub plans: Vec<PricingPlan>,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared lookups
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// Screen actions are only accepted while their view is shown.
pub(crate) fn require_view(session: &Session, view: View) -> Result<(), AppError> {
    if session.view() == view {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Action requires the {view:?} view, current view is {:?}",
            session.view()
        )))
    }
}

fn transition_response(session: &Session, transition: Transition) -> Json<TransitionResponse> {
    Json(TransitionResponse {
        transition,
        session: session.snapshot(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (_, handle) = state.sessions.create().await;
    let session = handle.lock().await;
    (StatusCode::CREATED, Json(session.snapshot()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/sessions/:id
///
/// Drops the session. Returns the media clean-up for a live voice interview.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSessionResponse>, AppError> {
    let handle = state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let voice_effects = handle.lock().await.teardown();
    Ok(Json(DeleteSessionResponse { voice_effects }))
}

/// POST /api/v1/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    let transition = session.navigate(request.view);
    Ok(transition_response(&session, transition))
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    let transition = session.back();
    Ok(transition_response(&session, transition))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    let transition = session.restart();
    Ok(transition_response(&session, transition))
}

/// POST /api/v1/sessions/:id/onboarding
///
/// Creates the interview profile and opens the interview.
pub async fn handle_onboarding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<OnboardingForm>,
) -> Result<Json<TransitionResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Onboarding)?;
    let transition = session.submit_onboarding(form)?;
    Ok(transition_response(&session, transition))
}

/// PUT /api/v1/sessions/:id/dashboard/preferences
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<PrivacyPreferences>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Dashboard)?;
    session.preferences.apply(update);
    Ok(Json(session.preferences))
}

/// GET /api/v1/sessions/:id/dashboard/export
pub async fn handle_export_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataExport>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    require_view(&session, View::Dashboard)?;
    Ok(Json(export_data(&session.preferences)))
}

/// POST /api/v1/sessions/:id/dashboard/delete
pub async fn handle_delete_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionNotice>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    require_view(&session, View::Dashboard)?;
    Ok(Json(request_deletion()))
}

/// GET /api/v1/pricing?cycle=monthly|annual
pub async fn handle_pricing(Query(query): Query<PricingQuery>) -> Json<PricingResponse> {
    Json(PricingResponse {
        cycle: query.cycle,
        plans: plans(query.cycle),
    })
}
