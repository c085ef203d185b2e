//! Axum route handlers for the report, resume, assessment and learning-path screens.
//!
//! Handlers that call the model take the session lock twice: once to start
//! the request and once to store its outcome. The screen's loading state
//! rejects duplicates in between, and the ticket issued at the start is
//! refused if the screen was reset or left meanwhile.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::learning::LearningResource;
use crate::models::resume::{ResumeCritique, TailoredResumeSuggestion};
use crate::navigation::View;
use crate::screens::assessments::{Assessments, Skill};
use crate::screens::report::{CombinedReport, ExampleLookup, FeedbackReport, FeedbackReportView};
use crate::session::handlers::{find_session, require_view};
use crate::session::{Session, SessionView, Transition};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CritiqueRequest {
    pub resume_text: String,
    pub target_role: String,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectSkillRequest {
    pub skill: Skill,
}

#[derive(Debug, Deserialize)]
pub struct AnswerAssessmentRequest {
    pub option_index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct LearningPathRequest {
    /// Defaults to the goal the screen was opened with.
    #[serde(default)]
    pub goal: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExampleAnswerResponse {
    pub index: usize,
    pub example_answer: String,
}

#[derive(Debug, Serialize)]
pub struct ImprovementsToggleResponse {
    pub index: usize,
    pub expanded: bool,
    pub report: FeedbackReportView,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResultResponse {
    pub is_correct: bool,
    pub assessments: Assessments,
}

#[derive(Debug, Serialize)]
pub struct LearningPathTransitionResponse {
    #[serde(flatten)]
    pub transition: Transition,
    /// The client should request a path straight away.
    pub generate_on_entry: bool,
    pub session: SessionView,
}

fn mounted_report(session: &mut Session) -> Result<&mut FeedbackReport, AppError> {
    session
        .report
        .as_mut()
        .ok_or_else(|| AppError::Conflict("No feedback report is open".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback / combined report
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/report
///
/// Returns the feedback report, fetching the pass likelihood on first view.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackReportView>, AppError> {
    let handle = find_session(&state, id).await?;

    let owed = {
        let mut session = handle.lock().await;
        require_view(&session, View::Feedback)?;
        let report = mounted_report(&mut session)?;
        report.begin_pass_likelihood()
    };

    if let Some((ticket, overall)) = owed {
        let outcome = state.coach.generate_pass_likelihood(overall).await;
        let mut session = handle.lock().await;
        let report = mounted_report(&mut session)?;
        report.pass_likelihood_loaded(ticket, outcome)?;
    }

    let mut session = handle.lock().await;
    let report = mounted_report(&mut session)?;
    let view = report.snapshot();
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/report/examples/:index
///
/// Example answer for one question; fetched once, then served from cache.
pub async fn handle_example_answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ExampleAnswerResponse>, AppError> {
    let handle = find_session(&state, id).await?;

    let (lookup, profile) = {
        let mut session = handle.lock().await;
        require_view(&session, View::Feedback)?;
        let report = mounted_report(&mut session)?;
        let lookup = report.begin_example(index)?;
        (lookup, report.profile().clone())
    };

    let example_answer = match lookup {
        ExampleLookup::Cached(answer) => answer,
        ExampleLookup::Fetch { ticket, question } => {
            let outcome = state.coach.generate_example_answer(&question, &profile).await;
            let mut session = handle.lock().await;
            let report = mounted_report(&mut session)?;
            report.example_loaded(ticket, outcome)?
        }
    };

    Ok(Json(ExampleAnswerResponse {
        index,
        example_answer,
    }))
}

/// POST /api/v1/sessions/:id/report/improvements/:index/toggle
pub async fn handle_toggle_improvements(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ImprovementsToggleResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Feedback)?;
    let report = mounted_report(&mut session)?;
    let expanded = report.toggle_improvements(index)?;
    Ok(Json(ImprovementsToggleResponse {
        index,
        expanded,
        report: report.snapshot(),
    }))
}

/// GET /api/v1/sessions/:id/combined-report
pub async fn handle_combined_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CombinedReport>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    require_view(&session, View::CombinedReport)?;
    CombinedReport::from_navigator(session.navigator())
        .map(Json)
        .ok_or_else(|| AppError::Conflict("Combined report is not available".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Resume analyzer / tailor
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/resume/critique
///
/// Critiques the resume for a target role and keeps the critique for the combined report.
pub async fn handle_critique_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CritiqueRequest>,
) -> Result<Json<ResumeCritique>, AppError> {
    let handle = find_session(&state, id).await?;
    let ticket = {
        let mut session = handle.lock().await;
        require_view(&session, View::ResumeAnalyzer)?;
        session
            .resume_analyzer
            .begin(request.resume_text.clone(), request.target_role.clone())?
    };

    let outcome = state
        .coach
        .critique_resume(&request.resume_text, &request.target_role)
        .await;

    let mut session = handle.lock().await;
    let critique = session.resume_analyzer.complete(ticket, outcome)?;
    session.resume_analyzed(critique.clone());
    Ok(Json(critique))
}

/// POST /api/v1/sessions/:id/resume/critique/reset
pub async fn handle_reset_critique(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::ResumeAnalyzer)?;
    session.resume_analyzer.reset();
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/resume/tailor
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailoredResumeSuggestion>, AppError> {
    let handle = find_session(&state, id).await?;
    let ticket = {
        let mut session = handle.lock().await;
        require_view(&session, View::ResumeTailor)?;
        session
            .resume_tailor
            .begin(request.resume_text.clone(), request.job_description.clone())?
    };

    let outcome = state
        .coach
        .tailor_resume_for_ats(&request.resume_text, &request.job_description)
        .await;

    let mut session = handle.lock().await;
    let suggestion = session.resume_tailor.complete(ticket, outcome)?;
    Ok(Json(suggestion))
}

/// POST /api/v1/sessions/:id/resume/tailor/reset
pub async fn handle_reset_tailor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::ResumeTailor)?;
    session.resume_tailor.reset();
    Ok(Json(session.snapshot()))
}

// ────────────────────────────────────────────────────────────────────────────
// Assessments
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/assessments/select
pub async fn handle_select_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectSkillRequest>,
) -> Result<Json<Assessments>, AppError> {
    let handle = find_session(&state, id).await?;
    let ticket = {
        let mut session = handle.lock().await;
        require_view(&session, View::Assessments)?;
        session.assessments.select_skill(request.skill)?
    };

    let outcome = state
        .coach
        .generate_assessment_question(request.skill.label())
        .await;

    let mut session = handle.lock().await;
    session.assessments.question_loaded(ticket, outcome)?;
    Ok(Json(session.assessments.clone()))
}

/// POST /api/v1/sessions/:id/assessments/answer
///
/// Chooses an option and grades it.
pub async fn handle_answer_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerAssessmentRequest>,
) -> Result<Json<AssessmentResultResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Assessments)?;
    session.assessments.choose_option(request.option_index)?;
    let is_correct = session.assessments.submit()?;
    Ok(Json(AssessmentResultResponse {
        is_correct,
        assessments: session.assessments.clone(),
    }))
}

/// POST /api/v1/sessions/:id/assessments/reset
pub async fn handle_reset_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assessments>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Assessments)?;
    session.assessments.reset();
    Ok(Json(session.assessments.clone()))
}

/// POST /api/v1/sessions/:id/assessments/learning-path
///
/// Opens the learning path for the assessed skill.
pub async fn handle_assessment_learning_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LearningPathTransitionResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    require_view(&session, View::Assessments)?;
    let goal = session
        .assessments
        .learning_goal()
        .ok_or_else(|| AppError::Conflict("Finish the assessment first".to_string()))?;
    let transition = session.create_learning_path(goal);
    Ok(Json(LearningPathTransitionResponse {
        transition,
        generate_on_entry: session.learning_path.needs_initial_generation(),
        session: session.snapshot(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Learning path
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/learning-path
///
/// Generates a path for the given goal, or for the goal the screen was opened with.
pub async fn handle_generate_learning_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<LearningPathRequest>,
) -> Result<Json<Vec<LearningResource>>, AppError> {
    let handle = find_session(&state, id).await?;
    let (ticket, goal) = {
        let mut session = handle.lock().await;
        require_view(&session, View::LearningPath)?;
        let goal = request
            .goal
            .unwrap_or_else(|| session.learning_path.goal().to_string());
        (session.learning_path.begin(goal.clone())?, goal)
    };

    let outcome = state.coach.generate_learning_path(&goal).await;

    let mut session = handle.lock().await;
    let path = session.learning_path.complete(ticket, outcome)?;
    Ok(Json(path))
}
