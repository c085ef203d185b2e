pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::screens::handlers as screens;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/pricing", get(session::handle_pricing))
        // Sessions and navigation
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/navigate", post(session::handle_navigate))
        .route("/api/v1/sessions/:id/back", post(session::handle_back))
        .route("/api/v1/sessions/:id/restart", post(session::handle_restart))
        .route(
            "/api/v1/sessions/:id/onboarding",
            post(session::handle_onboarding),
        )
        // Interview
        .route(
            "/api/v1/sessions/:id/interview",
            get(interview::handle_get_interview),
        )
        .route(
            "/api/v1/sessions/:id/interview/start",
            post(interview::handle_start_interview),
        )
        .route(
            "/api/v1/sessions/:id/interview/answer",
            put(interview::handle_set_answer),
        )
        .route(
            "/api/v1/sessions/:id/interview/submit",
            post(interview::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/interview/voice",
            post(interview::handle_voice_event),
        )
        // Reports
        .route("/api/v1/sessions/:id/report", get(screens::handle_get_report))
        .route(
            "/api/v1/sessions/:id/report/examples/:index",
            post(screens::handle_example_answer),
        )
        .route(
            "/api/v1/sessions/:id/report/improvements/:index/toggle",
            post(screens::handle_toggle_improvements),
        )
        .route(
            "/api/v1/sessions/:id/combined-report",
            get(screens::handle_combined_report),
        )
        // Resume tools
        .route(
            "/api/v1/sessions/:id/resume/critique",
            post(screens::handle_critique_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/critique/reset",
            post(screens::handle_reset_critique),
        )
        .route(
            "/api/v1/sessions/:id/resume/tailor",
            post(screens::handle_tailor_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/tailor/reset",
            post(screens::handle_reset_tailor),
        )
        // Assessments and learning path
        .route(
            "/api/v1/sessions/:id/assessments/select",
            post(screens::handle_select_skill),
        )
        .route(
            "/api/v1/sessions/:id/assessments/answer",
            post(screens::handle_answer_assessment),
        )
        .route(
            "/api/v1/sessions/:id/assessments/reset",
            post(screens::handle_reset_assessment),
        )
        .route(
            "/api/v1/sessions/:id/assessments/learning-path",
            post(screens::handle_assessment_learning_path),
        )
        .route(
            "/api/v1/sessions/:id/learning-path",
            post(screens::handle_generate_learning_path),
        )
        // Dashboard
        .route(
            "/api/v1/sessions/:id/dashboard/preferences",
            put(session::handle_update_preferences),
        )
        .route(
            "/api/v1/sessions/:id/dashboard/export",
            get(session::handle_export_data),
        )
        .route(
            "/api/v1/sessions/:id/dashboard/delete",
            post(session::handle_delete_data),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::coach::Coach;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::session::SessionStore;

    fn app(backend: ScriptedBackend) -> Router {
        shared_app(Arc::new(backend))
    }

    fn shared_app(backend: Arc<ScriptedBackend>) -> Router {
        build_router(AppState {
            coach: Coach::new(backend),
            sessions: SessionStore::new(),
            config: Config {
                gemini_api_key: Some("test-key".to_string()),
                port: 8080,
                rust_log: "info".to_string(),
                session_ttl_secs: 1800,
            },
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = send(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["view"], "LANDING");
        body["id"].as_str().unwrap().to_string()
    }

    fn evaluation(score: u32) -> String {
        format!(
            r#"{{"starScore": {score}, "contentScore": {score}, "clarityScore": {score},
                "confidenceScore": {score}, "strengths": ["Structured"],
                "improvements": ["a", "b", "c", "d"]}}"#
        )
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(ScriptedBackend::new());
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "careerai-api");
        assert_eq!(body["model_configured"], true);
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app(ScriptedBackend::new());
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_interview_without_profile_redirects() {
        let app = app(ScriptedBackend::new());
        let id = new_session(&app).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/navigate"),
            Some(json!({"view": "INTERVIEW"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "ONBOARDING");
        assert_eq!(body["session"]["screen"]["kind"], "onboarding");
    }

    #[tokio::test]
    async fn test_blank_job_title_is_rejected() {
        let app = app(ScriptedBackend::new());
        let id = new_session(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/navigate"),
            Some(json!({"view": "ONBOARDING"})),
        )
        .await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/onboarding"),
            Some(json!({"job_title": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, session) = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(session["view"], "ONBOARDING");
    }

    #[tokio::test]
    async fn test_text_interview_end_to_end() {
        let backend = ScriptedBackend::with_responses([
            r#"["Tell me about a system you scaled.", "How do you handle an outage?"]"#.to_string(),
            evaluation(8),
            evaluation(6),
            r#"{"likelihood": 70, "rationale": "Good fundamentals."}"#.to_string(),
        ]);
        let app = app(backend);
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        send(&app, "POST", &format!("{base}/navigate"), Some(json!({"view": "ONBOARDING"}))).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("{base}/onboarding"),
            Some(json!({
                "job_title": "Backend Engineer",
                "experience_level": "Mid-Level",
                "interview_type": "Technical"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "INTERVIEW");

        let (status, body) = send(&app, "POST", &format!("{base}/interview/start"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "answering");
        assert_eq!(body["question_count"], 2);

        // empty answers cannot be submitted
        let (status, _) = send(&app, "POST", &format!("{base}/interview/submit"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for (n, answer) in ["Sharded the database.", "Rolled back first."].iter().enumerate() {
            send(&app, "PUT", &format!("{base}/interview/answer"), Some(json!({"text": answer}))).await;
            let (status, body) = send(&app, "POST", &format!("{base}/interview/submit"), None).await;
            assert_eq!(status, StatusCode::OK);
            if n == 0 {
                assert_eq!(body["view"], "INTERVIEW");
            } else {
                assert_eq!(body["view"], "FEEDBACK");
            }
        }

        let (status, report) = send(&app, "GET", &format!("{base}/report"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["summary"]["overall"]["value"], 7.0);
        assert_eq!(report["pass_likelihood"]["likelihood"], 70.0);
        assert_eq!(report["items"][0]["improvements"].as_array().unwrap().len(), 3);
        assert_eq!(report["items"][0]["hidden_improvements"], 1);

        let (status, toggled) = send(
            &app,
            "POST",
            &format!("{base}/report/improvements/0/toggle"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["expanded"], true);
    }

    #[tokio::test]
    async fn test_late_evaluation_does_not_land_in_new_interview() {
        let backend = Arc::new(ScriptedBackend::with_responses([
            r#"["A1", "A2"]"#.to_string(),
            evaluation(3),
        ]));
        let app = shared_app(backend.clone());
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        send(&app, "POST", &format!("{base}/navigate"), Some(json!({"view": "ONBOARDING"}))).await;
        send(&app, "POST", &format!("{base}/onboarding"), Some(json!({"job_title": "Analyst"}))).await;
        send(&app, "POST", &format!("{base}/interview/start"), None).await;
        send(&app, "PUT", &format!("{base}/interview/answer"), Some(json!({"text": "old answer"}))).await;

        let hold = backend.hold_next_call();
        let first_submit = {
            let app = app.clone();
            let uri = format!("{base}/interview/submit");
            tokio::spawn(async move { send(&app, "POST", &uri, None).await })
        };
        hold.started.await.unwrap();

        // leave and start a second interview while the first evaluation is parked
        send(&app, "POST", &format!("{base}/navigate"), Some(json!({"view": "ONBOARDING"}))).await;
        send(&app, "POST", &format!("{base}/onboarding"), Some(json!({"job_title": "Nurse"}))).await;
        backend.push_ok(r#"["B1", "B2"]"#);
        let (status, _) = send(&app, "POST", &format!("{base}/interview/start"), None).await;
        assert_eq!(status, StatusCode::OK);
        send(&app, "PUT", &format!("{base}/interview/answer"), Some(json!({"text": "new answer"}))).await;
        backend.push_ok(evaluation(8));
        let (status, body) = send(&app, "POST", &format!("{base}/interview/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "INTERVIEW");

        hold.release.send(()).unwrap();
        let (status, body) = first_submit.await.unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        send(&app, "PUT", &format!("{base}/interview/answer"), Some(json!({"text": "third"}))).await;
        backend.push_ok(evaluation(6));
        let (_, body) = send(&app, "POST", &format!("{base}/interview/submit"), None).await;
        assert_eq!(body["view"], "FEEDBACK");

        let (_, report) = send(&app, "GET", &format!("{base}/report"), None).await;
        let items: Vec<(&str, &str)> = report["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| {
                (
                    item["question"].as_str().unwrap(),
                    item["answer"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(items, vec![("B1", "new answer"), ("B2", "third")]);
    }

    #[tokio::test]
    async fn test_missing_credential_surfaces_as_llm_error() {
        let app = app(ScriptedBackend::unconfigured());
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");
        send(&app, "POST", &format!("{base}/navigate"), Some(json!({"view": "ONBOARDING"}))).await;
        send(&app, "POST", &format!("{base}/onboarding"), Some(json!({"job_title": "Analyst"}))).await;

        let (status, body) = send(&app, "POST", &format!("{base}/interview/start"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "LLM_ERROR");

        let (_, interview) = send(&app, "GET", &format!("{base}/interview"), None).await;
        assert_eq!(interview["phase"], "idle");
    }

    #[tokio::test]
    async fn test_screen_action_requires_its_view() {
        let app = app(ScriptedBackend::new());
        let id = new_session(&app).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/resume/tailor"),
            Some(json!({"resume_text": "r", "job_description": "jd"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_assessment_to_learning_path() {
        let backend = ScriptedBackend::with_responses([
            r#"{"question": "Which clause filters groups?", "options": ["WHERE", "HAVING", "ORDER BY", "LIMIT"],
                "correctOptionIndex": 1, "explanation": "HAVING filters after GROUP BY."}"#,
            r#"[{"type": "Practice", "title": "GROUP BY drills", "description": "Ten exercises."}]"#,
        ]);
        let app = app(backend);
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        send(&app, "POST", &format!("{base}/navigate"), Some(json!({"view": "ASSESSMENTS"}))).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("{base}/assessments/select"),
            Some(json!({"skill": "SQL"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stage"], "taking");

        let (_, result) = send(
            &app,
            "POST",
            &format!("{base}/assessments/answer"),
            Some(json!({"option_index": 1})),
        )
        .await;
        assert_eq!(result["is_correct"], true);

        let (_, transition) = send(&app, "POST", &format!("{base}/assessments/learning-path"), None).await;
        assert_eq!(transition["view"], "LEARNING_PATH");
        assert_eq!(transition["session"]["learning_goal"], "Improve my SQL skills");
        assert_eq!(transition["generate_on_entry"], true);

        let (status, path) = send(&app, "POST", &format!("{base}/learning-path"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(path[0]["type"], "Practice");
    }

    #[tokio::test]
    async fn test_pricing_annual() {
        let app = app(ScriptedBackend::new());
        let (status, body) = send(&app, "GET", "/api/v1/pricing?cycle=annual", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plans"][1]["price"], "$23");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app(ScriptedBackend::new());
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");
        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["voice_effects"], json!([]));
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
