use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jiff::{SignedDuration, Timestamp};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use clerkship_storage::{DocumentStore, MemoryStore};
use clerkship_wizard::history::Clock;
use clerkship_wizard::CaseFiles;

use super::router;
use crate::state::AppState;

struct TestClock(Mutex<Timestamp>);

impl TestClock {
    fn advance(&self, by: SignedDuration) {
        let mut now = self.0.lock().unwrap();
        *now = now.checked_add(by).unwrap();
    }
}

impl Clock for TestClock {
    fn now(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }
}

struct TestApp {
    app: Router,
    state: AppState,
    store: Arc<MemoryStore>,
    clock: Arc<TestClock>,
    _dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("users.txt", "code,name\nA1,Jane\n"),
            ("dx_list.txt", "Croup\nEpiglottitis\nForeign body\nAsthma\nPneumonia\nAnaphylaxis\n"),
            ("int.txt", "No Acute Intervention\nDexamethasone\n"),
            ("labtests.txt", "CBC\nCRP\n"),
            ("radtests.txt", "Neck X-ray\n"),
            ("other_tests.txt", "Laryngoscopy\n"),
            ("results.txt", "Neck X-ray\n"),
        ] {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let store = Arc::new(MemoryStore::new());
        let case = Arc::new(CaseFiles::load(dir.path()).unwrap());
        let clock = Arc::new(TestClock(Mutex::new(Timestamp::UNIX_EPOCH)));
        let state = AppState::new(store.clone(), case, SignedDuration::from_mins(15))
            .with_clock(clock.clone())
            .with_session_idle(SignedDuration::from_mins(30));
        Self {
            app: router(state.clone()),
            state,
            store,
            clock,
            _dir: dir,
        }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Open a session and log in as A1; returns the session id.
    async fn logged_in(&self) -> String {
        let (status, created) = self.call("POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["view"]["page"], "welcome");
        let id = created["session_id"].as_str().unwrap().to_string();
        let (status, _) = self.call("POST", &format!("/sessions/{id}/advance"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, view) = self
            .call("POST", &format!("/sessions/{id}/login"), Some(json!({"code": "A1"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["learner"], "Jane");
        id
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let t = TestApp::new();
    let (status, body) = t.call("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn catalogs_are_served_by_name() {
    let t = TestApp::new();
    let (status, body) = t.call("GET", "/catalogs/lab-tests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["CBC", "CRP"]));
    let (status, _) = t.call("GET", "/catalogs/payroll", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let t = TestApp::new();
    let (status, _) = t
        .call("GET", "/sessions/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_code_is_unauthorized() {
    let t = TestApp::new();
    let (_, created) = t.call("POST", "/sessions", None).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    t.call("POST", &format!("/sessions/{id}/advance"), None).await;
    let (status, body) = t
        .call("POST", &format!("/sessions/{id}/login"), Some(json!({"code": "ZZ"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid code");
}

#[tokio::test]
async fn vitals_and_diagnoses_flow_through_to_the_store() {
    let t = TestApp::new();
    let id = t.logged_in().await;

    let (status, view) = t
        .call(
            "POST",
            &format!("/sessions/{id}/intake"),
            Some(json!({"heart_rate": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "diagnoses");

    let dx = json!(["Croup", "Epiglottitis", "Foreign body", "Asthma", "Pneumonia"]);
    let (status, view) = t
        .call("POST", &format!("/sessions/{id}/diagnoses"), Some(json!({"diagnoses": dx})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "intervention_entry");
    assert_eq!(view["content"]["kind"], "interventions");

    let doc = t.store.get("A1").await.unwrap().unwrap().into_document();
    assert_eq!(doc["vs_data"]["heart_rate"], json!(true));
    assert_eq!(doc["diagnoses_s1"], dx);
}

#[tokio::test]
async fn validation_failures_name_the_rule() {
    let t = TestApp::new();
    let id = t.logged_in().await;
    t.call("POST", &format!("/sessions/{id}/intake"), Some(json!({}))).await;

    let dx = json!(["Croup", "Croup", "Foreign body", "Asthma", "Pneumonia"]);
    let (status, body) = t
        .call("POST", &format!("/sessions/{id}/diagnoses"), Some(json!({"diagnoses": dx})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["rule"]["rule"], "duplicate_selection");
    assert_eq!(t.store.writes(), 1);
}

#[tokio::test]
async fn submitting_the_wrong_page_conflicts() {
    let t = TestApp::new();
    let id = t.logged_in().await;
    let (status, _) = t
        .call(
            "POST",
            &format!("/sessions/{id}/interventions"),
            Some(json!({"interventions": ["Dexamethasone"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_writes_are_retryable() {
    let t = TestApp::new();
    let id = t.logged_in().await;
    t.store.set_fail_writes(true);
    let (status, _) = t
        .call("POST", &format!("/sessions/{id}/intake"), Some(json!({"weight": true})))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, view) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(view["page"], "intake_form");
    assert_eq!(view["content"]["vital_signs"]["weight"], json!(true));

    t.store.set_fail_writes(false);
    let (status, view) = t
        .call("POST", &format!("/sessions/{id}/intake"), Some(json!({"weight": true})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "diagnoses");
}

#[tokio::test]
async fn reorder_panel_endpoints_edit_the_session_only() {
    let t = TestApp::new();
    let mut seeded = serde_json::Map::new();
    seeded.insert("last_page".into(), json!("laboratory_tests"));
    seeded.insert(
        "diagnoses".into(),
        json!(["Croup", "Epiglottitis", "Foreign body", "Asthma", "Pneumonia"]),
    );
    t.store.insert("A1", seeded).await;
    let id = t.logged_in().await;

    let (status, hits) = t
        .call("GET", &format!("/sessions/{id}/diagnoses/search?q=ana"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits, json!(["Anaphylaxis"]));

    let (status, slots) = t
        .call(
            "POST",
            &format!("/sessions/{id}/diagnoses/priority"),
            Some(json!({"slot": 1, "priority": "higher"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots[0], "Epiglottitis");

    let (status, slots) = t
        .call(
            "POST",
            &format!("/sessions/{id}/diagnoses/replace"),
            Some(json!({"slot": 4, "name": "anaphylaxis"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slots[4], "Anaphylaxis");
    assert_eq!(t.store.writes(), 0);

    let (_, view) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(view["diagnoses"][4], "Anaphylaxis");
    assert_eq!(view["content"]["kind"], "grid");
}

#[tokio::test]
async fn finishing_requires_the_summary_page() {
    let t = TestApp::new();
    let id = t.logged_in().await;
    let (status, _) = t.call("DELETE", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn idle_sessions_are_dropped() {
    let t = TestApp::new();
    for _ in 0..20 {
        let (status, _) = t.call("POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let id = t.logged_in().await;
    assert_eq!(t.state.sessions.len().await, 21);

    t.clock.advance(SignedDuration::from_mins(20));
    let (status, _) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.state.sessions.len().await, 21);

    // The abandoned sessions are now 40 minutes old, the touched one 20.
    t.clock.advance(SignedDuration::from_mins(20));
    let (status, _) = t.call("POST", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.state.sessions.len().await, 2);

    let (status, view) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["learner"], "Jane");

    t.clock.advance(SignedDuration::from_mins(31));
    let (status, _) = t.call("GET", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(t.state.sessions.len().await, 0);
}
