//! Caller-side holder for the enrollment gate of one course.
//!
//! The snapshot is a hint for fast feedback only. Every mutating call drops
//! it, so [`EnrollmentGate::current`] returns `None` until the next
//! [`EnrollmentGate::refresh`] and a stale `ALLOWED` can never be reused.

use coursegate_core::gate::{GateState, GateView};
use coursegate_core::progress::ProgressUpdate;
use coursegate_core::types::DbId;

use crate::api::{ClientError, Completion, CourseGateApi, OrderSummary, ProgressRow};

pub struct EnrollmentGate {
    api: CourseGateApi,
    course_id: DbId,
    snapshot: Option<GateView>,
}

impl EnrollmentGate {
    pub fn new(api: CourseGateApi, course_id: DbId) -> Self {
        Self {
            api,
            course_id,
            snapshot: None,
        }
    }

    pub fn course_id(&self) -> DbId {
        self.course_id
    }

    /// The last refreshed state, or `None` if a mutation happened since.
    pub fn current(&self) -> Option<&GateView> {
        self.snapshot.as_ref()
    }

    /// Re-read the gate from the server.
    ///
    /// Never fails: transport errors, non-2xx responses, and malformed bodies
    /// all become [`GateState::Error`], which the caller may refresh again.
    pub async fn refresh(&mut self) -> &GateView {
        let view = match self.api.gate(self.course_id).await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(course_id = self.course_id, error = %e, "Gate refresh failed");
                GateView::from(GateState::Error)
            }
        };
        tracing::debug!(course_id = self.course_id, state = view.state.as_str(), "Gate refreshed");
        self.snapshot.insert(view)
    }

    /// Forget the current snapshot.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Change credentials. Any state observed under the old identity is
    /// discarded.
    pub fn set_token(&mut self, token: Option<String>) {
        self.invalidate();
        self.api.set_token(token);
    }

    pub async fn enroll(&mut self) -> Result<OrderSummary, ClientError> {
        self.invalidate();
        self.api.enroll(self.course_id).await
    }

    pub async fn complete(&mut self, lesson_id: DbId) -> Result<Completion, ClientError> {
        self.invalidate();
        self.api.complete(lesson_id).await
    }

    pub async fn record_progress(
        &mut self,
        lesson_id: DbId,
        update: &ProgressUpdate,
    ) -> Result<ProgressRow, ClientError> {
        self.invalidate();
        self.api.record_progress(lesson_id, update).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const GATE_PATH: &str = "/api/v1/courses/7/gate";

    fn gate_for(url: String) -> EnrollmentGate {
        let api = CourseGateApi::new(url, Duration::from_secs(5)).unwrap();
        EnrollmentGate::new(api, 7)
    }

    async fn server_with_gate(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn api_url(server: &MockServer) -> String {
        format!("{}/api/v1", server.uri())
    }

    #[tokio::test]
    async fn refresh_stores_server_state() {
        let server = server_with_gate(json!({
            "data": { "state": "PENDING_PAYMENT", "message": "Processing" }
        }))
        .await;
        let mut gate = gate_for(api_url(&server));
        assert!(gate.current().is_none());

        let view = gate.refresh().await;
        assert_eq!(view.state, GateState::PendingPayment);
        assert_eq!(gate.current().unwrap().message, "Processing");
    }

    #[tokio::test]
    async fn refresh_reads_privileged_flag() {
        let server = server_with_gate(json!({
            "data": { "state": "ALLOWED", "privileged": true, "message": "Staff access." }
        }))
        .await;
        let mut gate = gate_for(api_url(&server));
        assert_eq!(
            gate.refresh().await.state,
            GateState::Allowed { privileged: true }
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_error_state() {
        // Port 1 is never listening in the test environment.
        let mut gate = gate_for("http://127.0.0.1:1/api/v1".to_string());
        assert_eq!(gate.refresh().await.state, GateState::Error);
        assert!(gate.current().is_some());

        // A failed mutation still drops the snapshot.
        assert_matches!(gate.enroll().await, Err(ClientError::Request(_)));
        assert!(gate.current().is_none());
    }

    #[tokio::test]
    async fn server_error_is_error_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GATE_PATH))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({ "code": "TRANSIENT", "retryable": true })),
            )
            .mount(&server)
            .await;
        let mut gate = gate_for(api_url(&server));
        assert_eq!(gate.refresh().await.state, GateState::Error);
    }

    #[tokio::test]
    async fn malformed_body_is_error_state() {
        let server = server_with_gate(json!({ "data": { "state": "MAYBE" } })).await;
        let mut gate = gate_for(api_url(&server));
        assert_eq!(gate.refresh().await.state, GateState::Error);
    }

    #[tokio::test]
    async fn mutations_drop_the_snapshot() {
        let server = server_with_gate(json!({
            "data": { "state": "ALLOWED", "privileged": false, "message": "ok" }
        }))
        .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/lessons/3/complete"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "next_lesson_id": 4 } })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/courses/7/enroll"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "code": "CONFLICT" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/lessons/3/progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "lesson_id": 3,
                    "status": "in_progress",
                    "percent": 40,
                    "last_position_sec": 12
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut gate = gate_for(api_url(&server));

        gate.refresh().await;
        let completion = gate.complete(3).await.unwrap();
        assert_eq!(completion.next_lesson_id, Some(4));
        assert!(gate.current().is_none());

        gate.refresh().await;
        let err = gate.enroll().await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.code(), Some("CONFLICT"));
        assert!(gate.current().is_none());

        gate.refresh().await;
        let update = ProgressUpdate {
            percent: Some(40),
            position_sec: Some(12),
        };
        let row = gate.record_progress(3, &update).await.unwrap();
        assert_eq!(row.status, "in_progress");
        assert!(gate.current().is_none());

        gate.refresh().await;
        gate.set_token(Some("other-user".to_string()));
        assert!(gate.current().is_none());
    }
}
