//! REST client for the `/api/v1` course access routes.

use std::time::Duration;

use coursegate_core::gate::GateView;
use coursegate_core::progress::{CourseProgress, ProgressUpdate};
use coursegate_core::sequencing::LockReason;
use coursegate_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one API deployment.
#[derive(Clone)]
pub struct CourseGateApi {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        status: u16,
        /// Machine-readable `code` from the error body, when it had one.
        code: Option<String>,
        /// Set on `SEQUENCE_LOCKED`: the lesson that must be completed first.
        blocking_lesson_id: Option<DbId>,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// The server's error code, e.g. `NOT_ENTITLED` or `SEQUENCE_LOCKED`.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            ClientError::Request(_) => None,
        }
    }

    /// The lesson blocking a sequence-locked request.
    pub fn blocking_lesson_id(&self) -> Option<DbId> {
        match self {
            ClientError::Api {
                blocking_lesson_id, ..
            } => *blocking_lesson_id,
            ClientError::Request(_) => None,
        }
    }
}

/// The `{ "error", "code" }` body of a failed request.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    blocking_lesson_id: Option<DbId>,
}

/// The `{ "data": ... }` envelope every success response uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// An order as returned by `enroll`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    pub id: DbId,
    pub course_id: DbId,
    pub enrollment_id: Option<DbId>,
    pub status: String,
    pub amount_cents: i64,
}

/// One row of the lesson list.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonSummary {
    pub id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub locked: bool,
    pub lock_reason: Option<LockReason>,
}

/// Full lesson content, served only once the server-side guard passes.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonDetail {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub body: String,
    pub video_url: Option<String>,
    pub position: usize,
    pub previous_lesson_id: Option<DbId>,
    /// `None` on the last lesson.
    pub next_lesson_id: Option<DbId>,
}

/// Result of completing a lesson.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    /// `None` at the end of the course.
    pub next_lesson_id: Option<DbId>,
}

/// Stored progress after a heartbeat.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRow {
    pub lesson_id: DbId,
    pub status: String,
    pub percent: i16,
    pub last_position_sec: i32,
}

impl CourseGateApi {
    /// Create a client with its own connection pool and a bounded timeout.
    ///
    /// * `api_url` - Base URL including the version prefix, e.g.
    ///   `http://localhost:3000/api/v1`.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Set or clear the bearer token sent with every request.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// `GET /courses/{course_id}/gate`
    pub async fn gate(&self, course_id: DbId) -> Result<GateView, ClientError> {
        let request = self
            .client
            .get(format!("{}/courses/{course_id}/gate", self.api_url));
        self.send(request).await
    }

    /// `POST /courses/{course_id}/enroll`
    pub async fn enroll(&self, course_id: DbId) -> Result<OrderSummary, ClientError> {
        let request = self
            .client
            .post(format!("{}/courses/{course_id}/enroll", self.api_url));
        self.send(request).await
    }

    /// `GET /courses/{course_id}/lessons`
    pub async fn list_lessons(&self, course_id: DbId) -> Result<Vec<LessonSummary>, ClientError> {
        let request = self
            .client
            .get(format!("{}/courses/{course_id}/lessons", self.api_url));
        self.send(request).await
    }

    /// `GET /courses/{course_id}/lessons/{lesson_id}`
    ///
    /// A locked lesson fails with [`ClientError::Api`] carrying
    /// `SEQUENCE_LOCKED` and the blocking lesson, or `NOT_ENTITLED`.
    pub async fn lesson_detail(
        &self,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<LessonDetail, ClientError> {
        let request = self.client.get(format!(
            "{}/courses/{course_id}/lessons/{lesson_id}",
            self.api_url
        ));
        self.send(request).await
    }

    /// `GET /courses/{course_id}/progress`
    pub async fn course_progress(&self, course_id: DbId) -> Result<CourseProgress, ClientError> {
        let request = self
            .client
            .get(format!("{}/courses/{course_id}/progress", self.api_url));
        self.send(request).await
    }

    /// `PUT /lessons/{lesson_id}/progress`
    pub async fn record_progress(
        &self,
        lesson_id: DbId,
        update: &ProgressUpdate,
    ) -> Result<ProgressRow, ClientError> {
        let request = self
            .client
            .put(format!("{}/lessons/{lesson_id}/progress", self.api_url))
            .json(update);
        self.send(request).await
    }

    /// `POST /lessons/{lesson_id}/complete`
    pub async fn complete(&self, lesson_id: DbId) -> Result<Completion, ClientError> {
        let request = self
            .client
            .post(format!("{}/lessons/{lesson_id}/complete", self.api_url));
        self.send(request).await
    }

    // ---- private helpers ----

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let envelope: Envelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Ensure the response has a success status code, or turn it into
    /// [`ClientError::Api`] carrying the body text and any error code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: parsed.code,
                blocking_lesson_id: parsed.blocking_lesson_id,
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
