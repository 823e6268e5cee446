//! API client types and trait definitions
//!
//! This module defines the backend contract used by the store. It is
//! implemented once over an HTTP transport (see [`crate::supabase`]) and by an
//! in-memory double for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::{
    Flashcard, ScheduleEntry, Session, StudySession, Subject, TopicStatus, UserInfo, Weekday,
};

/// API error types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    /// Network or connection error
    #[error("Network error: {0}")]
    Network(String),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Authentication required or failed
    #[error("Auth error: {0}")]
    Auth(String),
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Map a non-success HTTP status and the backend's message to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Auth(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Server { status, message },
        }
    }

    /// The backend's message without the error-kind prefix, for alerts
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Parse(msg)
            | ApiError::Auth(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::Server { message, .. } => message,
        }
    }
}

/// Email/password pair for sign-in and sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Request body for refreshing a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTopic {
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub status: TopicStatus,
}

/// Partial topic update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlashcard {
    pub user_id: Uuid,
    pub label: String,
    pub question: String,
    pub answer: String,
    /// New cards are due immediately
    #[serde(default)]
    pub next_review: Option<NaiveDate>,
}

/// Body of a flashcard reschedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardReview {
    pub next_review: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudySession {
    pub user_id: Uuid,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub user_id: Uuid,
    pub weekday: Weekday,
    pub subject_id: Uuid,
}

/// API endpoint definitions
pub mod endpoints {
    use crate::protocol::ATTACHMENTS_BUCKET;

    pub const AUTH_SIGNUP: &str = "/auth/v1/signup";
    pub const AUTH_TOKEN_PASSWORD: &str = "/auth/v1/token?grant_type=password";
    pub const AUTH_TOKEN_REFRESH: &str = "/auth/v1/token?grant_type=refresh_token";
    pub const AUTH_LOGOUT: &str = "/auth/v1/logout";

    pub const SUBJECTS: &str = "subjects";
    pub const TOPICS: &str = "topics";
    pub const ATTACHMENTS: &str = "attachments";
    pub const FLASHCARDS: &str = "flashcards";
    pub const STUDY_SESSIONS: &str = "study_sessions";
    pub const SCHEDULE_ENTRIES: &str = "schedule_entries";

    pub fn table(name: &str) -> String {
        format!("/rest/v1/{}", name)
    }

    pub fn storage_object(path: &str) -> String {
        format!("/storage/v1/object/{}/{}", ATTACHMENTS_BUCKET, path)
    }

    pub fn storage_public(path: &str) -> String {
        format!("/storage/v1/object/public/{}/{}", ATTACHMENTS_BUCKET, path)
    }
}

/// Trait defining the StudyFlow backend API
///
/// Every data call takes the caller's [`Session`]: the access token
/// authorizes the request and the session's owner id scopes every filter and
/// insert. All methods are async and return `Result<T, ApiError>`.
#[allow(async_fn_in_trait)]
pub trait StudyApi {
    // --- auth ---

    /// Create an account. Returns `None` when the backend requires the
    /// e-mail address to be confirmed before a session is issued.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, ApiError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    /// Exchange a refresh token for a fresh session
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError>;

    async fn sign_out(&self, session: &Session) -> Result<(), ApiError>;

    // --- subjects and topics ---

    /// Subjects ordered by creation, each with topics and their attachments
    async fn list_subjects(&self, session: &Session) -> Result<Vec<Subject>, ApiError>;

    async fn insert_subject(&self, session: &Session, subject: &NewSubject) -> Result<(), ApiError>;

    async fn delete_subject(&self, session: &Session, subject_id: Uuid) -> Result<(), ApiError>;

    /// Ids of every topic belonging to a subject
    async fn list_topic_ids(&self, session: &Session, subject_id: Uuid)
        -> Result<Vec<Uuid>, ApiError>;

    async fn insert_topic(&self, session: &Session, topic: &NewTopic) -> Result<(), ApiError>;

    async fn update_topic(
        &self,
        session: &Session,
        topic_id: Uuid,
        patch: &TopicPatch,
    ) -> Result<(), ApiError>;

    /// Delete topics by id. An empty slice is a no-op.
    async fn delete_topics(&self, session: &Session, topic_ids: &[Uuid]) -> Result<(), ApiError>;

    // --- attachments ---

    async fn insert_attachment(
        &self,
        session: &Session,
        attachment: &NewAttachment,
    ) -> Result<(), ApiError>;

    async fn delete_attachment(&self, session: &Session, attachment_id: Uuid)
        -> Result<(), ApiError>;

    /// Delete every attachment whose topic is in the set. An empty slice is a no-op.
    async fn delete_attachments_for_topics(
        &self,
        session: &Session,
        topic_ids: &[Uuid],
    ) -> Result<(), ApiError>;

    /// Store raw bytes under a path in the attachments bucket
    async fn upload_object(
        &self,
        session: &Session,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError>;

    /// Public URL of an object in the attachments bucket
    fn public_url(&self, path: &str) -> String;

    // --- flashcards ---

    async fn list_flashcards(&self, session: &Session) -> Result<Vec<Flashcard>, ApiError>;

    async fn insert_flashcard(&self, session: &Session, card: &NewFlashcard)
        -> Result<(), ApiError>;

    async fn reschedule_flashcard(
        &self,
        session: &Session,
        card_id: Uuid,
        next_review: NaiveDate,
    ) -> Result<(), ApiError>;

    async fn delete_flashcard(&self, session: &Session, card_id: Uuid) -> Result<(), ApiError>;

    /// Delete every card filed under a label
    async fn delete_flashcards_with_label(&self, session: &Session, label: &str)
        -> Result<(), ApiError>;

    // --- study sessions ---

    async fn list_study_sessions(&self, session: &Session) -> Result<Vec<StudySession>, ApiError>;

    async fn insert_study_session(
        &self,
        session: &Session,
        study_session: &NewStudySession,
    ) -> Result<(), ApiError>;

    /// Delete the owner's whole study history
    async fn delete_study_sessions(&self, session: &Session) -> Result<(), ApiError>;

    // --- schedule ---

    /// Schedule rows with the assigned subject's name joined in
    async fn list_schedule(&self, session: &Session) -> Result<Vec<ScheduleEntry>, ApiError>;

    async fn insert_schedule_entry(
        &self,
        session: &Session,
        entry: &NewScheduleEntry,
    ) -> Result<(), ApiError>;

    async fn delete_schedule_entry(&self, session: &Session, entry_id: Uuid)
        -> Result<(), ApiError>;
}

/// Configuration for creating an API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Base URL of the backend project (e.g., "https://abcd.supabase.co")
    pub base_url: String,
    /// Public anonymous key sent as `apikey` on every request
    pub anon_key: String,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}
