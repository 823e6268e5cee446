//! Supabase REST implementation of [`StudyApi`]
//!
//! The request building and response decoding live here once; the actual
//! HTTP round trip is delegated to a [`Transport`], implemented with gloo-net
//! in the browser and reqwest on the command line.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::api::{
    endpoints, ApiClientConfig, ApiError, Credentials, FlashcardReview, NewAttachment,
    NewFlashcard, NewScheduleEntry, NewStudySession, NewSubject, NewTopic, RefreshRequest,
    StudyApi, TopicPatch,
};
use crate::protocol::UNNAMED_SUBJECT;
use crate::{Flashcard, ScheduleEntry, Session, StudySession, Subject, UserInfo, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully built HTTP request, ready for a transport to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<B: Serialize>(self, body: &B) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(self.bytes("application/json", bytes))
    }

    pub fn bytes(mut self, content_type: &str, bytes: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Type".to_string(), content_type.to_string()));
        self.body = Some(bytes);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests over the wire. Connection failures map to [`ApiError::Network`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Pull a human-readable message out of an error body
pub fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["msg", "error_description", "message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("HTTP {}", status)
    } else {
        text
    }
}

/// Session payload returned by the token and signup endpoints
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserInfo,
}

impl AuthResponse {
    fn into_session(self, now: i64) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now + secs));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JoinedSubject {
    #[serde(default)]
    name: Option<String>,
}

/// Schedule row as selected with its subject embedded
#[derive(Debug, Deserialize)]
struct ScheduleRow {
    id: Uuid,
    user_id: Uuid,
    weekday: String,
    subject_id: Uuid,
    #[serde(default)]
    subjects: Option<JoinedSubject>,
}

impl ScheduleRow {
    fn into_entry(self) -> Option<ScheduleEntry> {
        let Some(weekday) = Weekday::parse(&self.weekday) else {
            log::warn!(
                "Skipping schedule entry {} with unknown weekday {:?}",
                self.id,
                self.weekday
            );
            return None;
        };
        let subject_name = self
            .subjects
            .and_then(|s| s.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_SUBJECT.to_string());
        Some(ScheduleEntry {
            id: self.id,
            user_id: self.user_id,
            weekday,
            subject_id: self.subject_id,
            subject_name,
        })
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

fn in_list(ids: &[Uuid]) -> String {
    let joined = ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", joined)
}

/// [`StudyApi`] over the Supabase auth, PostgREST and storage endpoints
#[derive(Debug, Clone)]
pub struct SupabaseApi<T> {
    config: ApiClientConfig,
    transport: T,
}

impl<T: Transport> SupabaseApi<T> {
    pub fn new(config: ApiClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    fn request(&self, method: Method, url: String, session: Option<&Session>) -> HttpRequest {
        let request = HttpRequest::new(method, url).header("apikey", self.config.anon_key.clone());
        match session {
            Some(session) => {
                request.header("Authorization", format!("Bearer {}", session.access_token))
            }
            None => request,
        }
    }

    fn rest_url(&self, table: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.config.url(&endpoints::table(table)))
            .map_err(|e| ApiError::Network(format!("Invalid backend URL: {}", e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    fn rest(
        &self,
        method: Method,
        session: &Session,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<HttpRequest, ApiError> {
        let url = self.rest_url(table, query)?;
        let request = self.request(method, url, Some(session));
        Ok(match method {
            Method::Post | Method::Patch => request.header("Prefer", "return=minimal"),
            _ => request,
        })
    }

    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, ApiError> {
        log::debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            let message = error_message(response.status, &response.body);
            log::debug!("Request failed with {}: {}", response.status, message);
            Err(ApiError::from_status(response.status, message))
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_session(&self, request: HttpRequest) -> Result<Session, ApiError> {
        let auth: AuthResponse = self.fetch(request).await?;
        Ok(auth.into_session(Utc::now().timestamp()))
    }
}

impl<T: Transport> StudyApi for SupabaseApi<T> {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, ApiError> {
        let request = self
            .request(Method::Post, self.config.url(endpoints::AUTH_SIGNUP), None)
            .json(credentials)?;
        let value: serde_json::Value = self.fetch(request).await?;
        // Without auto-confirm the endpoint answers with the bare user
        if value.get("access_token").is_none() {
            return Ok(None);
        }
        let auth: AuthResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(Some(auth.into_session(Utc::now().timestamp())))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self
            .request(
                Method::Post,
                self.config.url(endpoints::AUTH_TOKEN_PASSWORD),
                None,
            )
            .json(credentials)?;
        self.fetch_session(request).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let request = self
            .request(
                Method::Post,
                self.config.url(endpoints::AUTH_TOKEN_REFRESH),
                None,
            )
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })?;
        self.fetch_session(request).await
    }

    async fn sign_out(&self, session: &Session) -> Result<(), ApiError> {
        let request = self.request(
            Method::Post,
            self.config.url(endpoints::AUTH_LOGOUT),
            Some(session),
        );
        self.execute(request).await.map(|_| ())
    }

    async fn list_subjects(&self, session: &Session) -> Result<Vec<Subject>, ApiError> {
        let request = self.rest(
            Method::Get,
            session,
            endpoints::SUBJECTS,
            &[
                ("select", "*,topics(*,attachments(*))".to_string()),
                ("user_id", eq(session.owner_id())),
                ("order", "created_at.asc".to_string()),
                ("topics.order", "created_at.asc".to_string()),
                ("topics.attachments.order", "created_at.asc".to_string()),
            ],
        )?;
        self.fetch(request).await
    }

    async fn insert_subject(
        &self,
        session: &Session,
        subject: &NewSubject,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::SUBJECTS, &[])?
            .json(subject)?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_subject(&self, session: &Session, subject_id: Uuid) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::SUBJECTS,
            &[("id", eq(subject_id)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn list_topic_ids(
        &self,
        session: &Session,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, ApiError> {
        #[derive(Deserialize)]
        struct IdRow {
            id: Uuid,
        }

        let request = self.rest(
            Method::Get,
            session,
            endpoints::TOPICS,
            &[
                ("select", "id".to_string()),
                ("subject_id", eq(subject_id)),
                ("user_id", eq(session.owner_id())),
            ],
        )?;
        let rows: Vec<IdRow> = self.fetch(request).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn insert_topic(&self, session: &Session, topic: &NewTopic) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::TOPICS, &[])?
            .json(topic)?;
        self.execute(request).await.map(|_| ())
    }

    async fn update_topic(
        &self,
        session: &Session,
        topic_id: Uuid,
        patch: &TopicPatch,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(
                Method::Patch,
                session,
                endpoints::TOPICS,
                &[("id", eq(topic_id)), ("user_id", eq(session.owner_id()))],
            )?
            .json(patch)?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_topics(&self, session: &Session, topic_ids: &[Uuid]) -> Result<(), ApiError> {
        if topic_ids.is_empty() {
            return Ok(());
        }
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::TOPICS,
            &[("id", in_list(topic_ids)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn insert_attachment(
        &self,
        session: &Session,
        attachment: &NewAttachment,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::ATTACHMENTS, &[])?
            .json(attachment)?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_attachment(
        &self,
        session: &Session,
        attachment_id: Uuid,
    ) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::ATTACHMENTS,
            &[("id", eq(attachment_id)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_attachments_for_topics(
        &self,
        session: &Session,
        topic_ids: &[Uuid],
    ) -> Result<(), ApiError> {
        if topic_ids.is_empty() {
            return Ok(());
        }
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::ATTACHMENTS,
            &[
                ("topic_id", in_list(topic_ids)),
                ("user_id", eq(session.owner_id())),
            ],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn upload_object(
        &self,
        session: &Session,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let request = self
            .request(
                Method::Post,
                self.config.url(&endpoints::storage_object(path)),
                Some(session),
            )
            .header("Cache-Control", "max-age=3600")
            .bytes(content_type, bytes);
        self.execute(request).await.map(|_| ())
    }

    fn public_url(&self, path: &str) -> String {
        self.config.url(&endpoints::storage_public(path))
    }

    async fn list_flashcards(&self, session: &Session) -> Result<Vec<Flashcard>, ApiError> {
        let request = self.rest(
            Method::Get,
            session,
            endpoints::FLASHCARDS,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(session.owner_id())),
                ("order", "created_at.asc".to_string()),
            ],
        )?;
        self.fetch(request).await
    }

    async fn insert_flashcard(
        &self,
        session: &Session,
        card: &NewFlashcard,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::FLASHCARDS, &[])?
            .json(card)?;
        self.execute(request).await.map(|_| ())
    }

    async fn reschedule_flashcard(
        &self,
        session: &Session,
        card_id: Uuid,
        next_review: chrono::NaiveDate,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(
                Method::Patch,
                session,
                endpoints::FLASHCARDS,
                &[("id", eq(card_id)), ("user_id", eq(session.owner_id()))],
            )?
            .json(&FlashcardReview { next_review })?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_flashcard(&self, session: &Session, card_id: Uuid) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::FLASHCARDS,
            &[("id", eq(card_id)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_flashcards_with_label(
        &self,
        session: &Session,
        label: &str,
    ) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::FLASHCARDS,
            &[("label", eq(label)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn list_study_sessions(&self, session: &Session) -> Result<Vec<StudySession>, ApiError> {
        let request = self.rest(
            Method::Get,
            session,
            endpoints::STUDY_SESSIONS,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(session.owner_id())),
                ("order", "created_at.desc".to_string()),
            ],
        )?;
        self.fetch(request).await
    }

    async fn insert_study_session(
        &self,
        session: &Session,
        study_session: &NewStudySession,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::STUDY_SESSIONS, &[])?
            .json(study_session)?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_study_sessions(&self, session: &Session) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::STUDY_SESSIONS,
            &[("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }

    async fn list_schedule(&self, session: &Session) -> Result<Vec<ScheduleEntry>, ApiError> {
        let request = self.rest(
            Method::Get,
            session,
            endpoints::SCHEDULE_ENTRIES,
            &[
                (
                    "select",
                    "id,user_id,weekday,subject_id,subjects(name)".to_string(),
                ),
                ("user_id", eq(session.owner_id())),
                ("order", "created_at.asc".to_string()),
            ],
        )?;
        let rows: Vec<ScheduleRow> = self.fetch(request).await?;
        Ok(rows.into_iter().filter_map(ScheduleRow::into_entry).collect())
    }

    async fn insert_schedule_entry(
        &self,
        session: &Session,
        entry: &NewScheduleEntry,
    ) -> Result<(), ApiError> {
        let request = self
            .rest(Method::Post, session, endpoints::SCHEDULE_ENTRIES, &[])?
            .json(entry)?;
        self.execute(request).await.map(|_| ())
    }

    async fn delete_schedule_entry(
        &self,
        session: &Session,
        entry_id: Uuid,
    ) -> Result<(), ApiError> {
        let request = self.rest(
            Method::Delete,
            session,
            endpoints::SCHEDULE_ENTRIES,
            &[("id", eq(entry_id)), ("user_id", eq(session.owner_id()))],
        )?;
        self.execute(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every request and answers from a queue
    #[derive(Default)]
    struct FakeTransport {
        sent: RefCell<Vec<HttpRequest>>,
        replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    }

    impl FakeTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }));
            self
        }

        fn fail(self, err: ApiError) -> Self {
            self.replies.borrow_mut().push_back(Err(err));
            self
        }
    }

    impl Transport for &FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.borrow_mut().push(request);
            self.replies.borrow_mut().pop_front().unwrap_or(Ok(HttpResponse {
                status: 204,
                body: Vec::new(),
            }))
        }
    }

    fn config() -> ApiClientConfig {
        ApiClientConfig::new("https://demo.supabase.co", "anon-key")
    }

    fn session() -> Session {
        Session {
            access_token: "token-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at: Some(2_000_000_000),
            user: UserInfo {
                id: Uuid::parse_str("0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11").unwrap(),
                email: Some("ada@example.com".to_string()),
            },
        }
    }

    #[test]
    fn error_message_prefers_known_keys() {
        assert_eq!(
            error_message(
                400,
                br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(error_message(422, br#"{"msg":"Password too short"}"#), "Password too short");
        assert_eq!(
            error_message(409, br#"{"code":"23505","message":"duplicate key"}"#),
            "duplicate key"
        );
        assert_eq!(error_message(502, b"Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(500, b""), "HTTP 500");
    }

    #[tokio::test]
    async fn sign_in_sends_credentials_and_derives_expiry() {
        let transport = FakeTransport::default().reply(
            200,
            r#"{"access_token":"a","refresh_token":"r","expires_in":3600,
                "user":{"id":"0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11","email":"ada@example.com"}}"#,
        );
        let api = SupabaseApi::new(config(), &transport);

        let before = Utc::now().timestamp();
        let session = api
            .sign_in(&Credentials {
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        assert_eq!(session.access_token, "a");
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= before + 3600);

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(
            sent[0].url,
            "https://demo.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(sent[0].header_value("apikey"), Some("anon-key"));
        assert_eq!(sent[0].header_value("Authorization"), None);
        let body: serde_json::Value =
            serde_json::from_slice(sent[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn sign_up_without_session_means_confirmation_pending() {
        let transport = FakeTransport::default().reply(
            200,
            r#"{"id":"0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11","email":"ada@example.com"}"#,
        );
        let api = SupabaseApi::new(config(), &transport);
        let outcome = api
            .sign_up(&Credentials {
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn failed_sign_in_surfaces_backend_message() {
        let transport = FakeTransport::default().reply(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        let api = SupabaseApi::new(config(), &transport);
        let err = api
            .sign_in(&Credentials {
                email: "ada@example.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                message: "Invalid login credentials".into()
            }
        );
    }

    #[tokio::test]
    async fn list_subjects_embeds_children_and_scopes_owner() {
        let transport = FakeTransport::default().reply(200, "[]");
        let api = SupabaseApi::new(config(), &transport);
        let subjects = api.list_subjects(&session()).await.unwrap();
        assert!(subjects.is_empty());

        let sent = transport.sent.borrow();
        let url = Url::parse(&sent[0].url).unwrap();
        assert_eq!(url.path(), "/rest/v1/subjects");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("select".into(), "*,topics(*,attachments(*))".into())));
        assert!(pairs.contains(&(
            "user_id".into(),
            "eq.0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11".into()
        )));
        assert_eq!(sent[0].header_value("Authorization"), Some("Bearer token-1"));
    }

    #[tokio::test]
    async fn inserts_ask_for_minimal_return() {
        let transport = FakeTransport::default().reply(201, "");
        let api = SupabaseApi::new(config(), &transport);
        let owner = session().owner_id();
        api.insert_subject(
            &session(),
            &NewSubject {
                user_id: owner,
                name: "Physics".into(),
            },
        )
        .await
        .unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].header_value("Prefer"), Some("return=minimal"));
        assert_eq!(sent[0].header_value("Content-Type"), Some("application/json"));
        let body: serde_json::Value =
            serde_json::from_slice(sent[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["user_id"], owner.to_string());
    }

    #[tokio::test]
    async fn delete_topics_uses_membership_filter() {
        let transport = FakeTransport::default();
        let api = SupabaseApi::new(config(), &transport);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        api.delete_topics(&session(), &[a, b]).await.unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Delete);
        let url = Url::parse(&sent[0].url).unwrap();
        let id_filter = url
            .query_pairs()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned());
        assert_eq!(id_filter, Some(format!("in.({},{})", a, b)));
    }

    #[tokio::test]
    async fn empty_id_sets_skip_the_round_trip() {
        let transport = FakeTransport::default();
        let api = SupabaseApi::new(config(), &transport);
        api.delete_topics(&session(), &[]).await.unwrap();
        api.delete_attachments_for_topics(&session(), &[])
            .await
            .unwrap();
        assert!(transport.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn schedule_rows_fall_back_to_unnamed_subject() {
        let transport = FakeTransport::default().reply(
            200,
            r#"[
                {"id":"5f0c2d1e-8b7a-4b3c-9e2d-1a0f9e8d7c61","user_id":"0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11",
                 "weekday":"MON","subject_id":"7d6f5a8e-2f1e-4c1e-9a63-0f3e9f8a1b01","subjects":{"name":"Calculus"}},
                {"id":"9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d","user_id":"0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11",
                 "weekday":"fri","subject_id":"7d6f5a8e-2f1e-4c1e-9a63-0f3e9f8a1b02","subjects":null},
                {"id":"1a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d","user_id":"0b1c8a52-3a43-4c5e-8d0b-6a1f9b7e2c11",
                 "weekday":"XYZ","subject_id":"7d6f5a8e-2f1e-4c1e-9a63-0f3e9f8a1b03","subjects":null}
            ]"#,
        );
        let api = SupabaseApi::new(config(), &transport);
        let entries = api.list_schedule(&session()).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].weekday, Weekday::Mon);
        assert_eq!(entries[0].subject_name, "Calculus");
        assert_eq!(entries[1].weekday, Weekday::Fri);
        assert_eq!(entries[1].subject_name, UNNAMED_SUBJECT);
    }

    #[tokio::test]
    async fn upload_sends_raw_bytes_with_content_type() {
        let transport = FakeTransport::default().reply(200, r#"{"Key":"attachments/x"}"#);
        let api = SupabaseApi::new(config(), &transport);
        api.upload_object(&session(), "u/t/1_notes.pdf", "application/pdf", vec![1, 2, 3])
            .await
            .unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(
            sent[0].url,
            "https://demo.supabase.co/storage/v1/object/attachments/u/t/1_notes.pdf"
        );
        assert_eq!(sent[0].header_value("content-type"), Some("application/pdf"));
        assert_eq!(sent[0].body.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(
            api.public_url("u/t/1_notes.pdf"),
            "https://demo.supabase.co/storage/v1/object/public/attachments/u/t/1_notes.pdf"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_a_network_error() {
        let transport =
            FakeTransport::default().fail(ApiError::Network("connection refused".into()));
        let api = SupabaseApi::new(config(), &transport);
        let err = api.list_flashcards(&session()).await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn malformed_rows_are_parse_errors() {
        let transport = FakeTransport::default().reply(200, r#"{"not":"a list"}"#);
        let api = SupabaseApi::new(config(), &transport);
        let err = api.list_study_sessions(&session()).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
