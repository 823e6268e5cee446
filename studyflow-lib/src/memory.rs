//! In-memory backend
//!
//! [`MemoryApi`] implements [`StudyApi`] against plain vectors. It checks
//! access tokens and enforces row ownership the way the hosted backend's
//! row-level security does, and any operation can be made to fail.
//!
//! There are no foreign keys: deleting a subject leaves its topics behind,
//! which is exactly what the cascade script is for.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use shared::api::{
    Credentials, NewAttachment, NewFlashcard, NewScheduleEntry, NewStudySession, NewSubject,
    NewTopic, TopicPatch,
};
use shared::protocol::UNNAMED_SUBJECT;
use shared::{
    ApiError, Attachment, Flashcard, ScheduleEntry, Session, StudyApi, StudySession, Subject,
    Topic, UserInfo, Weekday,
};

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryOp {
    SignUp,
    SignIn,
    Refresh,
    SignOut,
    ListSubjects,
    InsertSubject,
    DeleteSubject,
    ListTopicIds,
    InsertTopic,
    UpdateTopic,
    DeleteTopics,
    InsertAttachment,
    DeleteAttachment,
    DeleteAttachmentsForTopics,
    UploadObject,
    ListFlashcards,
    InsertFlashcard,
    RescheduleFlashcard,
    DeleteFlashcard,
    DeleteFlashcardsWithLabel,
    ListStudySessions,
    InsertStudySession,
    DeleteStudySessions,
    ListSchedule,
    InsertScheduleEntry,
    DeleteScheduleEntry,
}

const TOKEN_LIFETIME_SECS: i64 = 3600;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user: UserInfo,
    password: String,
    confirmed: bool,
}

#[derive(Debug, Clone)]
struct SubjectRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ScheduleRow {
    id: Uuid,
    user_id: Uuid,
    weekday: Weekday,
    subject_id: Uuid,
}

/// A stored object in the attachments bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
struct State {
    now: DateTime<Utc>,
    require_confirmation: bool,
    accounts: Vec<Account>,
    access_tokens: HashMap<String, (Uuid, i64)>,
    refresh_tokens: HashMap<String, Uuid>,
    next_token: u64,
    subjects: Vec<SubjectRow>,
    topics: Vec<Topic>,
    attachments: Vec<Attachment>,
    flashcards: Vec<Flashcard>,
    study_sessions: Vec<StudySession>,
    schedule: Vec<ScheduleRow>,
    objects: BTreeMap<String, StoredObject>,
    failing: HashSet<MemoryOp>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            require_confirmation: false,
            accounts: Vec::new(),
            access_tokens: HashMap::new(),
            refresh_tokens: HashMap::new(),
            next_token: 1,
            subjects: Vec::new(),
            topics: Vec::new(),
            attachments: Vec::new(),
            flashcards: Vec::new(),
            study_sessions: Vec::new(),
            schedule: Vec::new(),
            objects: BTreeMap::new(),
            failing: HashSet::new(),
        }
    }
}

impl State {
    fn check(&self, op: MemoryOp) -> Result<(), ApiError> {
        if self.failing.contains(&op) {
            return Err(ApiError::Server {
                status: 500,
                message: format!("injected failure: {:?}", op),
            });
        }
        Ok(())
    }

    /// Owner behind an access token, as the row-level security sees it
    fn authorize(&self, session: &Session) -> Result<Uuid, ApiError> {
        match self.access_tokens.get(&session.access_token) {
            Some((user_id, expires_at)) if *expires_at > self.now.timestamp() => Ok(*user_id),
            Some(_) => Err(ApiError::Auth("JWT expired".to_string())),
            None => Err(ApiError::Auth("invalid JWT".to_string())),
        }
    }

    fn authorize_insert(&self, session: &Session, row_owner: Uuid) -> Result<Uuid, ApiError> {
        let user_id = self.authorize(session)?;
        if row_owner != user_id {
            return Err(ApiError::Auth(
                "new row violates row-level security policy".to_string(),
            ));
        }
        Ok(user_id)
    }

    fn issue_session(&mut self, user: UserInfo) -> Session {
        let serial = self.next_token;
        self.next_token += 1;
        let access_token = format!("access-{}", serial);
        let refresh_token = format!("refresh-{}", serial);
        let expires_at = self.now.timestamp() + TOKEN_LIFETIME_SECS;
        self.access_tokens
            .insert(access_token.clone(), (user.id, expires_at));
        self.refresh_tokens.insert(refresh_token.clone(), user.id);
        Session {
            access_token,
            refresh_token,
            expires_at: Some(expires_at),
            user,
        }
    }

    /// Creation timestamps advance by a microsecond per row so ordering is stable
    fn stamp(&mut self) -> DateTime<Utc> {
        self.now += Duration::microseconds(1);
        self.now
    }
}

fn sorted_by_created<T, F: Fn(&T) -> DateTime<Utc>>(mut rows: Vec<T>, key: F) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

/// Shared-state in-memory backend. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    state: Rc<RefCell<State>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-ups yield no session until the account is confirmed
    pub fn require_confirmation(&self, required: bool) {
        self.state.borrow_mut().require_confirmation = required;
    }

    /// Mark an account as confirmed
    pub fn confirm(&self, email: &str) {
        let mut state = self.state.borrow_mut();
        for account in state.accounts.iter_mut() {
            if account.user.email.as_deref() == Some(email) {
                account.confirmed = true;
            }
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.state.borrow().now
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.state.borrow_mut().now = now;
    }

    pub fn advance(&self, by: Duration) {
        self.state.borrow_mut().now += by;
    }

    /// Make `op` fail until [`MemoryApi::heal`] is called
    pub fn fail(&self, op: MemoryOp) {
        self.state.borrow_mut().failing.insert(op);
    }

    pub fn heal(&self, op: MemoryOp) {
        self.state.borrow_mut().failing.remove(&op);
    }

    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.state.borrow().objects.get(path).cloned()
    }

    pub fn object_paths(&self) -> Vec<String> {
        self.state.borrow().objects.keys().cloned().collect()
    }

    /// Topics stored for a subject, ignoring ownership
    pub fn topic_count(&self, subject_id: Uuid) -> usize {
        self.state
            .borrow()
            .topics
            .iter()
            .filter(|t| t.subject_id == subject_id)
            .count()
    }

    /// Attachments stored for any of the given topics, ignoring ownership
    pub fn attachment_count(&self, topic_ids: &[Uuid]) -> usize {
        self.state
            .borrow()
            .attachments
            .iter()
            .filter(|a| topic_ids.contains(&a.topic_id))
            .count()
    }

    /// Insert a study session with an explicit timestamp
    pub fn seed_study_session(&self, user_id: Uuid, total_seconds: i64, created_at: DateTime<Utc>) {
        self.state.borrow_mut().study_sessions.push(StudySession {
            id: Uuid::new_v4(),
            user_id,
            total_seconds,
            created_at,
        });
    }

    /// Set a card's review date directly
    pub fn set_next_review(&self, card_id: Uuid, next_review: Option<NaiveDate>) {
        let mut state = self.state.borrow_mut();
        if let Some(card) = state.flashcards.iter_mut().find(|c| c.id == card_id) {
            card.next_review = next_review;
        }
    }
}

impl StudyApi for MemoryApi {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::SignUp)?;
        if credentials.password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Server {
                status: 422,
                message: format!(
                    "Password should be at least {} characters.",
                    MIN_PASSWORD_LEN
                ),
            });
        }
        if state
            .accounts
            .iter()
            .any(|a| a.user.email.as_deref() == Some(credentials.email.as_str()))
        {
            return Err(ApiError::Server {
                status: 422,
                message: "User already registered".to_string(),
            });
        }

        let user = UserInfo {
            id: Uuid::new_v4(),
            email: Some(credentials.email.clone()),
        };
        let confirmed = !state.require_confirmation;
        state.accounts.push(Account {
            user: user.clone(),
            password: credentials.password.clone(),
            confirmed,
        });
        Ok(confirmed.then(|| state.issue_session(user)))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::SignIn)?;
        let account = state
            .accounts
            .iter()
            .find(|a| {
                a.user.email.as_deref() == Some(credentials.email.as_str())
                    && a.password == credentials.password
            })
            .cloned()
            .ok_or_else(|| ApiError::Server {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })?;
        if !account.confirmed {
            return Err(ApiError::Server {
                status: 400,
                message: "Email not confirmed".to_string(),
            });
        }
        Ok(state.issue_session(account.user))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::Refresh)?;
        let user_id = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| ApiError::Auth("Invalid Refresh Token".to_string()))?;
        let user = state
            .accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;
        Ok(state.issue_session(user))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::SignOut)?;
        state.authorize(session)?;
        state.access_tokens.remove(&session.access_token);
        state.refresh_tokens.remove(&session.refresh_token);
        Ok(())
    }

    async fn list_subjects(&self, session: &Session) -> Result<Vec<Subject>, ApiError> {
        let state = self.state.borrow();
        state.check(MemoryOp::ListSubjects)?;
        let owner = state.authorize(session)?;

        let subjects: Vec<Subject> = state
            .subjects
            .iter()
            .filter(|s| s.user_id == owner && s.user_id == session.owner_id())
            .map(|s| {
                let topics: Vec<Topic> = state
                    .topics
                    .iter()
                    .filter(|t| t.subject_id == s.id && t.user_id == owner)
                    .map(|t| Topic {
                        attachments: state
                            .attachments
                            .iter()
                            .filter(|a| a.topic_id == t.id && a.user_id == owner)
                            .cloned()
                            .collect(),
                        ..t.clone()
                    })
                    .collect();
                Subject {
                    id: s.id,
                    user_id: s.user_id,
                    name: s.name.clone(),
                    created_at: s.created_at,
                    topics: sorted_by_created(topics, |t: &Topic| t.created_at),
                }
            })
            .collect();
        Ok(sorted_by_created(subjects, |s: &Subject| s.created_at))
    }

    async fn insert_subject(
        &self,
        session: &Session,
        subject: &NewSubject,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertSubject)?;
        let owner = state.authorize_insert(session, subject.user_id)?;
        let created_at = state.stamp();
        state.subjects.push(SubjectRow {
            id: Uuid::new_v4(),
            user_id: owner,
            name: subject.name.clone(),
            created_at,
        });
        Ok(())
    }

    async fn delete_subject(&self, session: &Session, subject_id: Uuid) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteSubject)?;
        let owner = state.authorize(session)?;
        state
            .subjects
            .retain(|s| !(s.id == subject_id && s.user_id == owner));
        Ok(())
    }

    async fn list_topic_ids(
        &self,
        session: &Session,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>, ApiError> {
        let state = self.state.borrow();
        state.check(MemoryOp::ListTopicIds)?;
        let owner = state.authorize(session)?;
        Ok(state
            .topics
            .iter()
            .filter(|t| t.subject_id == subject_id && t.user_id == owner)
            .map(|t| t.id)
            .collect())
    }

    async fn insert_topic(&self, session: &Session, topic: &NewTopic) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertTopic)?;
        let owner = state.authorize_insert(session, topic.user_id)?;
        let created_at = state.stamp();
        state.topics.push(Topic {
            id: Uuid::new_v4(),
            subject_id: topic.subject_id,
            user_id: owner,
            name: topic.name.clone(),
            status: topic.status,
            notes: None,
            created_at,
            attachments: Vec::new(),
        });
        Ok(())
    }

    async fn update_topic(
        &self,
        session: &Session,
        topic_id: Uuid,
        patch: &TopicPatch,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::UpdateTopic)?;
        let owner = state.authorize(session)?;
        // Like a filtered PATCH, matching nothing is not an error
        for topic in state
            .topics
            .iter_mut()
            .filter(|t| t.id == topic_id && t.user_id == owner)
        {
            if let Some(status) = patch.status {
                topic.status = status;
            }
            if let Some(notes) = &patch.notes {
                topic.notes = Some(notes.clone());
            }
        }
        Ok(())
    }

    async fn delete_topics(&self, session: &Session, topic_ids: &[Uuid]) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteTopics)?;
        let owner = state.authorize(session)?;
        state
            .topics
            .retain(|t| !(topic_ids.contains(&t.id) && t.user_id == owner));
        Ok(())
    }

    async fn insert_attachment(
        &self,
        session: &Session,
        attachment: &NewAttachment,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertAttachment)?;
        let owner = state.authorize_insert(session, attachment.user_id)?;
        let created_at = state.stamp();
        state.attachments.push(Attachment {
            id: Uuid::new_v4(),
            topic_id: attachment.topic_id,
            user_id: owner,
            file_name: attachment.file_name.clone(),
            url: attachment.url.clone(),
            created_at,
        });
        Ok(())
    }

    async fn delete_attachment(
        &self,
        session: &Session,
        attachment_id: Uuid,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteAttachment)?;
        let owner = state.authorize(session)?;
        state
            .attachments
            .retain(|a| !(a.id == attachment_id && a.user_id == owner));
        Ok(())
    }

    async fn delete_attachments_for_topics(
        &self,
        session: &Session,
        topic_ids: &[Uuid],
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteAttachmentsForTopics)?;
        let owner = state.authorize(session)?;
        state
            .attachments
            .retain(|a| !(topic_ids.contains(&a.topic_id) && a.user_id == owner));
        Ok(())
    }

    async fn upload_object(
        &self,
        session: &Session,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::UploadObject)?;
        let owner = state.authorize(session)?;
        // Storage policy: objects live under the uploader's own folder
        if !path.starts_with(&format!("{}/", owner)) {
            return Err(ApiError::Auth(
                "new row violates row-level security policy".to_string(),
            ));
        }
        if state.objects.contains_key(path) {
            return Err(ApiError::Server {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        state.objects.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://attachments/{}", path)
    }

    async fn list_flashcards(&self, session: &Session) -> Result<Vec<Flashcard>, ApiError> {
        let state = self.state.borrow();
        state.check(MemoryOp::ListFlashcards)?;
        let owner = state.authorize(session)?;
        Ok(state
            .flashcards
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_flashcard(
        &self,
        session: &Session,
        card: &NewFlashcard,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertFlashcard)?;
        let owner = state.authorize_insert(session, card.user_id)?;
        let created_at = state.stamp();
        state.flashcards.push(Flashcard {
            id: Uuid::new_v4(),
            user_id: owner,
            label: card.label.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            next_review: card.next_review,
            created_at,
        });
        Ok(())
    }

    async fn reschedule_flashcard(
        &self,
        session: &Session,
        card_id: Uuid,
        next_review: NaiveDate,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::RescheduleFlashcard)?;
        let owner = state.authorize(session)?;
        for card in state
            .flashcards
            .iter_mut()
            .filter(|c| c.id == card_id && c.user_id == owner)
        {
            card.next_review = Some(next_review);
        }
        Ok(())
    }

    async fn delete_flashcard(&self, session: &Session, card_id: Uuid) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteFlashcard)?;
        let owner = state.authorize(session)?;
        state
            .flashcards
            .retain(|c| !(c.id == card_id && c.user_id == owner));
        Ok(())
    }

    async fn delete_flashcards_with_label(
        &self,
        session: &Session,
        label: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteFlashcardsWithLabel)?;
        let owner = state.authorize(session)?;
        state
            .flashcards
            .retain(|c| !(c.label == label && c.user_id == owner));
        Ok(())
    }

    async fn list_study_sessions(&self, session: &Session) -> Result<Vec<StudySession>, ApiError> {
        let state = self.state.borrow();
        state.check(MemoryOp::ListStudySessions)?;
        let owner = state.authorize(session)?;
        let mut rows: Vec<StudySession> = state
            .study_sessions
            .iter()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_study_session(
        &self,
        session: &Session,
        study_session: &NewStudySession,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertStudySession)?;
        let owner = state.authorize_insert(session, study_session.user_id)?;
        let created_at = state.stamp();
        state.study_sessions.push(StudySession {
            id: Uuid::new_v4(),
            user_id: owner,
            total_seconds: study_session.total_seconds,
            created_at,
        });
        Ok(())
    }

    async fn delete_study_sessions(&self, session: &Session) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteStudySessions)?;
        let owner = state.authorize(session)?;
        state.study_sessions.retain(|s| s.user_id != owner);
        Ok(())
    }

    async fn list_schedule(&self, session: &Session) -> Result<Vec<ScheduleEntry>, ApiError> {
        let state = self.state.borrow();
        state.check(MemoryOp::ListSchedule)?;
        let owner = state.authorize(session)?;
        Ok(state
            .schedule
            .iter()
            .filter(|e| e.user_id == owner)
            .map(|e| ScheduleEntry {
                id: e.id,
                user_id: e.user_id,
                weekday: e.weekday,
                subject_id: e.subject_id,
                subject_name: state
                    .subjects
                    .iter()
                    .find(|s| s.id == e.subject_id && s.user_id == owner)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| UNNAMED_SUBJECT.to_string()),
            })
            .collect())
    }

    async fn insert_schedule_entry(
        &self,
        session: &Session,
        entry: &NewScheduleEntry,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::InsertScheduleEntry)?;
        let owner = state.authorize_insert(session, entry.user_id)?;
        state.schedule.push(ScheduleRow {
            id: Uuid::new_v4(),
            user_id: owner,
            weekday: entry.weekday,
            subject_id: entry.subject_id,
        });
        Ok(())
    }

    async fn delete_schedule_entry(
        &self,
        session: &Session,
        entry_id: Uuid,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.check(MemoryOp::DeleteScheduleEntry)?;
        let owner = state.authorize(session)?;
        state
            .schedule
            .retain(|e| !(e.id == entry_id && e.user_id == owner));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_and_weak_sign_ups_are_rejected() {
        let api = MemoryApi::new();
        assert!(api.sign_up(&creds("ada@example.com")).await.unwrap().is_some());

        let err = api.sign_up(&creds("ada@example.com")).await.unwrap_err();
        assert_eq!(err.message(), "User already registered");

        let weak = Credentials {
            email: "bob@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(matches!(
            api.sign_up(&weak).await,
            Err(ApiError::Server { status: 422, .. })
        ));
    }

    #[tokio::test]
    async fn expired_tokens_are_refused() {
        let api = MemoryApi::new();
        let session = api.sign_up(&creds("ada@example.com")).await.unwrap().unwrap();
        assert!(api.list_flashcards(&session).await.is_ok());

        api.advance(Duration::seconds(TOKEN_LIFETIME_SECS + 1));
        assert_eq!(
            api.list_flashcards(&session).await,
            Err(ApiError::Auth("JWT expired".to_string()))
        );

        let refreshed = api.refresh_session(&session.refresh_token).await.unwrap();
        assert!(api.list_flashcards(&refreshed).await.is_ok());
        // Refresh tokens are single use
        assert!(api.refresh_session(&session.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn inserts_for_another_owner_are_refused() {
        let api = MemoryApi::new();
        let session = api.sign_up(&creds("ada@example.com")).await.unwrap().unwrap();
        let err = api
            .insert_subject(
                &session,
                &NewSubject {
                    user_id: Uuid::new_v4(),
                    name: "Spoofed".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn injected_failures_persist_until_healed() {
        let api = MemoryApi::new();
        let session = api.sign_up(&creds("ada@example.com")).await.unwrap().unwrap();
        api.fail(MemoryOp::ListSchedule);
        assert!(api.list_schedule(&session).await.is_err());
        assert!(api.list_schedule(&session).await.is_err());
        api.heal(MemoryOp::ListSchedule);
        assert!(api.list_schedule(&session).await.is_ok());
    }
}
