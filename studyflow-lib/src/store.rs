//! The client-side state store
//!
//! [`Store`] holds the last successfully loaded [`Snapshot`] for one signed-in
//! user. Reads are plain selectors over the snapshot. Every action performs
//! its remote writes and then refetches everything; nothing is patched in
//! place. A failed reload leaves the previous snapshot untouched.

use chrono::{NaiveDate, TimeZone};
use futures_util::future::try_join4;
use uuid::Uuid;

use shared::api::{
    NewAttachment, NewFlashcard, NewScheduleEntry, NewStudySession, NewSubject, NewTopic,
    TopicPatch,
};
use shared::progress::subject_progress;
use shared::protocol::{HISTORY_RESET_PHRASE, MAX_UPLOAD_BYTES};
use shared::report::{summarize, DateRange, ReportSummary};
use shared::review::{self, FlashcardFolder};
use shared::storage::object_path;
use shared::{
    cycle_status, Difficulty, Flashcard, ScheduleEntry, Session, StudyApi, StudySession, Subject,
    Topic, TopicStatus, Weekday,
};

use crate::cascade::{self, CascadeReport};
use crate::error::{ClientError, Result};
use crate::timer::Timer;

/// Everything fetched for the signed-in user in one reload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub subjects: Vec<Subject>,
    pub flashcards: Vec<Flashcard>,
    pub study_sessions: Vec<StudySession>,
    pub schedule: Vec<ScheduleEntry>,
}

/// A user action, as dispatched by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateSubject {
        name: String,
    },
    DeleteSubject {
        subject_id: Uuid,
    },
    CreateTopic {
        subject_id: Uuid,
        name: String,
    },
    CycleTopicStatus {
        topic_id: Uuid,
        current: Option<TopicStatus>,
    },
    SaveNote {
        topic_id: Uuid,
        notes: String,
    },
    UploadAttachment {
        topic_id: Uuid,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
        uploaded_at_millis: i64,
    },
    DeleteAttachment {
        attachment_id: Uuid,
    },
    CreateFlashcard {
        label: String,
        question: String,
        answer: String,
    },
    DeleteFlashcard {
        card_id: Uuid,
    },
    DeleteFlashcardFolder {
        label: String,
    },
    ReviewFlashcard {
        card_id: Uuid,
        difficulty: Difficulty,
        today: NaiveDate,
    },
    LogStudySession {
        seconds: i64,
    },
    ResetStudyHistory {
        typed_phrase: String,
    },
    AddToSchedule {
        weekday: Weekday,
        subject_id: Option<Uuid>,
    },
    RemoveFromSchedule {
        entry_id: Uuid,
    },
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct Store<A> {
    api: A,
    session: Session,
    snapshot: Snapshot,
}

impl<A: StudyApi> Store<A> {
    /// An empty store for `session`; call [`Store::reload`] to populate it
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            snapshot: Snapshot::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Swap in a refreshed session for the same user
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch all four collections concurrently. The snapshot is replaced
    /// only if every fetch succeeds.
    pub async fn reload(&mut self) -> Result<()> {
        let session = &self.session;
        let (subjects, flashcards, study_sessions, schedule) = try_join4(
            self.api.list_subjects(session),
            self.api.list_flashcards(session),
            self.api.list_study_sessions(session),
            self.api.list_schedule(session),
        )
        .await?;

        log::debug!(
            "Loaded {} subjects, {} flashcards, {} sessions, {} schedule entries",
            subjects.len(),
            flashcards.len(),
            study_sessions.len(),
            schedule.len()
        );
        self.snapshot = Snapshot {
            subjects,
            flashcards,
            study_sessions,
            schedule,
        };
        Ok(())
    }

    /// Reload, logging instead of returning a failure
    pub async fn refresh(&mut self) {
        if let Err(e) = self.reload().await {
            log::error!("Failed to load data: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    pub fn subjects(&self) -> &[Subject] {
        &self.snapshot.subjects
    }

    pub fn subject(&self, subject_id: Uuid) -> Option<&Subject> {
        self.snapshot.subjects.iter().find(|s| s.id == subject_id)
    }

    pub fn topic(&self, topic_id: Uuid) -> Option<&Topic> {
        self.snapshot
            .subjects
            .iter()
            .flat_map(|s| s.topics.iter())
            .find(|t| t.id == topic_id)
    }

    pub fn progress(&self, subject_id: Uuid) -> u32 {
        self.subject(subject_id).map(subject_progress).unwrap_or(0)
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.snapshot.flashcards
    }

    pub fn folders(&self, today: NaiveDate) -> Vec<FlashcardFolder> {
        review::group_into_folders(&self.snapshot.flashcards, today)
    }

    pub fn due_count(&self, today: NaiveDate) -> usize {
        review::due_count(&self.snapshot.flashcards, today)
    }

    pub fn study_sessions(&self) -> &[StudySession] {
        &self.snapshot.study_sessions
    }

    pub fn report<Tz: TimeZone>(&self, range: DateRange, tz: &Tz) -> ReportSummary {
        summarize(&self.snapshot.study_sessions, range, tz)
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.snapshot.schedule
    }

    pub fn schedule_for(&self, weekday: Weekday) -> Vec<&ScheduleEntry> {
        self.snapshot
            .schedule
            .iter()
            .filter(|entry| entry.weekday == weekday)
            .collect()
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::CreateSubject { name } => self.create_subject(&name).await,
            Command::DeleteSubject { subject_id } => {
                self.delete_subject(subject_id).await.map(|_| ())
            }
            Command::CreateTopic { subject_id, name } => self.create_topic(subject_id, &name).await,
            Command::CycleTopicStatus { topic_id, current } => {
                self.cycle_topic_status(topic_id, current).await.map(|_| ())
            }
            Command::SaveNote { topic_id, notes } => self.save_note(topic_id, &notes).await,
            Command::UploadAttachment {
                topic_id,
                file_name,
                content_type,
                bytes,
                uploaded_at_millis,
            } => {
                self.upload_attachment(
                    topic_id,
                    &file_name,
                    &content_type,
                    bytes,
                    uploaded_at_millis,
                )
                .await
            }
            Command::DeleteAttachment { attachment_id } => {
                self.delete_attachment(attachment_id).await
            }
            Command::CreateFlashcard {
                label,
                question,
                answer,
            } => self.create_flashcard(&label, &question, &answer).await,
            Command::DeleteFlashcard { card_id } => self.delete_flashcard(card_id).await,
            Command::DeleteFlashcardFolder { label } => self.delete_flashcard_folder(&label).await,
            Command::ReviewFlashcard {
                card_id,
                difficulty,
                today,
            } => self
                .review_flashcard(card_id, difficulty, today)
                .await
                .map(|_| ()),
            Command::LogStudySession { seconds } => self.log_study_session(seconds).await,
            Command::ResetStudyHistory { typed_phrase } => {
                self.reset_study_history(&typed_phrase).await
            }
            Command::AddToSchedule {
                weekday,
                subject_id,
            } => self.add_to_schedule(weekday, subject_id).await,
            Command::RemoveFromSchedule { entry_id } => self.remove_from_schedule(entry_id).await,
        }
    }

    pub async fn create_subject(&mut self, name: &str) -> Result<()> {
        let name = required(name, "subject name")?;
        log::debug!("Creating subject {:?}", name);
        let subject = NewSubject {
            user_id: self.session.owner_id(),
            name,
        };
        self.api.insert_subject(&self.session, &subject).await?;
        self.refresh().await;
        Ok(())
    }

    /// Delete a subject with its topics and attachments. The store is
    /// reloaded even when the sequence stops partway, so rows that were
    /// already removed disappear from view.
    pub async fn delete_subject(&mut self, subject_id: Uuid) -> Result<CascadeReport> {
        let outcome = cascade::delete_subject(&self.api, &self.session, subject_id).await;
        self.refresh().await;
        outcome
    }

    pub async fn create_topic(&mut self, subject_id: Uuid, name: &str) -> Result<()> {
        let name = required(name, "topic name")?;
        let topic = NewTopic {
            user_id: self.session.owner_id(),
            subject_id,
            name,
            status: TopicStatus::default(),
        };
        self.api.insert_topic(&self.session, &topic).await?;
        self.refresh().await;
        Ok(())
    }

    /// Advance a topic one step through the status cycle
    pub async fn cycle_topic_status(
        &mut self,
        topic_id: Uuid,
        current: Option<TopicStatus>,
    ) -> Result<TopicStatus> {
        let next = cycle_status(current);
        log::debug!("Topic {} -> {}", topic_id, next.as_str());
        let patch = TopicPatch {
            status: Some(next),
            notes: None,
        };
        self.api.update_topic(&self.session, topic_id, &patch).await?;
        self.refresh().await;
        Ok(next)
    }

    /// Store a topic's notes; an empty note clears them
    pub async fn save_note(&mut self, topic_id: Uuid, notes: &str) -> Result<()> {
        let patch = TopicPatch {
            status: None,
            notes: Some(notes.to_string()),
        };
        self.api.update_topic(&self.session, topic_id, &patch).await?;
        self.refresh().await;
        Ok(())
    }

    /// Upload a file and link it to a topic. A failed metadata insert leaves
    /// the uploaded object in place.
    pub async fn upload_attachment(
        &mut self,
        topic_id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        uploaded_at_millis: i64,
    ) -> Result<()> {
        let file_name = required(file_name, "file")?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ClientError::FileTooLarge {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }
        let content_type = if content_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };

        let owner = self.session.owner_id();
        let path = object_path(owner, topic_id, uploaded_at_millis, &file_name);
        log::debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), path);
        self.api
            .upload_object(&self.session, &path, content_type, bytes)
            .await?;

        let attachment = NewAttachment {
            user_id: owner,
            topic_id,
            url: self.api.public_url(&path),
            file_name,
        };
        self.api.insert_attachment(&self.session, &attachment).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn delete_attachment(&mut self, attachment_id: Uuid) -> Result<()> {
        self.api
            .delete_attachment(&self.session, attachment_id)
            .await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn create_flashcard(
        &mut self,
        label: &str,
        question: &str,
        answer: &str,
    ) -> Result<()> {
        let card = NewFlashcard {
            user_id: self.session.owner_id(),
            label: required(label, "label")?,
            question: required(question, "question")?,
            answer: required(answer, "answer")?,
            next_review: None,
        };
        self.api.insert_flashcard(&self.session, &card).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn delete_flashcard(&mut self, card_id: Uuid) -> Result<()> {
        self.api.delete_flashcard(&self.session, card_id).await?;
        self.refresh().await;
        Ok(())
    }

    /// Delete every card filed under `label`
    pub async fn delete_flashcard_folder(&mut self, label: &str) -> Result<()> {
        if label.is_empty() {
            return Err(ClientError::Validation("label"));
        }
        self.api
            .delete_flashcards_with_label(&self.session, label)
            .await?;
        self.refresh().await;
        Ok(())
    }

    /// Reschedule a card: today + 0 (hard), 2 (medium) or 4 (easy) days
    pub async fn review_flashcard(
        &mut self,
        card_id: Uuid,
        difficulty: Difficulty,
        today: NaiveDate,
    ) -> Result<NaiveDate> {
        let next = review::next_review_date(today, difficulty);
        log::debug!("Card {} reviewed {}; next {}", card_id, difficulty.as_str(), next);
        self.api
            .reschedule_flashcard(&self.session, card_id, next)
            .await?;
        self.refresh().await;
        Ok(next)
    }

    pub async fn log_study_session(&mut self, seconds: i64) -> Result<()> {
        if seconds < 1 {
            return Err(ClientError::NothingToSave);
        }
        let record = NewStudySession {
            user_id: self.session.owner_id(),
            total_seconds: seconds,
        };
        self.api.insert_study_session(&self.session, &record).await?;
        self.refresh().await;
        Ok(())
    }

    /// Stop the timer and persist its count. The count is taken before the
    /// write, so a second save finds nothing; a failed save puts it back.
    pub async fn save_timer(&mut self, timer: &mut Timer) -> Result<()> {
        let seconds = timer.take_for_save().ok_or(ClientError::NothingToSave)?;
        if let Err(e) = self.log_study_session(seconds).await {
            timer.restore_unsaved(seconds);
            return Err(e);
        }
        Ok(())
    }

    /// Wipe the user's whole study history. `typed_phrase` must match the
    /// reset phrase exactly, ignoring surrounding whitespace.
    pub async fn reset_study_history(&mut self, typed_phrase: &str) -> Result<()> {
        if typed_phrase.trim() != HISTORY_RESET_PHRASE {
            return Err(ClientError::ConfirmationMismatch);
        }
        log::info!("Deleting study history for {}", self.session.owner_id());
        self.api.delete_study_sessions(&self.session).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn add_to_schedule(
        &mut self,
        weekday: Weekday,
        subject_id: Option<Uuid>,
    ) -> Result<()> {
        let subject_id = subject_id.ok_or(ClientError::Validation("subject"))?;
        let entry = NewScheduleEntry {
            user_id: self.session.owner_id(),
            weekday,
            subject_id,
        };
        self.api.insert_schedule_entry(&self.session, &entry).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn remove_from_schedule(&mut self, entry_id: Uuid) -> Result<()> {
        self.api
            .delete_schedule_entry(&self.session, entry_id)
            .await?;
        self.refresh().await;
        Ok(())
    }
}
