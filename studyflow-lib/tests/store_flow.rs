//! End-to-end store behaviour against the in-memory backend

use chrono::{Days, NaiveDate, TimeZone, Utc};
use shared::protocol::{HISTORY_RESET_PHRASE, UNNAMED_SUBJECT};
use shared::report::DateRange;
use shared::{Difficulty, Session, StudyApi, TopicStatus, Weekday};
use studyflow_lib::{
    CascadeStep, ClientError, Command, MemoryApi, MemoryOp, SessionManager, SignUpOutcome, Store,
    Timer,
};

async fn signed_up(api: &MemoryApi, email: &str) -> Session {
    match SessionManager::new()
        .sign_up(api, email, "secret1")
        .await
        .unwrap()
    {
        SignUpOutcome::SignedIn(session) => session,
        SignUpOutcome::ConfirmationRequired => panic!("confirmation not expected"),
    }
}

async fn store_for(email: &str) -> (MemoryApi, Store<MemoryApi>) {
    let api = MemoryApi::new();
    let session = signed_up(&api, email).await;
    let mut store = Store::new(api.clone(), session);
    store.reload().await.unwrap();
    (api, store)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn new_subject_reloads_with_no_topics() {
    let (_api, mut store) = store_for("ada@example.com").await;

    store.create_subject("  Calculus ").await.unwrap();

    assert_eq!(store.subjects().len(), 1);
    assert_eq!(store.subjects()[0].name, "Calculus");
    assert!(store.subjects()[0].topics.is_empty());
    assert_eq!(store.progress(store.subjects()[0].id), 0);
}

#[tokio::test]
async fn blank_input_is_a_silent_validation_error() {
    let (_api, mut store) = store_for("ada@example.com").await;

    let err = store.create_subject("   ").await.unwrap_err();
    assert!(err.is_silent());

    let err = store
        .apply(Command::CreateFlashcard {
            label: "Bio".into(),
            question: "".into(),
            answer: "Mitochondria".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation("question")));

    let err = store
        .apply(Command::AddToSchedule {
            weekday: Weekday::Mon,
            subject_id: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_silent());
    assert!(store.schedule().is_empty());
}

#[tokio::test]
async fn cycling_status_three_times_returns_to_start() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Physics").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Kinematics").await.unwrap();
    let topic_id = store.subjects()[0].topics[0].id;
    assert_eq!(store.topic(topic_id).unwrap().status, TopicStatus::Critical);

    let mut seen = Vec::new();
    for _ in 0..3 {
        let current = store.topic(topic_id).map(|t| t.status);
        store
            .apply(Command::CycleTopicStatus { topic_id, current })
            .await
            .unwrap();
        seen.push(store.topic(topic_id).unwrap().status);
    }
    assert_eq!(
        seen,
        vec![
            TopicStatus::Reading,
            TopicStatus::Reviewed,
            TopicStatus::Critical
        ]
    );
}

#[tokio::test]
async fn progress_reaches_full_when_every_topic_is_reviewed() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Chemistry").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Bonds").await.unwrap();
    store.create_topic(subject_id, "Acids").await.unwrap();
    assert_eq!(store.progress(subject_id), 33);

    let topic_ids: Vec<_> = store.subjects()[0].topics.iter().map(|t| t.id).collect();
    for topic_id in topic_ids {
        store
            .cycle_topic_status(topic_id, Some(TopicStatus::Reading))
            .await
            .unwrap();
    }
    assert_eq!(store.progress(subject_id), 100);
}

#[tokio::test]
async fn notes_are_saved_and_can_be_cleared() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.create_subject("History").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Rome").await.unwrap();
    let topic_id = store.subjects()[0].topics[0].id;

    store.save_note(topic_id, "Founded 753 BC").await.unwrap();
    assert_eq!(
        store.topic(topic_id).unwrap().notes.as_deref(),
        Some("Founded 753 BC")
    );

    store.save_note(topic_id, "").await.unwrap();
    assert_eq!(store.topic(topic_id).unwrap().notes.as_deref(), Some(""));
}

#[tokio::test]
async fn deleting_a_subject_removes_topics_and_attachments() {
    let (api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Biology").await.unwrap();
    let subject_id = store.subjects()[0].id;
    for name in ["Cells", "Genes", "Evolution"] {
        store.create_topic(subject_id, name).await.unwrap();
    }
    let topic_ids: Vec<_> = store.subjects()[0].topics.iter().map(|t| t.id).collect();
    for (i, topic_id) in topic_ids.iter().enumerate() {
        for j in 0..2 {
            store
                .upload_attachment(
                    *topic_id,
                    &format!("slides {}.pdf", j),
                    "application/pdf",
                    vec![i as u8, j as u8],
                    1_700_000_000_000 + j,
                )
                .await
                .unwrap();
        }
    }
    assert_eq!(api.attachment_count(&topic_ids), 6);

    let report = store
        .apply(Command::DeleteSubject { subject_id })
        .await
        .map(|_| ());
    assert!(report.is_ok());

    assert!(store.subject(subject_id).is_none());
    assert_eq!(api.topic_count(subject_id), 0);
    assert_eq!(api.attachment_count(&topic_ids), 0);
}

#[tokio::test]
async fn interrupted_cascade_reports_its_step_and_reloads() {
    let (api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Art").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Baroque").await.unwrap();
    let topic_id = store.subjects()[0].topics[0].id;
    store
        .upload_attachment(topic_id, "vermeer.png", "image/png", vec![1], 1)
        .await
        .unwrap();

    api.fail(MemoryOp::DeleteTopics);
    let err = store.delete_subject(subject_id).await.unwrap_err();
    match err {
        ClientError::CascadeInterrupted { step, .. } => {
            assert_eq!(step, CascadeStep::DeletingTopics)
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Attachments went before the failure; the reload shows that
    let subject = store.subject(subject_id).unwrap();
    assert!(subject.topics[0].attachments.is_empty());
    assert_eq!(api.topic_count(subject_id), 1);

    api.heal(MemoryOp::DeleteTopics);
    store.delete_subject(subject_id).await.unwrap();
    assert!(store.subjects().is_empty());
}

#[tokio::test]
async fn upload_stores_sanitized_object_and_original_name() {
    let (api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Literature").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Poetry").await.unwrap();
    let topic_id = store.subjects()[0].topics[0].id;
    let owner = store.session().owner_id();

    store
        .apply(Command::UploadAttachment {
            topic_id,
            file_name: "Poèmes choisis.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF".to_vec(),
            uploaded_at_millis: 1_700_000_000_123,
        })
        .await
        .unwrap();

    let path = format!("{}/{}/1700000000123_Poemes_choisis.pdf", owner, topic_id);
    let object = api.object(&path).unwrap();
    assert_eq!(object.content_type, "application/pdf");
    assert_eq!(object.bytes, b"%PDF".to_vec());

    let attachment = &store.topic(topic_id).unwrap().attachments[0];
    assert_eq!(attachment.file_name, "Poèmes choisis.pdf");
    assert_eq!(attachment.url, format!("memory://attachments/{}", path));

    store.delete_attachment(attachment.id).await.unwrap();
    assert!(store.topic(topic_id).unwrap().attachments.is_empty());
}

#[tokio::test]
async fn failed_metadata_insert_leaves_the_object_behind() {
    let (api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Music").await.unwrap();
    let subject_id = store.subjects()[0].id;
    store.create_topic(subject_id, "Scales").await.unwrap();
    let topic_id = store.subjects()[0].topics[0].id;

    api.fail(MemoryOp::InsertAttachment);
    let err = store
        .upload_attachment(topic_id, "scales.mp3", "audio/mpeg", vec![0; 4], 42)
        .await
        .unwrap_err();
    assert!(!err.is_silent());
    assert_eq!(api.object_paths().len(), 1);
    assert!(store.topic(topic_id).unwrap().attachments.is_empty());
}

#[tokio::test]
async fn review_sets_next_date_by_difficulty() {
    let (_api, mut store) = store_for("ada@example.com").await;
    let today = date(2026, 6, 29);
    for q in ["hard", "medium", "easy"] {
        store.create_flashcard("Spanish", q, "answer").await.unwrap();
    }
    let ids: Vec<_> = store.flashcards().iter().map(|c| c.id).collect();

    for (card_id, difficulty) in ids
        .iter()
        .zip([Difficulty::Hard, Difficulty::Medium, Difficulty::Easy])
    {
        store
            .apply(Command::ReviewFlashcard {
                card_id: *card_id,
                difficulty,
                today,
            })
            .await
            .unwrap();
    }

    let dates: Vec<_> = store.flashcards().iter().map(|c| c.next_review).collect();
    assert_eq!(
        dates,
        vec![
            Some(today),
            Some(date(2026, 7, 1)),
            Some(date(2026, 7, 3))
        ]
    );
    assert_eq!(store.due_count(today), 1);
}

#[tokio::test]
async fn overdue_card_keeps_its_folder_pending() {
    let (api, mut store) = store_for("ada@example.com").await;
    let today = date(2026, 6, 10);
    store.create_flashcard("Anatomy", "Femur?", "Thigh bone").await.unwrap();
    store.create_flashcard("Anatomy", "Ulna?", "Forearm bone").await.unwrap();
    let overdue = store.flashcards()[0].id;
    let later = store.flashcards()[1].id;
    api.set_next_review(overdue, today.checked_sub_days(Days::new(1)));
    api.set_next_review(later, today.checked_add_days(Days::new(3)));
    store.reload().await.unwrap();

    let folders = store.folders(today);
    assert_eq!(folders.len(), 1);
    assert!(folders[0].pending);
    assert_eq!(folders[0].cards[0].id, overdue);

    store
        .review_flashcard(overdue, Difficulty::Easy, today)
        .await
        .unwrap();
    assert!(!store.folders(today)[0].pending);

    api.set_next_review(overdue, today.checked_sub_days(Days::new(1)));
    store.reload().await.unwrap();
    assert!(store.folders(today)[0].pending);
    store.delete_flashcard(overdue).await.unwrap();
    assert!(!store.folders(today)[0].pending);
}

#[tokio::test]
async fn deleting_a_folder_removes_only_that_label() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.create_flashcard("French", "chat", "cat").await.unwrap();
    store.create_flashcard("French", "chien", "dog").await.unwrap();
    store.create_flashcard("German", "Hund", "dog").await.unwrap();

    store
        .apply(Command::DeleteFlashcardFolder {
            label: "French".into(),
        })
        .await
        .unwrap();

    let labels: Vec<_> = store.flashcards().iter().map(|c| c.label.clone()).collect();
    assert_eq!(labels, vec!["German".to_string()]);
}

#[tokio::test]
async fn saving_the_timer_persists_and_resets() {
    let (_api, mut store) = store_for("ada@example.com").await;
    let mut timer = Timer::new();
    timer.start();
    for _ in 0..5 {
        timer.tick();
    }

    store.save_timer(&mut timer).await.unwrap();

    assert_eq!(store.study_sessions().len(), 1);
    assert_eq!(store.study_sessions()[0].total_seconds, 5);
    assert_eq!(timer.display(), "00:00:00");
    assert!(!timer.is_running());
}

#[tokio::test]
async fn one_stretch_is_stored_once_when_saved_twice() {
    let (_api, mut store) = store_for("ada@example.com").await;
    let mut timer = Timer::new();
    timer.start();
    for _ in 0..5 {
        timer.tick();
    }

    store.save_timer(&mut timer).await.unwrap();
    let err = store.save_timer(&mut timer).await.unwrap_err();

    assert!(matches!(err, ClientError::NothingToSave));
    assert_eq!(store.study_sessions().len(), 1);
    assert_eq!(store.report(DateRange::default(), &Utc).total_seconds, 5);
}

#[tokio::test]
async fn empty_timer_is_not_saved() {
    let (_api, mut store) = store_for("ada@example.com").await;
    let mut timer = Timer::new();
    let err = store.save_timer(&mut timer).await.unwrap_err();
    assert!(matches!(err, ClientError::NothingToSave));
    assert!(store.study_sessions().is_empty());
}

#[tokio::test]
async fn failed_timer_save_keeps_the_count() {
    let (api, mut store) = store_for("ada@example.com").await;
    let mut timer = Timer::new();
    timer.start();
    timer.tick();
    timer.tick();

    api.fail(MemoryOp::InsertStudySession);
    assert!(store.save_timer(&mut timer).await.is_err());
    assert_eq!(timer.elapsed(), 2);
    assert!(!timer.is_running());

    api.heal(MemoryOp::InsertStudySession);
    store.save_timer(&mut timer).await.unwrap();
    assert_eq!(store.study_sessions()[0].total_seconds, 2);
    assert_eq!(timer.elapsed(), 0);
}

#[tokio::test]
async fn report_filters_by_range() {
    let (api, mut store) = store_for("ada@example.com").await;
    let owner = store.session().owner_id();
    api.seed_study_session(owner, 1800, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    api.seed_study_session(owner, 600, Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    api.seed_study_session(owner, 25, Utc.with_ymd_and_hms(2026, 3, 2, 20, 0, 0).unwrap());
    store.reload().await.unwrap();

    let all = store.report(DateRange::all(), &Utc);
    assert_eq!(all.total_display(), "00:40:25");
    assert_eq!(all.session_count, 3);

    let march_2 = store.report(
        DateRange::between(Some(date(2026, 3, 2)), Some(date(2026, 3, 2))),
        &Utc,
    );
    assert_eq!(march_2.total_seconds, 625);
    assert_eq!(march_2.days.len(), 1);
}

#[tokio::test]
async fn history_reset_needs_the_exact_phrase() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.log_study_session(120).await.unwrap();

    let err = store
        .apply(Command::ResetStudyHistory {
            typed_phrase: "delete history".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ConfirmationMismatch));
    assert_eq!(store.study_sessions().len(), 1);

    store
        .apply(Command::ResetStudyHistory {
            typed_phrase: format!("  {} ", HISTORY_RESET_PHRASE),
        })
        .await
        .unwrap();
    assert!(store.study_sessions().is_empty());
}

#[tokio::test]
async fn schedule_joins_subject_names() {
    let (_api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Geometry").await.unwrap();
    let subject_id = store.subjects()[0].id;

    store
        .apply(Command::AddToSchedule {
            weekday: Weekday::Tue,
            subject_id: Some(subject_id),
        })
        .await
        .unwrap();
    store
        .add_to_schedule(Weekday::Sat, Some(subject_id))
        .await
        .unwrap();

    let tuesday = store.schedule_for(Weekday::Tue);
    assert_eq!(tuesday.len(), 1);
    assert_eq!(tuesday[0].subject_name, "Geometry");
    assert!(store.schedule_for(Weekday::Mon).is_empty());

    let entry_id = tuesday[0].id;
    store.remove_from_schedule(entry_id).await.unwrap();
    assert!(store.schedule_for(Weekday::Tue).is_empty());

    // The saturday row outlives its subject and falls back to a placeholder
    store.delete_subject(subject_id).await.unwrap();
    assert_eq!(store.schedule_for(Weekday::Sat)[0].subject_name, UNNAMED_SUBJECT);
}

#[tokio::test]
async fn failed_reload_keeps_previous_snapshot() {
    let (api, mut store) = store_for("ada@example.com").await;
    store.create_subject("Economics").await.unwrap();
    let before = store.snapshot().clone();

    api.fail(MemoryOp::ListFlashcards);
    store.create_flashcard("Econ", "GDP?", "Output").await.unwrap();
    assert_eq!(store.snapshot(), &before);
    assert!(store.reload().await.is_err());

    api.heal(MemoryOp::ListFlashcards);
    store.reload().await.unwrap();
    assert_eq!(store.flashcards().len(), 1);
}

#[tokio::test]
async fn users_only_see_their_own_rows() {
    let api = MemoryApi::new();
    let ada = signed_up(&api, "ada@example.com").await;
    let bob = signed_up(&api, "bob@example.com").await;

    let mut ada_store = Store::new(api.clone(), ada);
    let mut bob_store = Store::new(api.clone(), bob.clone());
    ada_store.create_subject("Ada's subject").await.unwrap();
    ada_store.create_flashcard("Ada", "q", "a").await.unwrap();
    ada_store.log_study_session(60).await.unwrap();
    bob_store.reload().await.unwrap();

    assert!(bob_store.subjects().is_empty());
    assert!(bob_store.flashcards().is_empty());
    assert!(bob_store.study_sessions().is_empty());

    // Bob cannot delete Ada's rows even with their ids
    let ada_subject = ada_store.subjects()[0].id;
    bob_store.delete_subject(ada_subject).await.unwrap();
    ada_store.reload().await.unwrap();
    assert_eq!(ada_store.subjects().len(), 1);

    // Nor write rows on Ada's behalf
    let spoofed = shared::api::NewSubject {
        user_id: ada_store.session().owner_id(),
        name: "spoof".into(),
    };
    assert!(api.insert_subject(&bob, &spoofed).await.is_err());
}

#[tokio::test]
async fn expired_session_is_refreshed_on_restore() {
    let api = MemoryApi::new();
    let session = signed_up(&api, "ada@example.com").await;
    api.advance(chrono::Duration::hours(2));
    let now = api.now().timestamp();

    let manager = SessionManager::new();
    let restored = manager.restore(&api, Some(session.clone()), now).await.unwrap();
    assert_ne!(restored.access_token, session.access_token);
    assert_eq!(restored.owner_id(), session.owner_id());
    assert!(manager.is_signed_in());

    // The old refresh token has been used up
    let other = SessionManager::new();
    assert!(other.restore(&api, Some(session), now).await.is_none());
    assert!(!other.is_signed_in());
}

#[tokio::test]
async fn sign_up_may_need_confirmation() {
    let api = MemoryApi::new();
    api.require_confirmation(true);
    let manager = SessionManager::new();

    let outcome = manager
        .sign_up(&api, "ada@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
    assert!(!manager.is_signed_in());

    assert!(manager.sign_in(&api, "ada@example.com", "secret1").await.is_err());
    api.confirm("ada@example.com");
    manager
        .sign_in(&api, "ada@example.com", "secret1")
        .await
        .unwrap();
    assert!(manager.is_signed_in());
}

#[tokio::test]
async fn empty_credentials_never_reach_the_backend() {
    let api = MemoryApi::new();
    api.fail(MemoryOp::SignIn);
    let manager = SessionManager::new();
    let err = manager.sign_in(&api, "", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingCredentials));
    assert!(!err.is_silent());
}

#[tokio::test]
async fn sign_out_clears_session_even_when_remote_fails() {
    let api = MemoryApi::new();
    let manager = SessionManager::new();
    manager
        .sign_up(&api, "ada@example.com", "secret1")
        .await
        .unwrap();

    let changes = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let log = changes.clone();
    let _subscription = manager.subscribe(move |session| log.borrow_mut().push(session.is_some()));

    api.fail(MemoryOp::SignOut);
    manager.sign_out(&api).await;
    assert!(!manager.is_signed_in());
    assert_eq!(*changes.borrow(), vec![false]);
}
