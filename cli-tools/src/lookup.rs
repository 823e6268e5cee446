//! Resolve what the user typed (a full id, an id prefix or a name) to a record

use anyhow::{bail, Result};
use shared::{Flashcard, ScheduleEntry, Subject, Topic};
use uuid::Uuid;

/// First eight characters of an id, as shown in listings
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn resolve<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    reference: &str,
    kind: &str,
    id: impl Fn(&T) -> Uuid,
    name: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    let reference = reference.trim();
    let items: Vec<&T> = items.into_iter().collect();

    if let Ok(exact) = Uuid::parse_str(reference) {
        if let Some(item) = items.iter().find(|item| id(**item) == exact) {
            return Ok(*item);
        }
    }

    let lowered = reference.to_ascii_lowercase();
    let mut matches: Vec<&T> = items
        .iter()
        .copied()
        .filter(|item| !lowered.is_empty() && id(*item).to_string().starts_with(&lowered))
        .collect();
    if matches.is_empty() {
        matches = items
            .iter()
            .copied()
            .filter(|item| name(*item).eq_ignore_ascii_case(reference))
            .collect();
    }

    match matches.as_slice() {
        [item] => Ok(*item),
        [] => bail!("No {} matches '{}'", kind, reference),
        many => bail!(
            "'{}' matches {} {}s; use a longer id",
            reference,
            many.len(),
            kind
        ),
    }
}

pub fn find_subject<'a>(subjects: &'a [Subject], reference: &str) -> Result<&'a Subject> {
    resolve(subjects, reference, "subject", |s| s.id, |s| &s.name)
}

/// Topics are searched across every subject
pub fn find_topic<'a>(subjects: &'a [Subject], reference: &str) -> Result<&'a Topic> {
    let topics = subjects.iter().flat_map(|subject| subject.topics.iter());
    resolve(topics, reference, "topic", |t| t.id, |t| &t.name)
}

pub fn find_card<'a>(cards: &'a [Flashcard], reference: &str) -> Result<&'a Flashcard> {
    resolve(cards, reference, "flashcard", |c| c.id, |c| &c.question)
}

pub fn find_schedule_entry<'a>(
    entries: &'a [ScheduleEntry],
    reference: &str,
) -> Result<&'a ScheduleEntry> {
    resolve(entries, reference, "schedule entry", |e| e.id, |e| &e.subject_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::TopicStatus;

    fn subject(id: &str, name: &str, topics: Vec<Topic>) -> Subject {
        Subject {
            id: Uuid::parse_str(id).unwrap(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            created_at: Utc::now(),
            topics,
        }
    }

    fn topic(id: &str, name: &str) -> Topic {
        Topic {
            id: Uuid::parse_str(id).unwrap(),
            user_id: Uuid::nil(),
            subject_id: Uuid::nil(),
            name: name.to_string(),
            status: TopicStatus::Critical,
            notes: None,
            created_at: Utc::now(),
            attachments: Vec::new(),
        }
    }

    fn subjects() -> Vec<Subject> {
        vec![
            subject(
                "aaaaaaaa-0000-0000-0000-000000000001",
                "Biology",
                vec![topic("cccccccc-0000-0000-0000-000000000001", "Cells")],
            ),
            subject(
                "aaaaaaab-0000-0000-0000-000000000002",
                "History",
                vec![topic("dddddddd-0000-0000-0000-000000000002", "Rome")],
            ),
        ]
    }

    #[test]
    fn test_full_id() {
        let subjects = subjects();
        let found = find_subject(&subjects, "aaaaaaab-0000-0000-0000-000000000002").unwrap();
        assert_eq!(found.name, "History");
    }

    #[test]
    fn test_unique_prefix() {
        let subjects = subjects();
        assert_eq!(find_subject(&subjects, "aaaaaaaa").unwrap().name, "Biology");
        assert_eq!(find_subject(&subjects, "AAAAAAAB").unwrap().name, "History");
    }

    #[test]
    fn test_ambiguous_prefix() {
        let subjects = subjects();
        let err = find_subject(&subjects, "aaaaaa").unwrap_err();
        assert!(err.to_string().contains("matches 2 subjects"));
    }

    #[test]
    fn test_name_ignores_case() {
        let subjects = subjects();
        assert_eq!(find_subject(&subjects, " biology ").unwrap().name, "Biology");
    }

    #[test]
    fn test_topic_across_subjects() {
        let subjects = subjects();
        assert_eq!(find_topic(&subjects, "rome").unwrap().name, "Rome");
        assert_eq!(find_topic(&subjects, "cccc").unwrap().name, "Cells");
        assert!(find_topic(&subjects, "Greece").is_err());
    }

    #[test]
    fn test_empty_reference_matches_nothing() {
        let subjects = subjects();
        assert!(find_subject(&subjects, "").is_err());
    }

    #[test]
    fn test_short_id() {
        let id = Uuid::parse_str("12345678-9abc-def0-1234-56789abcdef0").unwrap();
        assert_eq!(short_id(id), "12345678");
    }
}
