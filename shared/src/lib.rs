use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// Protocol constants shared between the UI and the CLI
pub mod protocol;

// API contract and request bodies
pub mod api;
pub use api::{ApiClientConfig, ApiError, StudyApi};

// Supabase REST implementation of the API contract
pub mod supabase;

// Derived presentation rules
pub mod progress;
pub mod report;
pub mod review;
pub mod storage;

// ============================================================================
// Auth
// ============================================================================

/// The signed-in user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Every data-access call takes the session explicitly: the access token
/// authorizes the request and `user.id` scopes every row it reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: UserInfo,
}

impl Session {
    /// Owner id applied to every row this session touches
    pub fn owner_id(&self) -> Uuid {
        self.user.id
    }

    /// Whether the access token should be refreshed before use at `now`
    /// (unix seconds). Sessions without a known expiry never expire locally.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - protocol::EXPIRY_MARGIN_SECS <= now,
            None => false,
        }
    }
}

// ============================================================================
// Subjects and topics
// ============================================================================

/// Study progress of a topic. Cycles critical -> reading -> reviewed -> critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    #[default]
    Critical,
    Reading,
    Reviewed,
}

impl TopicStatus {
    /// Cycle order used by [`TopicStatus::next`]
    pub const CYCLE: [TopicStatus; 3] = [
        TopicStatus::Critical,
        TopicStatus::Reading,
        TopicStatus::Reviewed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Critical => "critical",
            TopicStatus::Reading => "reading",
            TopicStatus::Reviewed => "reviewed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "critical" => Some(TopicStatus::Critical),
            "reading" => Some(TopicStatus::Reading),
            "reviewed" => Some(TopicStatus::Reviewed),
            _ => None,
        }
    }

    /// The status after this one in the cycle
    pub fn next(self) -> Self {
        let index = Self::CYCLE.iter().position(|s| *s == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    /// Weight of this status in subject progress
    pub fn points(self) -> u32 {
        match self {
            TopicStatus::Critical => 1,
            TopicStatus::Reading => 2,
            TopicStatus::Reviewed => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TopicStatus::Critical => "Critical",
            TopicStatus::Reading => "Reading",
            TopicStatus::Reviewed => "Reviewed",
        }
    }
}

/// Next status for a topic whose stored status may be missing
pub fn cycle_status(current: Option<TopicStatus>) -> TopicStatus {
    current.unwrap_or_default().next()
}

/// Missing, null, or unrecognised statuses read as critical
fn status_or_default<'de, D>(deserializer: D) -> Result<TopicStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(TopicStatus::parse)
        .unwrap_or_default())
}

/// A file linked to a topic, stored in object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_id: Uuid,
    /// File name as picked by the user (not the sanitized storage name)
    pub file_name: String,
    /// Public URL of the stored object
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A learning objective within a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: TopicStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Top-level study category, loaded with its topics and their attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

// ============================================================================
// Flashcards
// ============================================================================

/// How hard a flashcard felt when reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A question/answer pair filed under a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Folder the card is grouped under
    pub label: String,
    pub question: String,
    pub answer: String,
    /// Calendar date the card is due again; unset means due now
    #[serde(default)]
    pub next_review: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Study sessions
// ============================================================================

/// A recorded stretch of focused study time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_seconds: i64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Weekly schedule
// ============================================================================

/// Day code stored on schedule rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "MON")]
    Mon,
    #[serde(rename = "TUE")]
    Tue,
    #[serde(rename = "WED")]
    Wed,
    #[serde(rename = "THU")]
    Thu,
    #[serde(rename = "FRI")]
    Fri,
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "SUN")]
    Sun,
}

impl Weekday {
    /// Monday-first display order
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
            Weekday::Sun => "SUN",
        }
    }

    /// Accepts the stored code in any case ("mon", "MON", "Mon")
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|day| day.code() == upper)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

/// A subject assigned to a weekday, with the subject name joined at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weekday: Weekday,
    pub subject_id: Uuid,
    /// Name of the assigned subject, or a placeholder when the join is empty
    pub subject_name: String,
}
