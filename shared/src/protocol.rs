/// Storage bucket holding topic attachments. Objects are publicly readable.
pub const ATTACHMENTS_BUCKET: &str = "attachments";

/// Phrase the user must type before the study history is wiped.
pub const HISTORY_RESET_PHRASE: &str = "DELETE HISTORY";

/// Browser localStorage key holding the persisted session.
pub const SESSION_STORAGE_KEY: &str = "studyflow.session";

/// Browser localStorage key holding the ids of expanded subjects.
pub const EXPANDED_SUBJECTS_KEY: &str = "studyflow.expanded_subjects";

/// Seconds before the reported expiry at which a session is treated as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Largest attachment accepted for upload (50 MiB, the storage default).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Display name for schedule rows whose subject could not be joined.
pub const UNNAMED_SUBJECT: &str = "Unnamed subject";
