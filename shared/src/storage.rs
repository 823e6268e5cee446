//! Object-storage naming for attachments

use deunicode::deunicode;
use uuid::Uuid;

/// Fold accents to ASCII, then replace anything other than letters, digits
/// and dots with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let folded = deunicode(name.trim());
    let sanitized: String = folded
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Storage path `{owner}/{topic}/{millis}_{sanitized name}`
pub fn object_path(owner: Uuid, topic: Uuid, uploaded_at_millis: i64, file_name: &str) -> String {
    format!(
        "{}/{}/{}_{}",
        owner,
        topic,
        uploaded_at_millis,
        sanitize_file_name(file_name)
    )
}
