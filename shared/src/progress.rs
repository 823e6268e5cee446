//! Subject progress bars

use crate::Subject;

/// Colour band of a progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTone {
    Green,
    Yellow,
    Red,
}

impl ProgressTone {
    pub fn for_percent(percent: u32) -> Self {
        if percent > 70 {
            ProgressTone::Green
        } else if percent > 35 {
            ProgressTone::Yellow
        } else {
            ProgressTone::Red
        }
    }

    /// CSS class suffix used by the progress bar
    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressTone::Green => "green",
            ProgressTone::Yellow => "yellow",
            ProgressTone::Red => "red",
        }
    }
}

/// round(100 * points / (3 * topics)), or 0 for a subject without topics.
/// Halves round up.
pub fn subject_progress(subject: &Subject) -> u32 {
    let count = subject.topics.len() as u32;
    if count == 0 {
        return 0;
    }
    let points: u32 = subject.topics.iter().map(|t| t.status.points()).sum();
    (200 * points + 3 * count) / (6 * count)
}
