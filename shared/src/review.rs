//! Spaced-repetition scheduling and flashcard folders

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::{Difficulty, Flashcard};

impl Difficulty {
    /// Days until the card is shown again
    pub fn delay_days(self) -> u64 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 2,
            Difficulty::Hard => 0,
        }
    }
}

/// Review date for a card answered with `difficulty` on `today`
pub fn next_review_date(today: NaiveDate, difficulty: Difficulty) -> NaiveDate {
    today
        .checked_add_days(Days::new(difficulty.delay_days()))
        .unwrap_or(NaiveDate::MAX)
}

/// A card is due when it has no review date or the date is not after today
pub fn is_due(card: &Flashcard, today: NaiveDate) -> bool {
    card.next_review.map_or(true, |date| date <= today)
}

pub fn due_count(cards: &[Flashcard], today: NaiveDate) -> usize {
    cards.iter().filter(|card| is_due(card, today)).count()
}

/// Cards sharing a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardFolder {
    pub label: String,
    /// Due cards first, then by review date
    pub cards: Vec<Flashcard>,
    /// Whether any card in the folder is due
    pub pending: bool,
}

impl FlashcardFolder {
    pub fn due_count(&self, today: NaiveDate) -> usize {
        due_count(&self.cards, today)
    }
}

/// Group cards by label, folders sorted by label
pub fn group_into_folders(cards: &[Flashcard], today: NaiveDate) -> Vec<FlashcardFolder> {
    let mut by_label: BTreeMap<&str, Vec<Flashcard>> = BTreeMap::new();
    for card in cards {
        by_label
            .entry(card.label.as_str())
            .or_default()
            .push(card.clone());
    }

    by_label
        .into_iter()
        .map(|(label, mut cards)| {
            // Stable: ties keep creation order
            cards.sort_by_key(|card| (!is_due(card, today), card.next_review));
            let pending = cards.iter().any(|card| is_due(card, today));
            FlashcardFolder {
                label: label.to_string(),
                cards,
                pending,
            }
        })
        .collect()
}
