pub mod flashcards;
pub mod login;
pub mod report;
pub mod schedule;
pub mod subjects;
