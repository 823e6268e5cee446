//! Hooks holding the app's session, store and timer state

mod use_expanded_subjects;
mod use_session;
mod use_store;
mod use_timer;

pub use use_expanded_subjects::use_expanded_subjects;
pub use use_session::{use_auth, use_session, AuthContext};
pub use use_store::{use_store, use_study_store, StoreHandle};
pub use use_timer::{use_timer, TimerAction};
