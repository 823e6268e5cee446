//! StudyFlow client library
//!
//! Everything the UI and the CLI share above the wire format:
//!
//! - `Store` - last loaded data for one user, typed selectors, and one
//!   action per user operation (each followed by a full reload)
//! - `SessionManager` - current session, change notifications, sign-in/up/out
//! - `Timer` - the study timer's running flag and second counter
//! - `MemoryApi` - an in-memory backend with ownership checks and
//!   failure injection, behind the `testing` feature
//!
//! # Example
//!
//! ```ignore
//! use studyflow_lib::{MemoryApi, SessionManager, Store};
//!
//! let api = MemoryApi::new();
//! let sessions = SessionManager::new();
//! let session = sessions.sign_in(&api, "ada@example.com", "secret1").await?;
//!
//! let mut store = Store::new(api, session);
//! store.reload().await?;
//! store.create_subject("Calculus").await?;
//! assert_eq!(store.subjects().len(), 1);
//! ```

pub mod cascade;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod session;
pub mod store;
pub mod timer;

// Re-export main types at crate root
pub use cascade::{CascadeReport, CascadeStep};
pub use error::{ClientError, Result};
#[cfg(any(test, feature = "testing"))]
pub use memory::{MemoryApi, MemoryOp};
pub use session::{SessionManager, SignUpOutcome, Subscription};
pub use store::{Command, Snapshot, Store};
pub use timer::Timer;
