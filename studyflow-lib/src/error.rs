//! Error types for studyflow-lib

use shared::ApiError;

use crate::cascade::CascadeStep;

/// Errors returned by store actions and session handling
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required field was empty. The UI ignores these.
    #[error("Missing input: {0}")]
    Validation(&'static str),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("{}", .0.message())]
    Api(#[from] ApiError),

    #[error("Delete stopped while {step}: {}", .source.message())]
    CascadeInterrupted {
        step: CascadeStep,
        #[source]
        source: ApiError,
    },

    #[error("Confirmation phrase did not match")]
    ConfirmationMismatch,

    #[error("Nothing to save yet")]
    NothingToSave,

    #[error("File is too large ({size} bytes, limit {limit})")]
    FileTooLarge { size: usize, limit: usize },
}

impl ClientError {
    /// Whether the action should be dropped without telling the user
    pub fn is_silent(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::NothingToSave)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::MissingCredentials;
        assert_eq!(format!("{}", err), "Email and password are required");

        let err = ClientError::Api(ApiError::Auth("JWT expired".to_string()));
        assert_eq!(format!("{}", err), "JWT expired");

        let err = ClientError::CascadeInterrupted {
            step: CascadeStep::DeletingTopics,
            source: ApiError::Network("offline".to_string()),
        };
        assert_eq!(format!("{}", err), "Delete stopped while deleting topics: offline");
    }

    #[test]
    fn test_silent_errors() {
        assert!(ClientError::Validation("subject name").is_silent());
        assert!(ClientError::NothingToSave.is_silent());
        assert!(!ClientError::MissingCredentials.is_silent());
        assert!(!ClientError::ConfirmationMismatch.is_silent());
    }
}
