//! Where the CLI keeps the signed-in session between runs

use anyhow::{Context, Result};
use shared::Session;
use std::fs;
use std::path::{Path, PathBuf};

/// A JSON file holding the persisted [`Session`]
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Use `override_path` if given, otherwise `session.json` in the
    /// platform config directory
    pub fn locate(override_path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = override_path {
            return Ok(Self::at(path));
        }
        let config_dir = directories::ProjectDirs::from("com", "studyflow", "studyflow")
            .context("Failed to determine config directory")?
            .config_dir()
            .to_path_buf();
        Ok(Self::at(config_dir.join("session.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, or `None` when nobody is signed in
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let session = serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(session))
    }

    /// Write `session`, or remove the file when it is `None`
    pub fn save(&self, session: Option<&Session>) -> Result<()> {
        let Some(session) = session else {
            if self.path.exists() {
                fs::remove_file(&self.path).context("Failed to remove session file")?;
            }
            return Ok(());
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("tmp");
        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&temp_path, &contents).context("Failed to write temp session file")?;
        fs::rename(&temp_path, &self.path).context("Failed to rename session file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserInfo;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Some(1_700_000_000),
            user: UserInfo {
                id: Uuid::new_v4(),
                email: Some("ada@example.com".to_string()),
            },
        }
    }

    #[test]
    fn test_missing_file_means_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::at(dir.path().join("session.json"));
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::at(dir.path().join("nested").join("session.json"));
        let session = session();

        file.save(Some(&session)).unwrap();
        assert_eq!(file.load().unwrap(), Some(session));
        assert!(!file.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_saving_none_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = SessionFile::at(dir.path().join("session.json"));
        file.save(Some(&session())).unwrap();

        file.save(None).unwrap();
        assert!(!file.path().exists());
        // Removing twice is fine
        file.save(None).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(SessionFile::at(path).load().is_err());
    }

    #[test]
    fn test_override_path_wins() {
        let file = SessionFile::locate(Some(PathBuf::from("/tmp/custom.json"))).unwrap();
        assert_eq!(file.path(), Path::new("/tmp/custom.json"));
    }
}
