use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Chrome user-data directory for a smoke run.
///
/// Temporary profiles give every run a clean browser state and are removed on
/// drop. Named profiles live under `~/.canary/profiles/` and survive runs, which
/// is useful when the application needs a logged-in session.
pub struct ProfileManager {
    path: PathBuf,
    temp_dir: Option<TempDir>,
}

impl ProfileManager {
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("canary-profile-").tempdir()?;

        Ok(Self {
            path: temp_dir.path().to_path_buf(),
            temp_dir: Some(temp_dir),
        })
    }

    /// Use (and create if needed) the named profile under the profiles directory
    pub fn named(name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }

        Self::persistent(Self::profiles_dir()?.join(name))
    }

    pub fn persistent(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            path,
            temp_dir: None,
        })
    }

    /// `~/.canary/profiles`
    pub fn profiles_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))?;
        Ok(home.join(".canary").join("profiles"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }
}
