//! Profile persistence under a single fixed key.
//!
//! Mirrors what the browser keeps in local storage: one JSON blob holding
//! the [`UserProfile`]. The HTTP routes are stateless and never touch it;
//! it is a library helper for native clients. Loading is forgiving (absent
//! or unreadable data means "no profile yet"); saving reports errors.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::domain::UserProfile;

/// Storage key the profile blob lives under.
pub const PROFILE_STORAGE_KEY: &str = "cucinaProfile";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", PROFILE_STORAGE_KEY))
    }

    pub async fn save(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_vec(profile).context("Failed to serialize profile")?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        // Each save gets its own temp file, renamed into place when complete
        let dir = self.dir.clone();
        let path = self.path();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)
                .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
            tmp.write_all(&json).context("Failed to write profile")?;
            tmp.as_file().sync_all().context("Failed to flush profile")?;
            tmp.persist(&path)
                .map_err(|e| e.error)
                .with_context(|| format!("Failed to move profile to {}", path.display()))?;
            Ok(())
        })
        .await
        .context("Profile writer task failed")??;

        tracing::debug!(path = %self.path().display(), "Profile saved");
        Ok(())
    }

    pub async fn load(&self) -> Option<UserProfile> {
        let path = self.path();

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read profile");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Stored profile is corrupt");
                None
            }
        }
    }
}
