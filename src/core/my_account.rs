//! The user's own account, remembered between invocations.
//!
//! Stored as a small JSON file (`$OPENVALVE_HOME/my_account.json`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::AccountProfile;

/// Saved identifier pair for "my account"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyAccount {
    pub steamid: String,
    pub personaname: String,
}

impl MyAccount {
    pub fn new(steamid: impl Into<String>, personaname: impl Into<String>) -> Self {
        Self {
            steamid: steamid.into(),
            personaname: personaname.into(),
        }
    }

    /// Get the storage path from configuration
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::config::config()?.my_account_path())
    }

    /// Load the saved account; a missing file means none is set
    pub async fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read account file: {}", path.display()))?;

        let account = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse account file: {}", path.display()))?;
        Ok(Some(account))
    }

    /// Save, replacing whatever was stored before
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write account file: {}", path.display()))?;

        Ok(())
    }

    /// Forget the saved account. Returns whether anything was removed.
    pub async fn clear_at(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to remove account file: {}", path.display()))?;
        Ok(true)
    }

    pub async fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::default_path()?).await
    }

    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?).await
    }

    pub async fn clear() -> Result<bool> {
        Self::clear_at(&Self::default_path()?).await
    }
}

impl From<&AccountProfile> for MyAccount {
    fn from(profile: &AccountProfile) -> Self {
        Self::new(profile.steamid.clone(), profile.personaname.clone())
    }
}
