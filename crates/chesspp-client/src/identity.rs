//! Persisted local identity.
//!
//! The server hands out anonymous usernames; we remember ours across runs
//! in a small JSON file, together with a one-shot flag recording that the
//! last disconnect was intentional (so the next startup skips the
//! reconnect prompt).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use chesspp_common::{new_challenge_id, ClientError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct IdentityFile {
    username: Option<String>,
    intentional_disconnect: bool,
}

/// Local identity backed by a JSON file. Every mutation persists
/// immediately.
pub struct IdentityStore {
    path: PathBuf,
    data: IdentityFile,
}

impl IdentityStore {
    /// Open the store at the platform data directory, creating the file on
    /// first use.
    pub fn open_default() -> Result<Self, ClientError> {
        let path = default_identity_path()
            .ok_or_else(|| ClientError::Other("no data directory on this platform".into()))?;
        Self::open(&path)
    }

    /// Open the store at an explicit path. A missing file yields an empty
    /// identity; a corrupt one is discarded and rewritten on the next save.
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        let data = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                debug!(error = %e, "identity file unreadable, starting fresh");
                IdentityFile::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IdentityFile::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn username(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ClientError> {
        self.data.username = Some(username.to_string());
        self.save()
    }

    /// Derive a new name from the current one by swapping in a short hex
    /// suffix. Used when the server rejects our remembered name.
    pub fn regenerate_username(&mut self) -> Result<String, ClientError> {
        let base = self
            .data
            .username
            .as_deref()
            .map(|name| name.split('-').next().unwrap_or(name).to_string())
            .unwrap_or_else(|| "player".to_string());
        let fresh = format!("{base}-{}", &new_challenge_id()[..4]);
        self.data.username = Some(fresh.clone());
        self.save()?;
        Ok(fresh)
    }

    /// Record that the user chose to disconnect.
    pub fn mark_intentional_disconnect(&mut self) -> Result<(), ClientError> {
        self.data.intentional_disconnect = true;
        self.save()
    }

    /// Read and clear the intentional-disconnect flag.
    pub fn take_intentional_disconnect(&mut self) -> Result<bool, ClientError> {
        let was = self.data.intentional_disconnect;
        if was {
            self.data.intentional_disconnect = false;
            self.save()?;
        }
        Ok(was)
    }

    fn save(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ClientError::Other(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// `<data_dir>/chesspp/identity.json`.
pub fn default_identity_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("chesspp").join("identity.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::open(&dir.path().join("identity.json")).unwrap();
        assert!(store.username().is_none());
    }

    #[test]
    fn username_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let mut store = IdentityStore::open(&path).unwrap();
        store.set_username("alice").unwrap();

        let reopened = IdentityStore::open(&path).unwrap();
        assert_eq!(reopened.username(), Some("alice"));
    }

    #[test]
    fn intentional_disconnect_reads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");

        let mut store = IdentityStore::open(&path).unwrap();
        store.set_username("alice").unwrap();
        store.mark_intentional_disconnect().unwrap();

        let mut reopened = IdentityStore::open(&path).unwrap();
        assert!(reopened.take_intentional_disconnect().unwrap());
        assert!(!reopened.take_intentional_disconnect().unwrap());

        let reopened_again = IdentityStore::open(&path).unwrap();
        assert!(!reopened_again.data.intentional_disconnect);
    }

    #[test]
    fn regenerated_name_keeps_the_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = IdentityStore::open(&dir.path().join("identity.json")).unwrap();
        store.set_username("alice").unwrap();

        let fresh = store.regenerate_username().unwrap();
        assert!(fresh.starts_with("alice-"));
        assert_eq!(fresh.len(), "alice-".len() + 4);

        // Regenerating again replaces the suffix instead of stacking.
        let again = store.regenerate_username().unwrap();
        assert!(again.starts_with("alice-"));
        assert_eq!(again.len(), fresh.len());
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.json");
        fs::write(&path, "{not json").unwrap();

        let store = IdentityStore::open(&path).unwrap();
        assert!(store.username().is_none());
    }
}
