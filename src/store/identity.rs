use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::client::api::Group;
use crate::store::schema::IdentityData;

const IDENTITY_FILE: &str = "identity.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no data directory available")]
    NoDataDir,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Remembers the player name and group between runs.
pub trait IdentityStore {
    fn player(&self) -> Option<&str>;
    fn group(&self) -> Option<&Group>;
    fn set_player(&mut self, name: &str) -> Result<(), StoreError>;
    fn set_group(&mut self, group: Option<Group>) -> Result<(), StoreError>;
    /// Forget the player and their group.
    fn logout(&mut self) -> Result<(), StoreError>;
}

pub struct FileIdentityStore {
    base_dir: PathBuf,
    data: IdentityData,
}

impl FileIdentityStore {
    pub fn open() -> Result<Self, StoreError> {
        let base_dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("tabledrill");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        let data = Self::load(&base_dir.join(IDENTITY_FILE));
        Ok(Self { base_dir, data })
    }

    /// Unreadable or stale files start over as an anonymous identity.
    fn load(path: &PathBuf) -> IdentityData {
        let Ok(content) = fs::read_to_string(path) else {
            return IdentityData::default();
        };
        match serde_json::from_str::<IdentityData>(&content) {
            Ok(data) if !data.needs_reset() => data,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "identity schema changed, starting fresh");
                IdentityData::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "identity file unreadable");
                IdentityData::default()
            }
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        let path = self.base_dir.join(IDENTITY_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&self.data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl IdentityStore for FileIdentityStore {
    fn player(&self) -> Option<&str> {
        self.data.player.as_deref()
    }

    fn group(&self) -> Option<&Group> {
        self.data.group.as_ref()
    }

    fn set_player(&mut self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        self.data.player = (!name.is_empty()).then(|| name.to_string());
        self.save()
    }

    fn set_group(&mut self, group: Option<Group>) -> Result<(), StoreError> {
        self.data.group = group;
        self.save()
    }

    fn logout(&mut self) -> Result<(), StoreError> {
        self.data = IdentityData::default();
        self.save()
    }
}
