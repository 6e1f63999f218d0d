use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which isolation unit a profile is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    /// The one profile shared by every non-private tab.
    Shared,
    /// A fresh, non-persisted profile owned by a single private tab.
    Ephemeral,
}

/// Engine isolation unit for cookies, cache and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub kind: ProfileKind,
    pub user_agent: String,
    /// Only the shared profile has a configured download directory.
    pub download_dir: Option<PathBuf>,
}

impl Profile {
    pub fn shared(user_agent: &str, download_dir: Option<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ProfileKind::Shared,
            user_agent: user_agent.to_string(),
            download_dir,
        }
    }

    pub fn ephemeral(user_agent: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ProfileKind::Ephemeral,
            user_agent: user_agent.to_string(),
            download_dir: None,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.kind == ProfileKind::Ephemeral
    }
}
