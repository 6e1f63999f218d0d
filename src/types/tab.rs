use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Profile;

/// Stable identity of a tab, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open browsing context. Owns its content view exclusively.
#[derive(Debug)]
pub struct Tab<V> {
    pub id: TabId,
    pub view: V,
    pub label: String,
    pub current_url: String,
    is_private: bool,
    pub profile: Profile,
    pub loading: bool,
}

impl<V> Tab<V> {
    pub fn new(id: TabId, view: V, label: &str, url: &str, is_private: bool, profile: Profile) -> Self {
        Self {
            id,
            view,
            label: label.to_string(),
            current_url: url.to_string(),
            is_private,
            profile,
            loading: false,
        }
    }

    /// Privacy is fixed when the tab is created.
    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            id: self.id,
            label: self.label.clone(),
            url: self.current_url.clone(),
            is_private: self.is_private,
            loading: self.loading,
        }
    }
}

/// Read-only view of a tab handed to the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub label: String,
    pub url: String,
    pub is_private: bool,
    pub loading: bool,
}
