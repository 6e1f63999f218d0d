use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platform;

/// User agent sent by every tab's profile.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Shell configuration, stored as JSON in the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    /// Loaded by the Home action and by the startup tab.
    pub homepage: String,
    /// Label of the tab opened at startup.
    pub startup_label: String,
    /// Loaded by the New Tab action.
    pub new_tab_url: String,
    pub user_agent: String,
    /// Where the shared profile saves downloads. `None` uses the platform default.
    pub download_dir: Option<PathBuf>,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            homepage: "https://www.google.com".to_string(),
            startup_label: "Google Search".to_string(),
            new_tab_url: "https://www.google.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            download_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ShellSettings {
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(platform::get_download_dir)
    }
}
