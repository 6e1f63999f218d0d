use serde::{Deserialize, Serialize};

use super::download::{DownloadId, DownloadState};
use super::tab::TabId;

/// Address bar, security indicator and status bar, derived from the active tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChromeState {
    pub url: String,
    pub title: String,
    pub secure: bool,
    pub status: String,
}

impl ChromeState {
    pub fn secure_label(&self) -> &'static str {
        if self.secure {
            "Secure"
        } else {
            "Not Secure"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A blocking notice the shell must present to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn warning(title: &str, message: &str) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// Everything the tab manager publishes for the shell to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShellUpdate {
    Chrome(ChromeState),
    TabOpened { tab: TabId, index: usize, label: String },
    TabClosed { tab: TabId },
    TabLabel { tab: TabId, label: String },
    ActiveChanged { tab: TabId, index: usize },
    Status(String),
    Fullscreen(bool),
    DownloadStarted { id: DownloadId, file_name: String },
    DownloadProgress { id: DownloadId, percent: u8 },
    DownloadEnded { id: DownloadId, state: DownloadState },
    Notice(Notice),
}
