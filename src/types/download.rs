use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one transfer, assigned by the engine adapter that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadId(Uuid);

impl DownloadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DownloadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of a download. Everything except `InProgress` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadState {
    InProgress,
    Cancelled,
    Completed,
    Failed(String),
}

impl DownloadState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DownloadState::InProgress)
    }
}

/// Represents a file download with its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    pub id: DownloadId,
    pub source_url: String,
    pub file_name: String,
    pub path: Option<PathBuf>,
    pub progress_percent: u8,
    pub state: DownloadState,
}

impl Download {
    /// `report.pdf [#####---------------] 25%`
    pub fn progress_label(&self) -> String {
        const WIDTH: usize = 20;
        let percent = self.progress_percent.min(100);
        let filled = usize::from(percent) * WIDTH / 100;
        format!(
            "{} [{}{}] {}%",
            self.file_name,
            "#".repeat(filled),
            "-".repeat(WIDTH - filled),
            percent
        )
    }
}
