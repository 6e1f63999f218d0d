use thiserror::Error;

use super::download::DownloadId;
use super::tab::TabId;

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, Error, PartialEq)]
pub enum TabError {
    /// Tab with the given ID is not open (it may already have been closed).
    #[error("Tab not found: {0}")]
    NotFound(TabId),
}

// === DownloadError ===

/// Errors related to download tracking.
#[derive(Debug, Error, PartialEq)]
pub enum DownloadError {
    /// Download with the given ID was never started.
    #[error("Download not found: {0}")]
    NotFound(DownloadId),
    /// The download already reached a terminal state.
    #[error("Download is not in progress: {0}")]
    NotInProgress(DownloadId),
    /// The downloaded file was moved or deleted.
    #[error("File not found: {0}")]
    FileMissing(String),
}

// === SettingsError ===

/// Errors related to loading and saving shell settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// The settings file could not be parsed or serialized.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
}
