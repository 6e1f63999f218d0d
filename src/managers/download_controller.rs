//! Download Controller for Gove.
//!
//! Tracks each transfer from the engine's request to one terminal state.
//! `InProgress` moves to exactly one of `Completed`, `Cancelled` or `Failed`;
//! terminal states absorb every later signal. A cancel that races a finished
//! signal wins.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::engine::{DownloadHandle, DownloadRequest};
use crate::services::address::file_name_from_url;
use crate::types::download::{Download, DownloadId, DownloadState};
use crate::types::errors::DownloadError;

/// Trait defining download tracking operations.
///
/// Transition methods return `Ok(Some(state))` when the download moved to
/// `state`, and `Ok(None)` when the signal was absorbed.
pub trait DownloadControllerTrait {
    fn begin(&mut self, request: DownloadRequest) -> DownloadId;
    fn on_progress(&mut self, id: DownloadId, percent: i32) -> Result<u8, DownloadError>;
    fn cancel(&mut self, id: DownloadId) -> Result<Option<DownloadState>, DownloadError>;
    fn on_finished(&mut self, id: DownloadId) -> Result<Option<DownloadState>, DownloadError>;
    fn on_failed(&mut self, id: DownloadId, reason: &str) -> Result<Option<DownloadState>, DownloadError>;
    fn download_folder(&self, id: DownloadId) -> Result<PathBuf, DownloadError>;
    fn get(&self, id: DownloadId) -> Option<&Download>;
    fn list(&self) -> Vec<&Download>;
}

pub struct DownloadController {
    downloads: Vec<Download>,
    /// Engine handles for downloads still in progress.
    handles: HashMap<DownloadId, Box<dyn DownloadHandle>>,
}

impl DownloadController {
    pub fn new() -> Self {
        Self {
            downloads: Vec::new(),
            handles: HashMap::new(),
        }
    }

    fn find_index(&self, id: DownloadId) -> Result<usize, DownloadError> {
        self.downloads
            .iter()
            .position(|d| d.id == id)
            .ok_or(DownloadError::NotFound(id))
    }

    /// Moves an in-progress download to `next`; terminal downloads are left alone.
    fn finish_with(
        &mut self,
        id: DownloadId,
        next: DownloadState,
    ) -> Result<Option<DownloadState>, DownloadError> {
        let idx = self.find_index(id)?;
        let item = &mut self.downloads[idx];
        if item.state.is_terminal() {
            debug!(%id, current = ?item.state, ignored = ?next, "download already terminal");
            return Ok(None);
        }
        if next == DownloadState::Completed {
            item.progress_percent = 100;
        }
        item.state = next.clone();
        self.handles.remove(&id);
        info!(%id, state = ?next, "download ended");
        Ok(Some(next))
    }
}

impl Default for DownloadController {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadControllerTrait for DownloadController {
    fn begin(&mut self, request: DownloadRequest) -> DownloadId {
        let DownloadRequest {
            id,
            source_url,
            path,
            handle,
        } = request;

        info!(%id, url = %source_url, "download started");
        self.downloads.push(Download {
            id,
            file_name: file_name_from_url(&source_url),
            source_url,
            path,
            progress_percent: 0,
            state: DownloadState::InProgress,
        });
        self.handles.insert(id, handle);
        id
    }

    fn on_progress(&mut self, id: DownloadId, percent: i32) -> Result<u8, DownloadError> {
        let idx = self.find_index(id)?;
        let item = &mut self.downloads[idx];
        if item.state != DownloadState::InProgress {
            return Err(DownloadError::NotInProgress(id));
        }
        item.progress_percent = percent.clamp(0, 100) as u8;
        Ok(item.progress_percent)
    }

    fn cancel(&mut self, id: DownloadId) -> Result<Option<DownloadState>, DownloadError> {
        let idx = self.find_index(id)?;
        if self.downloads[idx].state.is_terminal() {
            return Ok(None);
        }
        if let Some(handle) = self.handles.get_mut(&id) {
            handle.cancel();
        }
        self.finish_with(id, DownloadState::Cancelled)
    }

    fn on_finished(&mut self, id: DownloadId) -> Result<Option<DownloadState>, DownloadError> {
        self.finish_with(id, DownloadState::Completed)
    }

    fn on_failed(
        &mut self,
        id: DownloadId,
        reason: &str,
    ) -> Result<Option<DownloadState>, DownloadError> {
        self.finish_with(id, DownloadState::Failed(reason.to_string()))
    }

    /// Folder holding the downloaded file, checked against the filesystem.
    fn download_folder(&self, id: DownloadId) -> Result<PathBuf, DownloadError> {
        let idx = self.find_index(id)?;
        let item = &self.downloads[idx];
        let path = item
            .path
            .as_ref()
            .ok_or_else(|| DownloadError::FileMissing(item.file_name.clone()))?;
        if !path.exists() {
            return Err(DownloadError::FileMissing(path.display().to_string()));
        }
        Ok(path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    fn get(&self, id: DownloadId) -> Option<&Download> {
        self.downloads.iter().find(|d| d.id == id)
    }

    fn list(&self) -> Vec<&Download> {
        self.downloads.iter().collect()
    }
}
