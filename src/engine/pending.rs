//! Matches engine "download completed" callbacks back to the download they
//! finish.
//!
//! Engines that only report the source url on completion (wry) can have
//! several transfers of the same url in flight. Entries are queued per url; a
//! completion carrying a destination path takes the entry with that path,
//! otherwise the oldest entry for the url.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::DownloadHandle;
use crate::types::download::DownloadId;

/// A started transfer the engine has not reported as completed yet.
#[derive(Debug)]
pub struct PendingTransfer {
    pub id: DownloadId,
    pub path: Option<PathBuf>,
    cancelled: Arc<AtomicBool>,
}

impl PendingTransfer {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cancel handle for engines that cannot abort a transfer: it only raises a
/// flag the completion callback checks.
#[derive(Debug)]
pub struct CancelFlag(Arc<AtomicBool>);

impl DownloadHandle for CancelFlag {
    fn cancel(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct PendingTransfers {
    by_url: HashMap<String, VecDeque<PendingTransfer>>,
}

impl PendingTransfers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a transfer and returns the handle to give the download controller.
    pub fn start(&mut self, url: &str, id: DownloadId, path: Option<PathBuf>) -> CancelFlag {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.by_url
            .entry(url.to_string())
            .or_default()
            .push_back(PendingTransfer {
                id,
                path,
                cancelled: cancelled.clone(),
            });
        CancelFlag(cancelled)
    }

    /// Takes the transfer a completion for `url` refers to.
    pub fn complete(&mut self, url: &str, path: Option<&Path>) -> Option<PendingTransfer> {
        let queue = self.by_url.get_mut(url)?;
        let index = path
            .and_then(|p| queue.iter().position(|t| t.path.as_deref() == Some(p)))
            .unwrap_or(0);
        let transfer = queue.remove(index);
        if queue.is_empty() {
            self.by_url.remove(url);
        }
        transfer
    }

    pub fn len(&self) -> usize {
        self.by_url.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}
