//! Session state for Gove.
//!
//! History, bookmarks, finished downloads and the private-mode flag. Pure
//! in-memory data: created at startup, dropped at shutdown, never written to
//! disk. The tab manager is the only writer and applies the privacy policy
//! before calling [`SessionStoreTrait::record_visit`].

use serde::Serialize;

use crate::types::download::Download;

/// Result of a bookmark request, used for the status-bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOutcome {
    Added,
    AlreadyBookmarked,
}

impl BookmarkOutcome {
    pub fn is_new(self) -> bool {
        self == BookmarkOutcome::Added
    }

    pub fn message(self, url: &str) -> String {
        match self {
            BookmarkOutcome::Added => format!("Bookmarked: {}", url),
            BookmarkOutcome::AlreadyBookmarked => "URL already bookmarked".to_string(),
        }
    }
}

/// Trait defining session store operations.
pub trait SessionStoreTrait {
    fn record_visit(&mut self, url: &str);
    fn add_bookmark(&mut self, url: &str) -> BookmarkOutcome;
    fn record_download(&mut self, download: Download);
    fn history(&self) -> &[String];
    fn bookmarks(&self) -> &[String];
    fn downloads(&self) -> &[Download];
    fn private_mode_active(&self) -> bool;
    fn set_private_mode(&mut self, active: bool);
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SessionState {
    history: Vec<String>,
    bookmarks: Vec<String>,
    downloads: Vec<Download>,
    private_mode_active: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStoreTrait for SessionState {
    /// Appends unconditionally; filtering private tabs is the caller's job.
    fn record_visit(&mut self, url: &str) {
        self.history.push(url.to_string());
    }

    fn add_bookmark(&mut self, url: &str) -> BookmarkOutcome {
        if self.bookmarks.iter().any(|b| b == url) {
            return BookmarkOutcome::AlreadyBookmarked;
        }
        self.bookmarks.push(url.to_string());
        BookmarkOutcome::Added
    }

    fn record_download(&mut self, download: Download) {
        self.downloads.push(download);
    }

    fn history(&self) -> &[String] {
        &self.history
    }

    fn bookmarks(&self) -> &[String] {
        &self.bookmarks
    }

    fn downloads(&self) -> &[Download] {
        &self.downloads
    }

    fn private_mode_active(&self) -> bool {
        self.private_mode_active
    }

    fn set_private_mode(&mut self, active: bool) {
        self.private_mode_active = active;
    }
}
