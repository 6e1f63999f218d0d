//! Seam between the shell core and the external rendering engine.
//!
//! An engine adapter implements [`ViewFactory`] and [`ContentView`]. Views never
//! call back into the tab manager; they emit [`EngineEvent`]s tagged with their
//! own tab id through the [`ViewEventSink`] handed to them at creation.

pub mod event_bus;
pub mod headless;
pub mod pending;

use std::fmt;
use std::path::PathBuf;

use crate::types::download::DownloadId;
use crate::types::profile::Profile;
use crate::types::tab::TabId;

pub use event_bus::{EngineSink, EventBus, ViewEventSink};

/// Per-tab content surface of the rendering engine.
pub trait ContentView {
    fn load(&mut self, url: &str);
    fn back(&mut self);
    fn forward(&mut self);
    fn reload(&mut self);
    /// Moves the view onto another profile, keeping its current page.
    fn rebind_profile(&mut self, profile: &Profile);
    fn set_visible(&mut self, visible: bool);
    /// Page the view is showing now, as far as the engine knows.
    fn current_url(&self) -> Option<String>;
}

/// Creates content views. Owned by the tab manager.
pub trait ViewFactory {
    type View: ContentView;

    /// Called once, before any view is created, with the sink for
    /// profile-level (download) events.
    fn attach(&mut self, sink: EngineSink);

    fn create_view(&mut self, tab: TabId, profile: &Profile, events: ViewEventSink) -> Self::View;
}

/// Engine-side control over one transfer.
pub trait DownloadHandle: Send {
    /// Asks the engine to abandon the transfer. Cooperative; the engine may
    /// still report a late finished signal.
    fn cancel(&mut self);
}

/// Events a content view reports about its own tab.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    UrlChanged(String),
    TitleChanged(String),
    LoadFinished { ok: bool },
    FullscreenRequested(bool),
}

/// A download the engine wants to start.
pub struct DownloadRequest {
    pub id: DownloadId,
    pub source_url: String,
    pub path: Option<PathBuf>,
    pub handle: Box<dyn DownloadHandle>,
}

impl fmt::Debug for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("id", &self.id)
            .field("source_url", &self.source_url)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Profile-level download signals.
#[derive(Debug)]
pub enum DownloadEvent {
    Requested(DownloadRequest),
    Progress { id: DownloadId, percent: i32 },
    Finished { id: DownloadId },
    Failed { id: DownloadId, reason: String },
}

/// Everything that flows from the engine into the tab manager.
#[derive(Debug)]
pub enum EngineEvent {
    View { tab: TabId, event: ViewEvent },
    Download(DownloadEvent),
}
