//! App Core for Gove.
//!
//! Owns the settings engine and the tab manager, and runs the startup and
//! shutdown sequences around them.

use tracing::{info, warn};

use crate::engine::ViewFactory;
use crate::managers::session_store::{SessionState, SessionStoreTrait};
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::address::resolve_input;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::tab::TabId;

/// Central application struct.
pub struct App<F: ViewFactory> {
    pub settings_engine: SettingsEngine,
    pub tab_manager: TabManager<F>,
}

/// What was alive at shutdown, for the exit log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub history: usize,
    pub bookmarks: usize,
    pub downloads: usize,
}

impl<F: ViewFactory> App<F> {
    /// Builds the tab manager around a fresh session, using the settings the
    /// engine holds. The caller loads them first; the file is not read again.
    pub fn new(factory: F, settings_engine: SettingsEngine) -> Self {
        let settings = settings_engine.get_settings().clone();
        let tab_manager = TabManager::new(factory, SessionState::new(), settings);
        Self {
            settings_engine,
            tab_manager,
        }
    }

    /// Startup sequence: open the default tab on `url` (or the homepage),
    /// optionally entering private mode first.
    pub fn startup(&mut self, url: Option<&str>, private: bool) -> TabId {
        if private {
            self.tab_manager.toggle_global_private_mode();
        }
        let settings = self.settings_engine.get_settings();
        let target = match url.map(resolve_input) {
            Some(Some(resolved)) => resolved,
            Some(None) => {
                warn!("ignoring blank startup url");
                settings.homepage.clone()
            }
            None => settings.homepage.clone(),
        };
        let label = settings.startup_label.clone();
        let tab = self.tab_manager.open_tab(&target, &label);
        info!(tab = %tab, url = %target, "startup complete");
        tab
    }

    /// Shutdown sequence: drop every view and the in-memory session.
    pub fn shutdown(self) -> SessionSummary {
        let session = self.tab_manager.into_session();
        let summary = SessionSummary {
            history: session.history().len(),
            bookmarks: session.bookmarks().len(),
            downloads: session.downloads().len(),
        };
        info!(?summary, "session discarded");
        summary
    }
}
