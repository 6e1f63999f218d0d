//! Tab Manager for Gove.
//!
//! Owns the ordered tab collection, the active-tab pointer, the single-slot
//! closed-tab buffer, the session state and the download controller. User
//! commands and engine events both mutate state here, serialized by the UI
//! loop; the shell only sees the [`ShellUpdate`]s published in response.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::engine::{ContentView, DownloadEvent, EngineEvent, EventBus, ViewEvent, ViewFactory};
use crate::managers::download_controller::{DownloadController, DownloadControllerTrait};
use crate::managers::session_store::{BookmarkOutcome, SessionState, SessionStoreTrait};
use crate::services::address::{is_secure, resolve_input};
use crate::types::download::{DownloadId, DownloadState};
use crate::types::errors::{DownloadError, TabError};
use crate::types::profile::Profile;
use crate::types::settings::ShellSettings;
use crate::types::shell::{ChromeState, Notice, ShellUpdate};
use crate::types::tab::{Tab, TabId, TabSnapshot};

/// Trait defining the tab lifecycle contract exposed to shells.
pub trait TabManagerTrait {
    fn open_tab(&mut self, url: &str, label: &str) -> TabId;
    fn close_tab(&mut self, tab_id: TabId) -> bool;
    fn reopen_last_closed(&mut self) -> Option<TabId>;
    fn set_active(&mut self, tab_id: TabId) -> Result<(), TabError>;
    fn navigate(&mut self, tab_id: TabId, raw_input: &str) -> Option<String>;
    fn toggle_global_private_mode(&mut self) -> bool;
    fn tab_count(&self) -> usize;
    fn active_tab(&self) -> Option<TabSnapshot>;
    fn tabs(&self) -> Vec<TabSnapshot>;
}

pub struct TabManager<F: ViewFactory> {
    factory: F,
    bus: EventBus,
    tabs: Vec<Tab<F::View>>,
    active: Option<TabId>,
    last_closed: Option<Tab<F::View>>,
    session: SessionState,
    downloads: DownloadController,
    settings: ShellSettings,
    shared_profile: Profile,
    status: String,
    updates: Vec<ShellUpdate>,
}

impl<F: ViewFactory> TabManager<F> {
    /// Takes ownership of the session for the lifetime of the shell.
    pub fn new(mut factory: F, session: SessionState, settings: ShellSettings) -> Self {
        let bus = EventBus::new();
        factory.attach(bus.sink());
        let shared_profile = Profile::shared(
            &settings.user_agent,
            Some(settings.resolved_download_dir()),
        );

        Self {
            factory,
            bus,
            tabs: Vec::new(),
            active: None,
            last_closed: None,
            session,
            downloads: DownloadController::new(),
            settings,
            shared_profile,
            status: String::new(),
            updates: Vec::new(),
        }
    }

    fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Option<&mut Tab<F::View>> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    fn profile_for(&self, private: bool) -> Profile {
        if private {
            Profile::ephemeral(&self.settings.user_agent)
        } else {
            self.shared_profile.clone()
        }
    }

    fn publish(&mut self, update: ShellUpdate) {
        self.updates.push(update);
    }

    fn set_status(&mut self, message: String) {
        self.status = message.clone();
        self.publish(ShellUpdate::Status(message));
    }

    fn sync_chrome(&mut self) {
        let chrome = self.chrome();
        self.publish(ShellUpdate::Chrome(chrome));
    }

    /// Points the active pointer at an open tab, swapping view visibility.
    fn activate(&mut self, tab_id: TabId) {
        if let Some(previous) = self.active.filter(|p| *p != tab_id) {
            if let Some(tab) = self.tab_mut(previous) {
                tab.view.set_visible(false);
            }
        }
        let Some(index) = self.index_of(tab_id) else {
            return;
        };
        self.active = Some(tab_id);
        let tab = &mut self.tabs[index];
        tab.view.set_visible(true);
        self.status = tab.current_url.clone();
        self.publish(ShellUpdate::ActiveChanged {
            tab: tab_id,
            index,
        });
        self.sync_chrome();
    }

    // ─── Toolbar actions ───

    /// Opens the configured new-tab page.
    pub fn new_tab(&mut self) -> TabId {
        let url = self.settings.new_tab_url.clone();
        self.open_tab(&url, "New Tab")
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn navigate_active(&mut self, raw_input: &str) -> Option<String> {
        let active = self.active?;
        self.navigate(active, raw_input)
    }

    pub fn navigate_home(&mut self, tab_id: TabId) -> bool {
        let homepage = self.settings.homepage.clone();
        self.load_into(tab_id, &homepage)
    }

    pub fn back(&mut self, tab_id: TabId) -> bool {
        self.with_view(tab_id, |view| view.back())
    }

    pub fn forward(&mut self, tab_id: TabId) -> bool {
        self.with_view(tab_id, |view| view.forward())
    }

    pub fn reload(&mut self, tab_id: TabId) -> bool {
        self.with_view(tab_id, |view| view.reload())
    }

    fn with_view(&mut self, tab_id: TabId, command: impl FnOnce(&mut F::View)) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                command(&mut tab.view);
                true
            }
            None => {
                debug!(tab = %tab_id, "command for a tab that is no longer open");
                false
            }
        }
    }

    fn load_into(&mut self, tab_id: TabId, url: &str) -> bool {
        match self.tab_mut(tab_id) {
            Some(tab) => {
                tab.loading = true;
                tab.view.load(url);
                true
            }
            None => {
                debug!(tab = %tab_id, url, "load for a tab that is no longer open");
                false
            }
        }
    }

    /// Bookmarks the active tab's current URL.
    pub fn bookmark_active(&mut self) -> Option<BookmarkOutcome> {
        let url = self.active_tab()?.url;
        Some(self.add_bookmark(&url))
    }

    pub fn add_bookmark(&mut self, url: &str) -> BookmarkOutcome {
        let outcome = self.session.add_bookmark(url);
        self.set_status(outcome.message(url));
        outcome
    }

    /// Publishes the visited urls, oldest first, for the shell to list.
    pub fn show_history(&mut self) {
        let body = listing(self.session.history(), "No history yet.");
        self.publish(ShellUpdate::Notice(Notice::info("History", &body)));
    }

    pub fn show_bookmarks(&mut self) {
        let body = listing(self.session.bookmarks(), "No bookmarks yet.");
        self.publish(ShellUpdate::Notice(Notice::info("Bookmarks", &body)));
    }

    // ─── Downloads ───

    /// Most recently started download that is still running.
    pub fn latest_in_progress_download(&self) -> Option<DownloadId> {
        self.downloads
            .list()
            .into_iter()
            .rev()
            .find(|d| d.state == DownloadState::InProgress)
            .map(|d| d.id)
    }

    /// Returns whether the download was in progress and is now cancelled.
    pub fn cancel_download(&mut self, id: DownloadId) -> bool {
        let result = self.downloads.cancel(id);
        let changed = matches!(result, Ok(Some(_)));
        self.after_download_transition(id, result);
        changed
    }

    /// Folder of a finished download. A moved or deleted file is reported to
    /// the user as a warning notice.
    pub fn open_download_folder(&mut self, id: DownloadId) -> Result<PathBuf, DownloadError> {
        match self.downloads.download_folder(id) {
            Ok(dir) => Ok(dir),
            Err(err) => {
                if let DownloadError::FileMissing(path) = &err {
                    warn!(%id, path = %path, "downloaded file is gone");
                    self.publish(ShellUpdate::Notice(Notice::warning("Error", "File not found")));
                }
                Err(err)
            }
        }
    }

    fn after_download_transition(
        &mut self,
        id: DownloadId,
        result: Result<Option<DownloadState>, DownloadError>,
    ) {
        let state = match result {
            Ok(Some(state)) => state,
            Ok(None) => return,
            Err(err) => {
                debug!(%id, error = %err, "download signal ignored");
                return;
            }
        };
        let Some(download) = self.downloads.get(id).cloned() else {
            return;
        };
        self.publish(ShellUpdate::DownloadEnded {
            id,
            state: state.clone(),
        });
        match state {
            DownloadState::Cancelled => {
                self.set_status(format!("Download cancelled: {}", download.source_url));
            }
            DownloadState::Completed => {
                self.session.record_download(download);
                self.publish(ShellUpdate::Notice(Notice::info(
                    "Download Complete",
                    "Download finished successfully.",
                )));
            }
            DownloadState::Failed(reason) => {
                self.session.record_download(download);
                self.publish(ShellUpdate::Notice(Notice::warning("Download Failed", &reason)));
            }
            DownloadState::InProgress => {}
        }
    }

    // ─── Engine events ───

    /// Applies every queued engine event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.bus.try_next() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Applies one engine event. Events for tabs that are not open are ignored.
    pub fn dispatch(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::View { tab, event } => self.on_view_event(tab, event),
            EngineEvent::Download(event) => self.on_download_event(event),
        }
    }

    fn on_view_event(&mut self, tab_id: TabId, event: ViewEvent) {
        let Some(index) = self.index_of(tab_id) else {
            debug!(tab = %tab_id, ?event, "event for a tab that is no longer open");
            return;
        };
        let is_active = self.active == Some(tab_id);

        match event {
            ViewEvent::UrlChanged(url) => {
                let tab = &mut self.tabs[index];
                tab.current_url = url.clone();
                if !tab.is_private() {
                    self.session.record_visit(&url);
                }
                if is_active {
                    self.status = url;
                    self.sync_chrome();
                }
            }
            ViewEvent::TitleChanged(title) => {
                self.tabs[index].label = title.clone();
                self.publish(ShellUpdate::TabLabel {
                    tab: tab_id,
                    label: title.clone(),
                });
                if is_active {
                    self.status = title;
                    self.sync_chrome();
                }
            }
            ViewEvent::LoadFinished { ok } => {
                let tab = &mut self.tabs[index];
                tab.loading = false;
                if !ok {
                    debug!(tab = %tab_id, url = %tab.current_url, "load did not succeed");
                }
            }
            ViewEvent::FullscreenRequested(on) => {
                self.publish(ShellUpdate::Fullscreen(on));
            }
        }
    }

    fn on_download_event(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Requested(request) => {
                let url = request.source_url.clone();
                let id = self.downloads.begin(request);
                let file_name = self
                    .downloads
                    .get(id)
                    .map(|d| d.file_name.clone())
                    .unwrap_or_default();
                self.publish(ShellUpdate::DownloadStarted { id, file_name });
                self.set_status(format!("Downloading: {}", url));
            }
            DownloadEvent::Progress { id, percent } => match self.downloads.on_progress(id, percent) {
                Ok(percent) => self.publish(ShellUpdate::DownloadProgress { id, percent }),
                Err(err) => debug!(%id, error = %err, "progress ignored"),
            },
            DownloadEvent::Finished { id } => {
                let result = self.downloads.on_finished(id);
                self.after_download_transition(id, result);
            }
            DownloadEvent::Failed { id, reason } => {
                let result = self.downloads.on_failed(id, &reason);
                self.after_download_transition(id, result);
            }
        }
    }

    // ─── Shell-facing queries ───

    /// Takes everything published since the last call.
    pub fn drain_updates(&mut self) -> Vec<ShellUpdate> {
        std::mem::take(&mut self.updates)
    }

    pub fn chrome(&self) -> ChromeState {
        match self.active.and_then(|id| self.tabs.iter().find(|t| t.id == id)) {
            Some(tab) => ChromeState {
                url: tab.current_url.clone(),
                title: tab.label.clone(),
                secure: is_secure(&tab.current_url),
                status: self.status.clone(),
            },
            None => ChromeState {
                status: self.status.clone(),
                ..ChromeState::default()
            },
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    pub fn tab_labels(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.label.clone()).collect()
    }

    pub fn tab_at(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).map(|t| t.id)
    }

    pub fn last_closed_label(&self) -> Option<&str> {
        self.last_closed.as_ref().map(|t| t.label.as_str())
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn downloads(&self) -> &DownloadController {
        &self.downloads
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Profile currently bound to a tab's view.
    pub fn profile_of(&self, tab_id: TabId) -> Option<&Profile> {
        self.tabs.iter().find(|t| t.id == tab_id).map(|t| &t.profile)
    }

    pub fn view(&self, tab_id: TabId) -> Option<&F::View> {
        self.tabs.iter().find(|t| t.id == tab_id).map(|t| &t.view)
    }

    pub fn view_mut(&mut self, tab_id: TabId) -> Option<&mut F::View> {
        self.tab_mut(tab_id).map(|t| &mut t.view)
    }

    /// Ends the session, dropping every view.
    pub fn into_session(self) -> SessionState {
        self.session
    }
}

fn listing(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join("\n")
    }
}

impl<F: ViewFactory> TabManagerTrait for TabManager<F> {
    /// Opens a tab on a profile matching the current private flag, loads `url`
    /// and makes the tab active.
    fn open_tab(&mut self, url: &str, label: &str) -> TabId {
        let id = TabId::new();
        let is_private = self.session.private_mode_active();
        let profile = self.profile_for(is_private);
        let events = self.bus.subscribe(id);
        let mut view = self.factory.create_view(id, &profile, events);
        view.load(url);

        let mut tab = Tab::new(id, view, label, url, is_private, profile);
        tab.loading = true;
        self.tabs.push(tab);
        let index = self.tabs.len() - 1;
        info!(tab = %id, url, private = is_private, "tab opened");

        self.publish(ShellUpdate::TabOpened {
            tab: id,
            index,
            label: label.to_string(),
        });
        self.activate(id);
        id
    }

    /// Moves a tab into the closed-tab slot. The last open tab stays open.
    fn close_tab(&mut self, tab_id: TabId) -> bool {
        if self.tabs.len() < 2 {
            debug!(tab = %tab_id, "refusing to close the last tab");
            return false;
        }
        let Some(index) = self.index_of(tab_id) else {
            debug!(tab = %tab_id, "close for a tab that is no longer open");
            return false;
        };

        let mut tab = self.tabs.remove(index);
        self.bus.unsubscribe(tab_id);
        tab.view.set_visible(false);
        info!(tab = %tab_id, label = %tab.label, "tab closed");
        if let Some(dropped) = self.last_closed.replace(tab) {
            debug!(tab = %dropped.id, "discarding earlier closed tab");
        }
        self.publish(ShellUpdate::TabClosed { tab: tab_id });

        if self.active == Some(tab_id) {
            self.active = None;
            let next = index.min(self.tabs.len() - 1);
            let next_id = self.tabs[next].id;
            self.activate(next_id);
        }
        true
    }

    /// Appends the buffered tab to the end of the strip without activating it.
    ///
    /// Signals the view sent while buffered were dropped, so its page is read
    /// back from the view and any pending load is treated as settled.
    fn reopen_last_closed(&mut self) -> Option<TabId> {
        let mut tab = self.last_closed.take()?;
        if let Some(url) = tab.view.current_url() {
            tab.current_url = url;
        }
        tab.loading = false;
        let id = tab.id;
        let label = tab.label.clone();
        self.bus.resubscribe(id);
        self.tabs.push(tab);
        info!(tab = %id, "tab reopened");
        self.publish(ShellUpdate::TabOpened {
            tab: id,
            index: self.tabs.len() - 1,
            label,
        });
        Some(id)
    }

    fn set_active(&mut self, tab_id: TabId) -> Result<(), TabError> {
        if self.index_of(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id));
        }
        self.activate(tab_id);
        Ok(())
    }

    /// Resolves address-bar input and loads it. Returns the URL dispatched.
    fn navigate(&mut self, tab_id: TabId, raw_input: &str) -> Option<String> {
        let url = resolve_input(raw_input)?;
        if self.load_into(tab_id, &url) {
            Some(url)
        } else {
            None
        }
    }

    /// Flips private mode for tabs opened from now on and rebinds the active
    /// tab's view to the matching profile. No tab's privacy flag changes.
    fn toggle_global_private_mode(&mut self) -> bool {
        let active = !self.session.private_mode_active();
        self.session.set_private_mode(active);

        let profile = self.profile_for(active);
        if let Some(tab_id) = self.active {
            if let Some(tab) = self.tab_mut(tab_id) {
                tab.view.rebind_profile(&profile);
                tab.profile = profile;
            }
        }
        info!(private = active, "private mode toggled");
        self.set_status(format!("Private Mode {}", if active { "On" } else { "Off" }));
        active
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn active_tab(&self) -> Option<TabSnapshot> {
        self.active
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
            .map(Tab::snapshot)
    }

    fn tabs(&self) -> Vec<TabSnapshot> {
        self.tabs.iter().map(Tab::snapshot).collect()
    }
}
