//! In-process engine with no rendering.
//!
//! Views keep their own back/forward list and answer every load with the
//! url/title/load-finished signals a real engine would send. The console shell
//! runs on it, and tests use the shared [`HeadlessEngine`] handle to inspect
//! the commands views received and to inject engine signals.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use url::Url;

use super::{
    ContentView, DownloadEvent, DownloadHandle, DownloadRequest, EngineSink, ViewEvent,
    ViewEventSink, ViewFactory,
};
use crate::types::download::DownloadId;
use crate::types::profile::{Profile, ProfileKind};
use crate::types::tab::TabId;

/// A command a headless view received.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    Load(String),
    Back,
    Forward,
    Reload,
    Rebind(ProfileKind),
    Show(bool),
}

#[derive(Default)]
struct EngineState {
    sink: Option<EngineSink>,
    commands: Vec<(TabId, ViewCommand)>,
    cancel_flags: HashMap<DownloadId, Arc<AtomicBool>>,
}

/// Cloneable handle to the headless engine; every clone shares state.
#[derive(Clone)]
pub struct HeadlessEngine {
    state: Rc<RefCell<EngineState>>,
    echo: bool,
}

impl HeadlessEngine {
    /// Views answer loads with navigation signals.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState::default())),
            echo: true,
        }
    }

    /// Views only record commands; signals must be injected by the caller.
    pub fn silent() -> Self {
        Self {
            echo: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> Vec<(TabId, ViewCommand)> {
        self.state.borrow().commands.clone()
    }

    pub fn commands_for(&self, tab: TabId) -> Vec<ViewCommand> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter(|(t, _)| *t == tab)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Urls loaded into the given tab, in order.
    pub fn loads_for(&self, tab: TabId) -> Vec<String> {
        self.commands_for(tab)
            .into_iter()
            .filter_map(|c| match c {
                ViewCommand::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Sends a view signal as if the engine raised it for `tab`.
    pub fn emit_view(&self, tab: TabId, event: ViewEvent) {
        if let Some(sink) = &self.state.borrow().sink {
            sink.for_tab(tab).emit(event);
        }
    }

    /// Starts a transfer at profile level and returns its id.
    pub fn start_download(&self, url: &str, path: Option<PathBuf>) -> DownloadId {
        let id = DownloadId::new();
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut state = self.state.borrow_mut();
        state.cancel_flags.insert(id, cancelled.clone());
        if let Some(sink) = &state.sink {
            sink.download(DownloadEvent::Requested(DownloadRequest {
                id,
                source_url: url.to_string(),
                path,
                handle: Box::new(HeadlessDownload { cancelled }),
            }));
        }
        id
    }

    pub fn report_progress(&self, id: DownloadId, percent: i32) {
        self.send_download(DownloadEvent::Progress { id, percent });
    }

    pub fn finish_download(&self, id: DownloadId) {
        self.send_download(DownloadEvent::Finished { id });
    }

    pub fn fail_download(&self, id: DownloadId, reason: &str) {
        self.send_download(DownloadEvent::Failed {
            id,
            reason: reason.to_string(),
        });
    }

    /// Whether the download's handle received a cancel request.
    pub fn was_cancelled(&self, id: DownloadId) -> bool {
        self.state
            .borrow()
            .cancel_flags
            .get(&id)
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn send_download(&self, event: DownloadEvent) {
        if let Some(sink) = &self.state.borrow().sink {
            sink.download(event);
        }
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFactory for HeadlessEngine {
    type View = HeadlessView;

    fn attach(&mut self, sink: EngineSink) {
        self.state.borrow_mut().sink = Some(sink);
    }

    fn create_view(&mut self, tab: TabId, profile: &Profile, events: ViewEventSink) -> HeadlessView {
        HeadlessView {
            tab,
            events,
            state: self.state.clone(),
            echo: self.echo,
            profile: profile.kind,
            visited: Vec::new(),
            cursor: 0,
        }
    }
}

struct HeadlessDownload {
    cancelled: Arc<AtomicBool>,
}

impl DownloadHandle for HeadlessDownload {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

pub struct HeadlessView {
    tab: TabId,
    events: ViewEventSink,
    state: Rc<RefCell<EngineState>>,
    echo: bool,
    profile: ProfileKind,
    visited: Vec<String>,
    cursor: usize,
}

impl HeadlessView {
    pub fn profile_kind(&self) -> ProfileKind {
        self.profile
    }

    fn record(&self, command: ViewCommand) {
        self.state.borrow_mut().commands.push((self.tab, command));
    }

    fn show_current(&self) {
        if !self.echo {
            return;
        }
        if let Some(url) = self.visited.get(self.cursor) {
            self.events.emit(ViewEvent::UrlChanged(url.clone()));
            self.events.emit(ViewEvent::TitleChanged(page_title(url)));
            self.events.emit(ViewEvent::LoadFinished { ok: true });
        }
    }
}

impl ContentView for HeadlessView {
    fn load(&mut self, url: &str) {
        self.record(ViewCommand::Load(url.to_string()));
        if !self.visited.is_empty() {
            self.visited.truncate(self.cursor + 1);
        }
        self.visited.push(url.to_string());
        self.cursor = self.visited.len() - 1;
        self.show_current();
    }

    fn back(&mut self) {
        self.record(ViewCommand::Back);
        if self.cursor > 0 {
            self.cursor -= 1;
            self.show_current();
        }
    }

    fn forward(&mut self) {
        self.record(ViewCommand::Forward);
        if self.cursor + 1 < self.visited.len() {
            self.cursor += 1;
            self.show_current();
        }
    }

    fn reload(&mut self) {
        self.record(ViewCommand::Reload);
        self.show_current();
    }

    fn rebind_profile(&mut self, profile: &Profile) {
        self.record(ViewCommand::Rebind(profile.kind));
        self.profile = profile.kind;
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(ViewCommand::Show(visible));
    }

    fn current_url(&self) -> Option<String> {
        self.visited.get(self.cursor).cloned()
    }
}

/// Host name stands in for the document title.
fn page_title(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
