//! WebView engine adapter and window shell, built on `wry` + `tao`.
//!
//! Architecture:
//! - [`WryEngine`] implements [`ViewFactory`]; each tab gets one child WebView.
//! - WebView callbacks only emit typed events and wake the loop with
//!   `UserEvent::Pump`; the loop then pumps the tab manager and renders the
//!   drained [`ShellUpdate`]s.
//! - `SHORTCUTS_JS` runs on every page and posts toolbar commands over IPC.
//!   Address bar, security indicator and status text go to the window title.

use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::{Fullscreen, Window, WindowBuilder};
use tracing::{debug, info, warn};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::App;
use crate::engine::pending::PendingTransfers;
use crate::engine::{
    ContentView, DownloadEvent, DownloadRequest, EngineSink, ViewEvent, ViewEventSink,
    ViewFactory,
};
use crate::managers::download_controller::DownloadControllerTrait;
use crate::managers::session_store::SessionStoreTrait;
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::platform;
use crate::services::address::file_name_from_url;
use crate::services::settings_engine::SettingsEngine;
use crate::types::download::DownloadId;
use crate::types::profile::Profile;
use crate::types::shell::{Notice, ShellUpdate};
use crate::types::tab::TabId;

#[derive(Debug)]
enum UserEvent {
    /// An engine callback queued something on the bus.
    Pump,
    Command(ToolbarCommand),
}

/// Commands posted by `SHORTCUTS_JS`, as `{"cmd": "...", ...}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum ToolbarCommand {
    Navigate { input: String },
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    CloseTab,
    ReopenTab,
    NextTab,
    PreviousTab,
    Bookmark,
    TogglePrivate,
    OpenDownloads,
    ShowHistory,
    ShowBookmarks,
    /// Without an id, the most recently started running download.
    CancelDownload { id: Option<DownloadId> },
}

const SHORTCUTS_JS: &str = r#"
(function () {
  if (window.__gove) return;
  window.__gove = true;
  function send(msg) { window.ipc.postMessage(JSON.stringify(msg)); }
  document.addEventListener('fullscreenchange', function () {
    send({ cmd: 'fullscreen', on: !!document.fullscreenElement });
  });
  document.addEventListener('keydown', function (e) {
    var ctrl = e.ctrlKey || e.metaKey;
    var key = (e.key || '').toLowerCase();
    var msg = null;
    if (ctrl && e.shiftKey && key === 't') msg = { cmd: 'reopen_tab' };
    else if (ctrl && e.shiftKey && key === 'p') msg = { cmd: 'toggle_private' };
    else if (ctrl && e.shiftKey && key === 'tab') msg = { cmd: 'previous_tab' };
    else if (ctrl && e.shiftKey && key === 'o') msg = { cmd: 'show_bookmarks' };
    else if (ctrl && e.shiftKey && key === 'x') msg = { cmd: 'cancel_download' };
    else if (ctrl && key === 'tab') msg = { cmd: 'next_tab' };
    else if (ctrl && key === 't') msg = { cmd: 'new_tab' };
    else if (ctrl && key === 'w') msg = { cmd: 'close_tab' };
    else if (ctrl && key === 'd') msg = { cmd: 'bookmark' };
    else if (ctrl && key === 'j') msg = { cmd: 'open_downloads' };
    else if (ctrl && key === 'h') msg = { cmd: 'show_history' };
    else if (ctrl && key === 'r' || key === 'f5') msg = { cmd: 'reload' };
    else if (e.altKey && key === 'arrowleft') msg = { cmd: 'back' };
    else if (e.altKey && key === 'arrowright') msg = { cmd: 'forward' };
    else if (e.altKey && key === 'home') msg = { cmd: 'home' };
    else if (ctrl && key === 'l') {
      var input = window.prompt('Address', location.href);
      if (input !== null) msg = { cmd: 'navigate', input: input };
    }
    if (msg) { e.preventDefault(); e.stopPropagation(); send(msg); }
  }, true);
})();
"#;

fn wake(proxy: &EventLoopProxy<UserEvent>) {
    // Fails only once the loop has exited.
    let _ = proxy.send_event(UserEvent::Pump);
}

/// Progress box with a Cancel button, pinned to the page corner.
/// `__ID__` and `__LABEL__` are substituted per download.
const DOWNLOAD_BOX_JS: &str = r#"
(function () {
  var boxId = 'gove-dl-__ID__';
  var box = document.getElementById(boxId);
  if (!box) {
    box = document.createElement('div');
    box.id = boxId;
    box.style.cssText = 'position:fixed;right:16px;bottom:16px;z-index:2147483647;' +
      'background:#161b22;color:#e6edf3;font:13px monospace;padding:12px 14px;' +
      'border:1px solid #30363d;border-radius:8px;box-shadow:0 3px 6px rgba(0,0,0,.3)';
    var label = document.createElement('div');
    label.className = 'gove-dl-label';
    box.appendChild(label);
    var cancel = document.createElement('button');
    cancel.textContent = 'Cancel';
    cancel.style.marginTop = '8px';
    cancel.onclick = function () {
      window.ipc.postMessage(JSON.stringify({ cmd: 'cancel_download', id: '__ID__' }));
    };
    box.appendChild(cancel);
    (document.body || document.documentElement).appendChild(box);
  }
  box.querySelector('.gove-dl-label').textContent = __LABEL__;
})();
"#;

/// wry cannot abort a transfer; a cancelled file is deleted when it lands.
type PendingDownloads = Arc<Mutex<PendingTransfers>>;

/// Creates one child WebView per tab inside the shell window.
pub struct WryEngine {
    window: Rc<Window>,
    proxy: EventLoopProxy<UserEvent>,
    sink: Option<EngineSink>,
    pending: PendingDownloads,
}

impl WryEngine {
    fn new(window: Rc<Window>, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            window,
            proxy,
            sink: None,
            pending: Arc::new(Mutex::new(PendingTransfers::new())),
        }
    }
}

impl ViewFactory for WryEngine {
    type View = WryView;

    fn attach(&mut self, sink: EngineSink) {
        self.sink = Some(sink);
    }

    fn create_view(&mut self, tab: TabId, profile: &Profile, events: ViewEventSink) -> WryView {
        let context = ViewContext {
            window: self.window.clone(),
            proxy: self.proxy.clone(),
            events,
            downloads: self.sink.clone(),
            pending: self.pending.clone(),
        };
        let webview = match context.build(profile, None) {
            Ok(webview) => Some(webview),
            Err(err) => {
                warn!(%tab, error = %err, "failed to create webview");
                None
            }
        };
        WryView {
            tab,
            context,
            webview,
            visible: true,
        }
    }
}

/// Everything needed to (re)build a tab's WebView.
struct ViewContext {
    window: Rc<Window>,
    proxy: EventLoopProxy<UserEvent>,
    events: ViewEventSink,
    downloads: Option<EngineSink>,
    pending: PendingDownloads,
}

impl ViewContext {
    fn build(&self, profile: &Profile, url: Option<&str>) -> Result<WebView, Box<dyn Error>> {
        let mut builder = WebViewBuilder::new()
            .with_incognito(profile.is_ephemeral())
            .with_user_agent(&profile.user_agent)
            .with_initialization_script(SHORTCUTS_JS)
            .with_devtools(cfg!(debug_assertions));
        if let Some(url) = url {
            builder = builder.with_url(url);
        }

        let (events, proxy) = (self.events.clone(), self.proxy.clone());
        builder = builder.with_on_page_load_handler(move |event, url| {
            match event {
                PageLoadEvent::Started => events.emit(ViewEvent::UrlChanged(url)),
                PageLoadEvent::Finished => events.emit(ViewEvent::LoadFinished { ok: true }),
            }
            wake(&proxy);
        });

        let (events, proxy) = (self.events.clone(), self.proxy.clone());
        builder = builder.with_document_title_changed_handler(move |title| {
            events.emit(ViewEvent::TitleChanged(title));
            wake(&proxy);
        });

        let (events, proxy) = (self.events.clone(), self.proxy.clone());
        builder = builder.with_ipc_handler(move |request: wry::http::Request<String>| {
            handle_ipc(request.body(), &events, &proxy);
        });

        if let Some(sink) = self.downloads.clone() {
            builder = self.with_download_handlers(builder, sink, profile.download_dir.clone());
        }

        #[cfg(target_os = "linux")]
        {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = self
                .window
                .default_vbox()
                .ok_or("window has no GTK container")?;
            Ok(builder.build_gtk(vbox)?)
        }

        #[cfg(not(target_os = "linux"))]
        {
            let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
            Ok(builder
                .with_bounds(full_bounds(size))
                .build_as_child(self.window.as_ref())?)
        }
    }

    fn with_download_handlers<'a>(
        &self,
        builder: WebViewBuilder<'a>,
        sink: EngineSink,
        download_dir: Option<PathBuf>,
    ) -> WebViewBuilder<'a> {
        let (started_sink, pending, proxy) = (sink.clone(), self.pending.clone(), self.proxy.clone());
        let builder = builder.with_download_started_handler(move |url: String, path: &mut PathBuf| {
            if let Some(dir) = &download_dir {
                *path = dir.join(file_name_from_url(&url));
            }
            let id = DownloadId::new();
            let Ok(mut pending) = pending.lock() else {
                warn!(url = %url, "download ledger unavailable, refusing download");
                return false;
            };
            let handle = pending.start(&url, id, Some(path.clone()));
            drop(pending);
            info!(%id, url = %url, path = %path.display(), "download started");
            started_sink.download(DownloadEvent::Requested(DownloadRequest {
                id,
                source_url: url,
                path: Some(path.clone()),
                handle: Box::new(handle),
            }));
            wake(&proxy);
            true
        });

        let (pending, proxy) = (self.pending.clone(), self.proxy.clone());
        builder.with_download_completed_handler(move |url: String, path: Option<PathBuf>, success: bool| {
            let transfer = pending
                .lock()
                .ok()
                .and_then(|mut p| p.complete(&url, path.as_deref()));
            let Some(download) = transfer else {
                debug!(url = %url, "completion for an unknown download");
                return;
            };
            if download.is_cancelled() {
                if let Some(path) = &path {
                    if let Err(err) = std::fs::remove_file(path) {
                        debug!(path = %path.display(), error = %err, "could not remove cancelled download");
                    }
                }
            }
            let id = download.id;
            sink.download(if success {
                DownloadEvent::Finished { id }
            } else {
                DownloadEvent::Failed {
                    id,
                    reason: "The download did not complete.".to_string(),
                }
            });
            wake(&proxy);
        })
    }
}

#[cfg(not(target_os = "linux"))]
fn full_bounds(size: tao::dpi::LogicalSize<f64>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::LogicalPosition::new(0.0, 0.0).into(),
        size: wry::dpi::LogicalSize::new(size.width, size.height).into(),
    }
}

/// Fullscreen changes belong to the page's tab; everything else is a shell command.
fn handle_ipc(body: &str, events: &ViewEventSink, proxy: &EventLoopProxy<UserEvent>) {
    let Ok(msg) = serde_json::from_str::<serde_json::Value>(body) else {
        debug!(body, "ignoring malformed ipc message");
        return;
    };
    if msg.get("cmd").and_then(|c| c.as_str()) == Some("fullscreen") {
        let on = msg.get("on").and_then(|v| v.as_bool()).unwrap_or(false);
        events.emit(ViewEvent::FullscreenRequested(on));
        wake(proxy);
        return;
    }
    match serde_json::from_value::<ToolbarCommand>(msg) {
        Ok(command) => {
            let _ = proxy.send_event(UserEvent::Command(command));
        }
        Err(err) => debug!(error = %err, "unknown toolbar command"),
    }
}

/// One tab's WebView. `None` when the engine refused to create it.
pub struct WryView {
    tab: TabId,
    context: ViewContext,
    webview: Option<WebView>,
    visible: bool,
}

impl WryView {
    fn eval(&self, script: &str) {
        if let Some(webview) = &self.webview {
            if let Err(err) = webview.evaluate_script(script) {
                debug!(tab = %self.tab, error = %err, "script failed");
            }
        }
    }

    /// Shows a blocking notice inside the page.
    fn alert(&self, notice: &Notice) {
        let text = format!("{}\n\n{}", notice.title, notice.message);
        if let Ok(literal) = serde_json::to_string(&text) {
            self.eval(&format!("window.alert({})", literal));
        }
    }

    fn show_download(&self, id: DownloadId, label: &str) {
        if let Ok(literal) = serde_json::to_string(label) {
            let id = id.to_string();
            self.eval(
                &DOWNLOAD_BOX_JS
                    .replace("__ID__", &id)
                    .replace("__LABEL__", &literal),
            );
        }
    }

    fn hide_download(&self, id: DownloadId) {
        self.eval(&format!(
            "(function(){{var b=document.getElementById('gove-dl-{}');if(b)b.remove();}})()",
            id
        ));
    }

    #[cfg(not(target_os = "linux"))]
    fn fit(&self, size: tao::dpi::LogicalSize<f64>) {
        if let Some(webview) = &self.webview {
            let _ = webview.set_bounds(full_bounds(size));
        }
    }
}

impl ContentView for WryView {
    fn load(&mut self, url: &str) {
        if let Some(webview) = &self.webview {
            if let Err(err) = webview.load_url(url) {
                warn!(tab = %self.tab, url, error = %err, "load failed");
            }
        }
    }

    fn back(&mut self) {
        self.eval("history.back()");
    }

    fn forward(&mut self) {
        self.eval("history.forward()");
    }

    fn reload(&mut self) {
        self.eval("location.reload()");
    }

    /// WebViews cannot switch data stores in place, so the view is rebuilt on
    /// the new profile at the same page.
    fn rebind_profile(&mut self, profile: &Profile) {
        let url = self.webview.as_ref().and_then(|w| w.url().ok());
        self.webview = None;
        match self.context.build(profile, url.as_deref()) {
            Ok(webview) => {
                let _ = webview.set_visible(self.visible);
                self.webview = Some(webview);
            }
            Err(err) => warn!(tab = %self.tab, error = %err, "failed to rebuild webview"),
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(webview) = &self.webview {
            let _ = webview.set_visible(visible);
        }
    }

    fn current_url(&self) -> Option<String> {
        self.webview.as_ref().and_then(|w| w.url().ok())
    }
}

// ─── Shell ───

fn apply_command(tm: &mut TabManager<WryEngine>, command: ToolbarCommand) {
    debug!(?command, "toolbar command");
    let active = tm.active_id();
    match command {
        ToolbarCommand::Navigate { input } => {
            tm.navigate_active(&input);
        }
        ToolbarCommand::Back => {
            if let Some(id) = active {
                tm.back(id);
            }
        }
        ToolbarCommand::Forward => {
            if let Some(id) = active {
                tm.forward(id);
            }
        }
        ToolbarCommand::Reload => {
            if let Some(id) = active {
                tm.reload(id);
            }
        }
        ToolbarCommand::Home => {
            if let Some(id) = active {
                tm.navigate_home(id);
            }
        }
        ToolbarCommand::NewTab => {
            tm.new_tab();
        }
        ToolbarCommand::CloseTab => {
            if let Some(id) = active {
                tm.close_tab(id);
            }
        }
        ToolbarCommand::ReopenTab => {
            tm.reopen_last_closed();
        }
        ToolbarCommand::NextTab | ToolbarCommand::PreviousTab => {
            let count = tm.tab_count();
            if let Some(index) = tm.active_index().filter(|_| count > 1) {
                let next = match command {
                    ToolbarCommand::NextTab => (index + 1) % count,
                    _ => (index + count - 1) % count,
                };
                if let Some(id) = tm.tab_at(next) {
                    let _ = tm.set_active(id);
                }
            }
        }
        ToolbarCommand::Bookmark => {
            tm.bookmark_active();
        }
        ToolbarCommand::TogglePrivate => {
            tm.toggle_global_private_mode();
        }
        ToolbarCommand::ShowHistory => tm.show_history(),
        ToolbarCommand::ShowBookmarks => tm.show_bookmarks(),
        ToolbarCommand::CancelDownload { id } => {
            if let Some(id) = id.or_else(|| tm.latest_in_progress_download()) {
                tm.cancel_download(id);
            }
        }
        ToolbarCommand::OpenDownloads => {
            let Some(id) = tm.session().downloads().last().map(|d| d.id) else {
                return;
            };
            if let Ok(dir) = tm.open_download_folder(id) {
                if let Err(err) = platform::open_folder(&dir) {
                    warn!(dir = %dir.display(), error = %err, "could not open folder");
                }
            }
        }
    }
}

fn render(window: &Window, tm: &mut TabManager<WryEngine>) {
    let updates = tm.drain_updates();
    if updates.is_empty() {
        return;
    }
    for update in updates {
        match update {
            ShellUpdate::Fullscreen(on) => {
                window.set_fullscreen(on.then_some(Fullscreen::Borderless(None)));
            }
            ShellUpdate::Notice(notice) => {
                info!(title = %notice.title, message = %notice.message, "notice");
                if let Some(view) = tm.active_id().and_then(|id| tm.view(id)) {
                    view.alert(&notice);
                }
            }
            ShellUpdate::DownloadStarted { id, .. } | ShellUpdate::DownloadProgress { id, .. } => {
                let label = tm.downloads().get(id).map(|d| d.progress_label());
                if let (Some(label), Some(view)) = (label, tm.active_id().and_then(|a| tm.view(a))) {
                    view.show_download(id, &label);
                }
            }
            ShellUpdate::DownloadEnded { id, state } => {
                info!(%id, ?state, "download ended");
                for tab in tm.tabs() {
                    if let Some(view) = tm.view(tab.id) {
                        view.hide_download(id);
                    }
                }
            }
            _ => {}
        }
    }

    let running = tm
        .latest_in_progress_download()
        .and_then(|id| tm.downloads().get(id))
        .map(|d| format!(" | {}", d.progress_label()))
        .unwrap_or_default();

    let chrome = tm.chrome();
    let position = match (tm.active_index(), tm.tab_count()) {
        (Some(i), n) if n > 1 => format!(" [{}/{}]", i + 1, n),
        _ => String::new(),
    };
    let private = if tm.session().private_mode_active() { " (Private)" } else { "" };
    window.set_title(&format!(
        "{}{}{} | {} {} | {}{}",
        chrome.title,
        position,
        private,
        chrome.secure_label(),
        chrome.url,
        chrome.status,
        running
    ));
}

// ─── Main entry point ───

pub fn run(
    settings_engine: SettingsEngine,
    url: Option<String>,
    private: bool,
) -> Result<(), Box<dyn Error>> {
    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = Rc::new(
        WindowBuilder::new()
            .with_title("Gove")
            .with_inner_size(tao::dpi::LogicalSize::new(1280.0, 800.0))
            .build(&event_loop)?,
    );

    let mut app = App::new(WryEngine::new(window.clone(), proxy), settings_engine);
    app.startup(url.as_deref(), private);
    app.tab_manager.pump();
    render(&window, &mut app.tab_manager);

    let mut app = Some(app);
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        let Some(running) = app.as_mut() else {
            return;
        };

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Some(app) = app.take() {
                    app.shutdown();
                }
                *control_flow = ControlFlow::Exit;
                return;
            }
            #[cfg(not(target_os = "linux"))]
            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => {
                let size = size.to_logical::<f64>(window.scale_factor());
                let tm = &running.tab_manager;
                for tab in tm.tabs() {
                    if let Some(view) = tm.view(tab.id) {
                        view.fit(size);
                    }
                }
            }
            Event::UserEvent(UserEvent::Command(command)) => {
                apply_command(&mut running.tab_manager, command);
            }
            Event::UserEvent(UserEvent::Pump) => {}
            _ => return,
        }

        running.tab_manager.pump();
        render(&window, &mut running.tab_manager);
    });
}
