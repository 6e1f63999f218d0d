//! Gove: a tabbed desktop browser shell.
//!
//! With the `gui` feature this opens a window backed by the system WebView.
//! Without it, a console session runs against the headless engine and prints
//! what a shell would have displayed.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use gove::logging;
use gove::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

#[derive(Parser, Debug)]
#[command(name = "gove", version, about = "A tabbed desktop browser shell")]
struct Args {
    /// Address to open in the first tab instead of the homepage
    url: Option<String>,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with private mode on
    #[arg(long)]
    private: bool,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long)]
    verbose: bool,

    /// Change a setting and save it, e.g. --set homepage='"https://example.com"'
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // The log filter lives in the settings file, so the subscriber can only be
    // installed once it is read.
    let mut settings_engine = SettingsEngine::new(args.config.clone());
    let settings = settings_engine.load()?;
    logging::init_logging(&settings.log_filter, args.verbose);
    tracing::info!(
        path = %settings_engine.get_config_path().display(),
        filter = %settings.log_filter,
        "settings loaded"
    );

    for pair in &args.overrides {
        apply_override(&mut settings_engine, pair)?;
    }

    run(args, settings_engine)
}

/// `KEY=VALUE`, where VALUE is JSON or else taken as a plain string.
fn apply_override(engine: &mut SettingsEngine, pair: &str) -> Result<(), Box<dyn Error>> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    engine.set_value(key.trim(), value)?;
    Ok(())
}

#[cfg(feature = "gui")]
fn run(args: Args, settings_engine: SettingsEngine) -> Result<(), Box<dyn Error>> {
    gove::ui::webview_app::run(settings_engine, args.url, args.private)
}

#[cfg(not(feature = "gui"))]
fn run(args: Args, settings_engine: SettingsEngine) -> Result<(), Box<dyn Error>> {
    use gove::app::App;
    use gove::engine::headless::HeadlessEngine;
    use gove::managers::tab_manager::TabManagerTrait;

    let engine = HeadlessEngine::new();
    let mut app = App::new(engine.clone(), settings_engine);

    println!();
    println!("Gove v{} (console mode)", env!("CARGO_PKG_VERSION"));
    println!();

    section("Startup");
    app.startup(args.url.as_deref(), args.private);
    app.tab_manager.pump();
    print_updates(&mut app);

    section("Browsing");
    let tm = &mut app.tab_manager;
    let docs = tm.new_tab();
    tm.navigate(docs, "doc.rust-lang.org");
    tm.pump();
    tm.bookmark_active();
    tm.bookmark_active();
    print_updates(&mut app);

    section("Close and reopen");
    let tm = &mut app.tab_manager;
    tm.close_tab(docs);
    tm.reopen_last_closed();
    tm.reopen_last_closed();
    tm.pump();
    print_updates(&mut app);

    section("Download");
    let id = engine.start_download("https://example.com/files/report.pdf", None);
    engine.report_progress(id, 40);
    engine.report_progress(id, 140);
    engine.finish_download(id);
    app.tab_manager.pump();
    print_updates(&mut app);

    section("State");
    let tm = &app.tab_manager;
    for (i, tab) in tm.tabs().iter().enumerate() {
        let marker = if Some(i) == tm.active_index() { "*" } else { " " };
        let private = if tab.is_private { " (private)" } else { "" };
        println!("  {} [{}] {} - {}{}", marker, i, tab.label, tab.url, private);
    }
    let chrome = tm.chrome();
    println!("  Address bar: {} [{}]", chrome.url, chrome.secure_label());
    println!();

    section("History and bookmarks");
    app.tab_manager.show_history();
    app.tab_manager.show_bookmarks();
    print_updates(&mut app);

    let summary = app.shutdown();
    println!(
        "  Session discarded: {} visits, {} bookmarks, {} downloads",
        summary.history, summary.bookmarks, summary.downloads
    );
    println!();
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("─── {} ───", name);
}

#[cfg(not(feature = "gui"))]
fn print_updates(app: &mut gove::app::App<gove::engine::headless::HeadlessEngine>) {
    use gove::types::shell::ShellUpdate;

    for update in app.tab_manager.drain_updates() {
        let line = match update {
            ShellUpdate::Chrome(c) => format!("address bar: {} [{}]", c.url, c.secure_label()),
            ShellUpdate::TabOpened { index, label, .. } => format!("tab opened at {}: {}", index, label),
            ShellUpdate::TabClosed { tab } => format!("tab closed: {}", tab),
            ShellUpdate::TabLabel { label, .. } => format!("tab label: {}", label),
            ShellUpdate::ActiveChanged { index, .. } => format!("active tab: {}", index),
            ShellUpdate::Status(s) => format!("status: {}", s),
            ShellUpdate::Fullscreen(on) => format!("fullscreen: {}", on),
            ShellUpdate::DownloadStarted { file_name, .. } => format!("downloading {}", file_name),
            ShellUpdate::DownloadProgress { percent, .. } => format!("download {}%", percent),
            ShellUpdate::DownloadEnded { state, .. } => format!("download ended: {:?}", state),
            ShellUpdate::Notice(n) => format!("[{:?}] {}: {}", n.level, n.title, n.message),
        };
        println!("  {}", line);
    }
    println!();
}
