//! Gove window shell.
//!
//! Uses `wry` for the content views and `tao` for the window and event loop:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! Every tab is its own WebView inside the single window; only the active one
//! is visible. Keyboard shortcuts are injected into each page and reach the
//! shell through wry IPC.

pub mod webview_app;
