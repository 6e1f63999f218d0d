// Gove state managers
// Managers handle stateful operations: tabs, session state, downloads.

pub mod download_controller;
pub mod session_store;
pub mod tab_manager;
