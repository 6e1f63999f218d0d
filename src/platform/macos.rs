// Gove platform paths for macOS
// Config:    ~/Library/Application Support/Gove
// Downloads: ~/Downloads

use std::env;
use std::path::PathBuf;

/// Returns the home directory on macOS.
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// `~/Library/Application Support/Gove`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("Gove")
}

pub fn get_download_dir() -> PathBuf {
    home_dir().join("Downloads")
}
