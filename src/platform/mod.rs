// Gove platform abstraction
// Platform-specific directories and the "open folder" affordance for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for Gove.
///
/// - **Linux**: `~/.config/gove` (or `$XDG_CONFIG_HOME/gove`)
/// - **macOS**: `~/Library/Application Support/Gove`
/// - **Windows**: `%APPDATA%/Gove`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory the shared profile saves downloads into by default.
///
/// - **Linux**: `$XDG_DOWNLOAD_DIR` or `~/Downloads`
/// - **macOS**: `~/Downloads`
/// - **Windows**: `%USERPROFILE%/Downloads`
pub fn get_download_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_download_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_download_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_download_dir()
    }
}

/// Opens `dir` in the platform file manager without waiting for it.
pub fn open_folder(dir: &Path) -> io::Result<()> {
    #[cfg(target_os = "linux")]
    let program = "xdg-open";
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(target_os = "windows")]
    let program = "explorer";

    Command::new(program).arg(dir).spawn().map(|_| ())
}
