// Gove platform paths for Linux
// Config:    ~/.config/gove
// Downloads: $XDG_DOWNLOAD_DIR or ~/Downloads

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn config_dir_from(xdg_config_home: Option<String>, home: PathBuf) -> PathBuf {
    match xdg_config_home {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("gove"),
        _ => home.join(".config").join("gove"),
    }
}

fn download_dir_from(xdg_download_dir: Option<String>, home: PathBuf) -> PathBuf {
    match xdg_download_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home.join("Downloads"),
    }
}

/// Uses `$XDG_CONFIG_HOME/gove` if set, otherwise `~/.config/gove`.
pub fn get_config_dir() -> PathBuf {
    config_dir_from(env::var("XDG_CONFIG_HOME").ok(), home_dir())
}

pub fn get_download_dir() -> PathBuf {
    download_dir_from(env::var("XDG_DOWNLOAD_DIR").ok(), home_dir())
}
