// Platform paths for the workspace engine's settings file and database.
//
// - Linux:   $XDG_CONFIG_HOME/crm-workspace, $XDG_DATA_HOME/crm-workspace
// - macOS:   ~/Library/Application Support/CrmWorkspace (both)
// - Windows: %APPDATA%/CrmWorkspace (both)
//
// `CRM_WORKSPACE_DATA_DIR` overrides the data directory on every platform.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CRM_WORKSPACE_DATA_DIR";

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const APP_DIR_NAME: &str = "crm-workspace";
#[cfg(any(target_os = "macos", target_os = "windows"))]
const APP_DIR_NAME: &str = "CrmWorkspace";

#[cfg_attr(target_os = "windows", allow(dead_code))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR_NAME)
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR_NAME)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR_NAME),
            Err(_) => home_dir().join(".config").join(APP_DIR_NAME),
        }
    }
}

/// Directory holding the workspace database.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join(APP_DIR_NAME),
            Err(_) => home_dir().join(".local").join("share").join(APP_DIR_NAME),
        }
    }
}
