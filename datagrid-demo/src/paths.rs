//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "datagrid";
const APPLICATION: &str = "datagrid-demo";

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory holding log files.
///
/// - Linux: `$XDG_CACHE_HOME/datagrid-demo` or `~/.cache/datagrid-demo`
/// - macOS: `~/Library/Caches/dev.datagrid.datagrid-demo`
/// - Windows: `C:\Users\<User>\AppData\Local\datagrid\datagrid-demo\cache`
///
/// Falls back to the working directory when no home directory is known.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn log_file() -> PathBuf {
    log_dir().join(LATEST_LOG)
}

/// Rename the previous run's log to a timestamped name and prune old ones.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let dir = log_dir();
    let latest = dir.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{timestamp}.log")));
    }

    cleanup_old_logs(&dir);
}

fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
