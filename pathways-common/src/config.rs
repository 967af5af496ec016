//! Database path resolution
//!
//! Runtime configuration lives in the database (settings table); this module
//! only resolves where that database is. Priority order:
//! 1. Command-line argument (highest priority)
//! 2. `PATHWAYS_DATABASE` environment variable
//! 3. OS-dependent compiled default (fallback)

use std::path::PathBuf;

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "PATHWAYS_DATABASE";

/// Resolve the SQLite database path for a service
pub fn resolve_database_path(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: OS-dependent compiled default
    default_data_dir().join("pathways.db")
}

/// Get OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/pathways (or /var/lib/pathways for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("pathways"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/pathways"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/pathways
        dirs::data_dir()
            .map(|d| d.join("pathways"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/pathways"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\pathways
        dirs::data_local_dir()
            .map(|d| d.join("pathways"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\pathways"))
    } else {
        PathBuf::from("./pathways_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let path = resolve_database_path(Some("/tmp/override.db"));
        assert_eq!(path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_default_data_dir_is_nonempty() {
        let dir = default_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
