//! Path helpers

use std::path::PathBuf;

/// Expand a user-supplied path (config file locations).
///
/// `~` and `~/...` resolve against the home directory; relative paths
/// resolve against the current directory. Surrounding whitespace is
/// ignored and an empty string means the current directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = expand_tilde(path).unwrap_or_else(|| PathBuf::from(path));
    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

fn expand_tilde(path: &str) -> Option<PathBuf> {
    if path == "~" {
        return dirs::home_dir();
    }
    let rest = path.strip_prefix("~/")?;
    dirs::home_dir().map(|home| home.join(rest))
}
