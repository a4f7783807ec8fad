//! Default locations and `~` expansion for configured paths.

use std::env;
use std::path::{Path, PathBuf};

/// Home directory, falling back to `/tmp` when `HOME` is unset.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME").filter(|h| !h.is_empty()).map_or_else(
        || {
            eprintln!("[FRZ-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

/// `~/.config/frz`
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("frz")
}

/// `~/.local/share/frz`
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("frz")
}

/// Replace a leading `~` component with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    expand_home_with(path, home_dir)
}

fn expand_home_with(path: &Path, home: impl FnOnce() -> PathBuf) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}
