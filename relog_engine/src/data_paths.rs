//! Where rule set overrides are looked up.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Environment variable that pins the data directory.
pub const DATA_DIR_VAR: &str = "RELOG_DATA_DIR";
/// File name of a rule set override inside the data directory.
pub const RULES_FILE: &str = "rules.toml";

static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
    let pinned = env::var_os(DATA_DIR_VAR).map(PathBuf::from);
    resolve_data_root(pinned, default_candidates())
});

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Location of the rule set override, whether or not it exists.
pub fn rules_file() -> PathBuf {
    data_path(RULES_FILE)
}

fn default_candidates() -> Vec<PathBuf> {
    // run from the workspace root, from the engine crate, or next to the binary
    let mut candidates = vec![PathBuf::from("relog_engine/data"), PathBuf::from("data")];
    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("data"));
        }
    }
    candidates
}

/// A pinned directory always wins, even if it does not exist yet; otherwise
/// the first existing candidate is used.
fn resolve_data_root(pinned: Option<PathBuf>, candidates: Vec<PathBuf>) -> PathBuf {
    if let Some(dir) = pinned.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}
