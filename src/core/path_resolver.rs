//! Source path resolution
//!
//! Maps absolute call-site paths to paths relative to a detected project
//! root. The root is found once by walking upward from the current working
//! directory looking for a `Cargo.toml` marker, then cached for the process
//! lifetime.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Marker file whose presence identifies the project root.
const ROOT_MARKER: &str = "Cargo.toml";

/// Upper bound on the number of parent directories inspected.
const MAX_SEARCH_DEPTH: usize = 16;

static PROJECT_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// The cached project root. Computed at most once; concurrent first callers
/// all observe the same value.
pub fn project_root() -> &'static Path {
    PROJECT_ROOT.get_or_init(|| {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        find_root_from(&cwd, ROOT_MARKER).unwrap_or(cwd)
    })
}

/// Walk upward from `start` looking for a directory containing `marker`.
/// Gives up after [`MAX_SEARCH_DEPTH`] parent levels.
pub(crate) fn find_root_from(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut current = start;
    for _ in 0..=MAX_SEARCH_DEPTH {
        if current.join(marker).exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
    None
}

/// Resolve a call-site path against the cached project root.
pub fn resolve(path: &Path) -> String {
    relative_to_root(path, project_root())
}

/// Render `path` relative to `root` with forward slashes and a `./` prefix.
/// Paths not under the root are returned unchanged; already relative paths
/// (as produced by `Location::caller()` for workspace files) pass through
/// with the prefix applied.
pub(crate) fn relative_to_root(path: &Path, root: &Path) -> String {
    if path.is_relative() {
        return prefixed(path);
    }
    match path.strip_prefix(root) {
        Ok(rel) => prefixed(rel),
        Err(_) => path.display().to_string(),
    }
}

fn prefixed(rel: &Path) -> String {
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("./{}", joined)
}
