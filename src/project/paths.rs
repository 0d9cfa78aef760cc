//! Lexical path helpers
//!
//! None of these touch the filesystem: xmake reports paths for files that may
//! not exist yet (generated sources) and the project tree only needs their
//! textual structure.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `..` into the preceding component
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }

    result
}

/// Resolve `path` against `base` when it is relative
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Parent directory, or an empty path when there is none
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Deepest path that is an ancestor of (or equal to) both arguments
pub fn common_path(a: &Path, b: &Path) -> PathBuf {
    a.components()
        .zip(b.components())
        .take_while(|(left, right)| left == right)
        .map(|(component, _)| component)
        .collect()
}

/// Deepest directory containing every path of the bucket
///
/// The first path seeds the result with its parent directory; each following
/// path narrows it to the common ancestor with that path's directory. Returns
/// an empty path for an empty bucket or when the paths share nothing.
pub fn common_base_directory<I, P>(paths: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut base: Option<PathBuf> = None;

    for path in paths {
        let directory = parent_dir(path.as_ref());
        base = Some(match base {
            None => directory,
            Some(current) => common_path(&current, &directory),
        });
    }

    base.unwrap_or_default()
}

/// Whether the path has no components at all
pub fn is_empty(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
