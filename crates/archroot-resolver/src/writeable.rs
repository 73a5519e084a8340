use std::path::Path;

// Only the extant portion of `path` is checked. A failed access check counts as not writeable.
pub fn dir_writeable(path: &Path) -> bool {
    dir_writeable_with(path, is_writeable)
}

pub(crate) fn dir_writeable_with(path: &Path, access: impl Fn(&Path) -> bool) -> bool {
    access(nearest_existing_ancestor(path))
}

pub(crate) fn nearest_existing_ancestor(path: &Path) -> &Path {
    let mut current = path;
    while !current.exists() {
        let parent = match current.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => break,
        };

        // the filesystem root is its own parent
        if parent == current {
            break;
        }
        current = parent;
    }
    current
}

#[cfg(unix)]
fn is_writeable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writeable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|metadata| !metadata.permissions().readonly())
        .unwrap_or(false)
}
