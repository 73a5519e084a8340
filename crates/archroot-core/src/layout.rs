use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::archive::{resolve_archive_path, ArchiveRef};

pub const SITE_PACKAGES: &str = "site-packages";

pub trait CacheLayout {
    fn cache_path(&self, archive: &dyn ArchiveRef, root: &Path, build_id: &str) -> PathBuf;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildCacheLayout;

impl CacheLayout for BuildCacheLayout {
    fn cache_path(&self, archive: &dyn ArchiveRef, root: &Path, build_id: &str) -> PathBuf {
        let filename = archive.filename();
        let resolved = resolve_archive_path(filename).unwrap_or_else(|_| filename.to_path_buf());
        let mut name = resolved.file_name().map(OsStr::to_os_string).unwrap_or_default();
        name.push("_");
        name.push(build_id);
        root.join(name)
    }
}

pub fn site_packages_dir(cache: &Path) -> PathBuf {
    cache.join(SITE_PACKAGES)
}
