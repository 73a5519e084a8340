use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use archroot_core::{resolve_archive_path, site_packages_dir, ArchiveRef, CacheLayout, ProcessEnv};

use crate::classify::{system_path_on, PathClass, Platform};
use crate::writeable::dir_writeable;

pub const DEFAULT_SYSTEM_BASE: &str = "/var/cache";

// The user base stays unset when the environment names no cache home; it is
// only required once the user tier is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootBases {
    pub system_base: PathBuf,
    pub user_base: Option<PathBuf>,
}

impl RootBases {
    pub fn new(system_base: impl Into<PathBuf>, user_base: impl Into<PathBuf>) -> Self {
        Self {
            system_base: system_base.into(),
            user_base: Some(user_base.into()),
        }
    }

    pub fn from_env(config: &ProcessEnv) -> Self {
        Self {
            system_base: PathBuf::from(DEFAULT_SYSTEM_BASE),
            user_base: default_user_base(config),
        }
    }

    pub fn user_base(&self) -> Result<&Path> {
        self.user_base
            .as_deref()
            .context("neither XDG_CACHE_HOME nor HOME is set; cannot resolve user cache base")
    }
}

pub fn default_user_base(config: &ProcessEnv) -> Option<PathBuf> {
    if let Some(cache_home) = config.get_non_empty("XDG_CACHE_HOME") {
        return Some(PathBuf::from(cache_home));
    }
    config
        .get_non_empty("HOME")
        .map(|home| PathBuf::from(home).join(".cache"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTier {
    System,
    User,
}

impl RootTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    pub tier: RootTier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCandidate {
    pub root: PathBuf,
    pub cache: PathBuf,
    pub site_packages_present: bool,
    pub cache_writeable: bool,
}

impl SystemCandidate {
    pub fn usable(&self) -> bool {
        self.site_packages_present || self.cache_writeable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPlan {
    pub archive_path: PathBuf,
    pub platform: Platform,
    pub class: PathClass,
    pub system: Option<SystemCandidate>,
    pub resolved: ResolvedRoot,
}

pub fn custom_root(
    archive: &dyn ArchiveRef,
    build_id: &str,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<ResolvedRoot> {
    custom_root_on(Platform::current(), archive, build_id, bases, layout)
}

pub fn custom_root_on(
    platform: Platform,
    archive: &dyn ArchiveRef,
    build_id: &str,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<ResolvedRoot> {
    plan_root_on(platform, archive, build_id, bases, layout).map(|plan| plan.resolved)
}

pub fn plan_root_on(
    platform: Platform,
    archive: &dyn ArchiveRef,
    build_id: &str,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<RootPlan> {
    plan_root_with(platform, archive, build_id, bases, layout, &dir_writeable)
}

// `writeable` decides whether the system cache may be created; `dir_writeable` in production.
pub fn plan_root_with(
    platform: Platform,
    archive: &dyn ArchiveRef,
    build_id: &str,
    bases: &RootBases,
    layout: &dyn CacheLayout,
    writeable: &dyn Fn(&Path) -> bool,
) -> Result<RootPlan> {
    let archive_path = resolve_archive_path(archive.filename())?;
    let name = archive_path
        .file_name()
        .ok_or_else(|| anyhow!("archive path has no file name: {}", archive_path.display()))?
        .to_os_string();

    let class = system_path_on(platform, &archive_path);
    tracing::debug!(
        archive = %archive_path.display(),
        platform = platform.as_str(),
        class = class.as_str(),
        "classified archive location"
    );

    let system = class.is_system().then(|| {
        let root = bases.system_base.join(&name);
        inspect_system_candidate(archive, build_id, &root, layout, writeable)
    });

    let resolved = match &system {
        Some(candidate) if candidate.usable() => {
            tracing::debug!(root = %candidate.root.display(), "using system cache");
            ResolvedRoot {
                path: candidate.root.clone(),
                tier: RootTier::System,
            }
        }
        _ => {
            let path = bases.user_base()?.join(&name);
            tracing::debug!(root = %path.display(), "using user cache");
            ResolvedRoot {
                path,
                tier: RootTier::User,
            }
        }
    };

    Ok(RootPlan {
        archive_path,
        platform,
        class,
        system,
        resolved,
    })
}

fn inspect_system_candidate(
    archive: &dyn ArchiveRef,
    build_id: &str,
    root: &Path,
    layout: &dyn CacheLayout,
    writeable: &dyn Fn(&Path) -> bool,
) -> SystemCandidate {
    let cache = layout.cache_path(archive, root, build_id);
    let site_packages_present = site_packages_dir(&cache).exists();
    let cache_writeable = writeable(&cache);
    tracing::debug!(
        cache = %cache.display(),
        site_packages_present,
        cache_writeable,
        "inspected system cache"
    );

    SystemCandidate {
        root: root.to_path_buf(),
        cache,
        site_packages_present,
        cache_writeable,
    }
}
