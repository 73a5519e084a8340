use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use archroot_core::{ArchiveRef, Bootstrap, CacheLayout, Environment, ProcessEnv, ENVIRONMENT_MEMBER};

use crate::classify::Platform;
use crate::resolve::{custom_root_on, ResolvedRoot, RootBases};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootDecision {
    Explicit(PathBuf),
    Published(ResolvedRoot),
}

impl RootDecision {
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) => path,
            Self::Published(resolved) => &resolved.path,
        }
    }
}

pub fn bootstrap_root(
    archive: &dyn ArchiveRef,
    config: &mut ProcessEnv,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<RootDecision> {
    bootstrap_root_on(Platform::current(), archive, config, bases, layout)
}

pub(crate) fn bootstrap_root_on(
    platform: Platform,
    archive: &dyn ArchiveRef,
    config: &mut ProcessEnv,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<RootDecision> {
    let raw = archive.read(ENVIRONMENT_MEMBER)?;
    let env = Environment::from_json(&raw).with_context(|| {
        format!(
            "invalid {ENVIRONMENT_MEMBER} in archive {}",
            archive.filename().display()
        )
    })?;

    if let Some(root) = env.effective_root(config) {
        tracing::debug!(root = %root.display(), "extraction root already configured");
        return Ok(RootDecision::Explicit(root));
    }

    let resolved = custom_root_on(platform, archive, &env.build_id, bases, layout)?;
    config.set_if_absent(Environment::ROOT, resolved.path.as_os_str());
    tracing::info!(
        key = Environment::ROOT,
        root = %resolved.path.display(),
        tier = resolved.tier.as_str(),
        "published default extraction root"
    );
    Ok(RootDecision::Published(resolved))
}

pub fn launch(
    archive: &dyn ArchiveRef,
    bootstrap: &dyn Bootstrap,
    config: &mut ProcessEnv,
    bases: &RootBases,
    layout: &dyn CacheLayout,
) -> Result<i32> {
    bootstrap_root(archive, config, bases, layout)?;
    bootstrap.bootstrap(archive, config)
}
