mod archive;
mod environment;
mod launch;
mod layout;
mod process_env;

pub use archive::{resolve_archive_path, ArchiveRef, ZipApp, ENVIRONMENT_MEMBER};
pub use environment::Environment;
pub use launch::{Bootstrap, ExecBootstrap};
pub use layout::{site_packages_dir, BuildCacheLayout, CacheLayout, SITE_PACKAGES};
pub use process_env::ProcessEnv;
