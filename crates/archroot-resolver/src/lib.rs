mod bootstrap;
mod classify;
mod resolve;
mod writeable;

pub use bootstrap::{bootstrap_root, launch, RootDecision};
pub use classify::{system_path, system_path_on, PathClass, Platform};
pub use resolve::{
    custom_root, custom_root_on, default_user_base, plan_root_on, plan_root_with, ResolvedRoot,
    RootBases, RootPlan, RootTier, SystemCandidate, DEFAULT_SYSTEM_BASE,
};
pub use writeable::dir_writeable;
