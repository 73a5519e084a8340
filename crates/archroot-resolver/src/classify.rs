use std::path::Path;

const LINUX_PERSONAL_ROOTS: &[&str] = &["/home", "/root"];
const MACOS_PERSONAL_ROOTS: &[&str] = &["/Users"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Other => "other",
        }
    }

    pub fn personal_roots(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Linux => Some(LINUX_PERSONAL_ROOTS),
            Self::MacOs => Some(MACOS_PERSONAL_ROOTS),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    System,
    Personal,
    Unknown,
}

impl PathClass {
    // Unknown counts as personal.
    pub fn is_system(self) -> bool {
        matches!(self, Self::System)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Personal => "personal",
            Self::Unknown => "unknown",
        }
    }
}

pub fn system_path(path: &Path) -> PathClass {
    system_path_on(Platform::current(), path)
}

pub fn system_path_on(platform: Platform, path: &Path) -> PathClass {
    let Some(roots) = platform.personal_roots() else {
        return PathClass::Unknown;
    };

    if roots.iter().any(|root| path.starts_with(root)) {
        PathClass::Personal
    } else {
        PathClass::System
    }
}
