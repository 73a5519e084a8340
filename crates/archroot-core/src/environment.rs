use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::process_env::ProcessEnv;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub build_id: String,
    #[serde(default)]
    pub root: Option<String>,
}

impl Environment {
    pub const ROOT: &'static str = "SHIV_ROOT";

    pub fn from_json(input: &[u8]) -> anyhow::Result<Self> {
        let env: Self =
            serde_json::from_slice(input).context("failed to parse archive environment")?;
        if env.build_id.trim().is_empty() {
            return Err(anyhow!("archive environment has an empty build_id"));
        }
        Ok(env)
    }

    // The process configuration wins over the build-time value; empty values count as unset.
    pub fn effective_root(&self, config: &ProcessEnv) -> Option<PathBuf> {
        if let Some(value) = config.get_non_empty(Self::ROOT) {
            return Some(PathBuf::from(value));
        }
        self.root
            .as_deref()
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
    }
}
