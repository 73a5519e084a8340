use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{OsStr, OsString};
use std::process::Command;

// Entries written through `set_if_absent` are the ones exported to the launched archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: BTreeMap<String, OsString>,
    published: BTreeSet<String>,
}

impl ProcessEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_process() -> Self {
        Self::capture(
            std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value))),
        )
    }

    pub fn capture<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            published: BTreeSet::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(key).map(OsString::as_os_str)
    }

    pub fn get_non_empty(&self, key: &str) -> Option<&OsStr> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn set_if_absent(&mut self, key: &str, value: impl Into<OsString>) -> bool {
        if self.get_non_empty(key).is_some() {
            return false;
        }
        self.vars.insert(key.to_string(), value.into());
        self.published.insert(key.to_string());
        true
    }

    pub fn published(&self) -> impl Iterator<Item = (&str, &OsStr)> {
        self.published
            .iter()
            .filter_map(|key| Some((key.as_str(), self.get(key)?)))
    }

    pub fn apply_to(&self, command: &mut Command) {
        for (key, value) in self.published() {
            command.env(key, value);
        }
    }
}
