use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

use crate::archive::ArchiveRef;
use crate::process_env::ProcessEnv;

pub trait Bootstrap {
    fn bootstrap(&self, archive: &dyn ArchiveRef, config: &ProcessEnv) -> Result<i32>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecBootstrap {
    pub interpreter: Option<PathBuf>,
    pub args: Vec<OsString>,
}

impl ExecBootstrap {
    pub fn new(args: Vec<OsString>) -> Self {
        Self {
            interpreter: None,
            args,
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    pub fn command(&self, archive: &dyn ArchiveRef, config: &ProcessEnv) -> Result<Command> {
        // a bare file name would otherwise be looked up on PATH
        let archive_path = std::path::absolute(archive.filename()).with_context(|| {
            format!("failed to resolve archive path: {}", archive.filename().display())
        })?;

        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&archive_path);
                command
            }
            None => Command::new(&archive_path),
        };
        command.args(&self.args);
        config.apply_to(&mut command);
        Ok(command)
    }
}

impl Bootstrap for ExecBootstrap {
    fn bootstrap(&self, archive: &dyn ArchiveRef, config: &ProcessEnv) -> Result<i32> {
        let status = self
            .command(archive, config)?
            .status()
            .with_context(|| format!("failed to launch archive {}", archive.filename().display()))?;
        Ok(exit_code(status))
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
