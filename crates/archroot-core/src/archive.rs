use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub const ENVIRONMENT_MEMBER: &str = "environment.json";

pub trait ArchiveRef {
    fn filename(&self) -> &Path;

    fn read(&self, member: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipApp {
    path: PathBuf,
}

impl ZipApp {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(anyhow!("archive not found: {}", path.display()));
        }
        let path = std::path::absolute(&path)
            .with_context(|| format!("failed to resolve archive path: {}", path.display()))?;
        Ok(Self { path })
    }
}

impl ArchiveRef for ZipApp {
    fn filename(&self) -> &Path {
        &self.path
    }

    fn read(&self, member: &str) -> Result<Vec<u8>> {
        tracing::debug!(archive = %self.path.display(), member, "reading archive member");
        read_command_stdout(
            Command::new("unzip").arg("-p").arg(&self.path).arg(member),
            &format!(
                "failed to read '{member}' from archive {}",
                self.path.display()
            ),
        )
    }
}

// Falls back to the lexical absolute path when the file cannot be canonicalized.
pub fn resolve_archive_path(path: &Path) -> Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("failed to resolve archive path: {}", path.display())),
    }
}

pub(crate) fn read_command_stdout(command: &mut Command, context_message: &str) -> Result<Vec<u8>> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;

    // unzip exits 1 on warnings, e.g. the shebang line prepended to a zip app.
    if matches!(output.status.code(), Some(0) | Some(1)) {
        return Ok(output.stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(anyhow!(
        "{context_message}: status={} stderr='{}'",
        output.status,
        stderr.trim()
    ))
}
