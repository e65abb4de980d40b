use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

/// Default install location of the `tag` utility (Homebrew on Intel macs).
pub const DEFAULT_TAG_BINARY: &str = "/usr/local/bin/tag";

/// Invocation mode of the external `tag` tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Add,
    Remove,
    Set,
}

impl Mode {
    fn flag(&self) -> &'static str {
        match self {
            Mode::List => "-lN",
            Mode::Add => "-a",
            Mode::Remove => "-r",
            Mode::Set => "-s",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::List => "list",
            Mode::Add => "add",
            Mode::Remove => "remove",
            Mode::Set => "set",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tag {mode} failed ({status}): {stderr}")]
    Exit {
        mode: Mode,
        status: String,
        stderr: String,
    },

    #[error("tag {mode} reported: {stderr}")]
    Stderr { mode: Mode, stderr: String },
}

/// A requested tag mutation on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOp {
    Add(Vec<String>),
    Remove(Vec<String>),
    Set(Vec<String>),
}

/// Wrapper around the external tagging executable.
///
/// Every call builds an argument vector; nothing goes through a shell, so
/// file names and tag names reach the tool byte-for-byte.
#[derive(Debug, Clone)]
pub struct TagGateway {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl TagGateway {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the mode flag, for tools fronted by a wrapper.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Tags currently attached to `path`.
    pub async fn list(&self, path: &Path) -> Result<Vec<String>, TagError> {
        let stdout = self.invoke(Mode::List, None, path).await?;
        Ok(parse_tag_list(&stdout))
    }

    pub async fn add(&self, path: &Path, tags: &[String]) -> Result<(), TagError> {
        if tags.is_empty() {
            return Ok(());
        }
        self.invoke(Mode::Add, Some(tags), path).await.map(|_| ())
    }

    pub async fn remove(&self, path: &Path, tags: &[String]) -> Result<(), TagError> {
        if tags.is_empty() {
            return Ok(());
        }
        self.invoke(Mode::Remove, Some(tags), path).await.map(|_| ())
    }

    /// Replace the tags on `path`.
    ///
    /// The tool's set-mode has no defined form without tags, so clearing is
    /// done by listing the current tags and removing exactly those.
    pub async fn set(&self, path: &Path, tags: &[String]) -> Result<(), TagError> {
        if tags.is_empty() {
            let current = self.list(path).await?;
            return self.remove(path, &current).await;
        }
        self.invoke(Mode::Set, Some(tags), path).await.map(|_| ())
    }

    pub async fn apply(&self, path: &Path, op: &TagOp) -> Result<(), TagError> {
        match op {
            TagOp::Add(tags) => self.add(path, tags).await,
            TagOp::Remove(tags) => self.remove(path, tags).await,
            TagOp::Set(tags) => self.set(path, tags).await,
        }
    }

    fn args(&self, mode: Mode, tags: Option<&[String]>, path: &Path) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push(mode.flag().into());
        if let Some(tags) = tags {
            args.push(tags.join(",").into());
        }
        args.push(path.as_os_str().to_owned());
        args
    }

    async fn invoke(
        &self,
        mode: Mode,
        tags: Option<&[String]>,
        path: &Path,
    ) -> Result<String, TagError> {
        let args = self.args(mode, tags, path);
        tracing::debug!(program = %self.program.display(), ?args, "invoking tag tool");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TagError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            let status = output
                .status
                .code()
                .map(|c| format!("exit {}", c))
                .unwrap_or_else(|| "terminated by signal".to_string());
            return Err(TagError::Exit {
                mode,
                status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            return Err(TagError::Stderr { mode, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse list-mode output: comma separated names, whitespace trimmed.
pub fn parse_tag_list(stdout: &str) -> Vec<String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut tags: Vec<String> = Vec::new();
    for name in trimmed.split(',').map(str::trim) {
        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
