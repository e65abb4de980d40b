//! Navigation and selection state.
//!
//! `Session` is a pure reducer: user intent arrives as an [`Action`],
//! completed background work as an [`Outcome`], and both return the
//! [`Effect`]s the caller must carry out. Nothing here touches the terminal,
//! the filesystem or the tag tool.

use crate::alert::Notice;
use crate::gateway::{TagGateway, TagOp};
use crate::store::{encode_tags, SessionKey, SessionSnapshot};
use crate::utils;
use std::path::{Path, PathBuf};

/// User intent, independent of the input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    /// Add the working tags to the current file, then advance.
    AddWorkingTags,
    /// Remove the working tags from the current file, then advance.
    RemoveWorkingTags,
    ChangeDirectory(PathBuf),
    /// Replace the current file's tags.
    SetImageTags(Vec<String>),
    UpdateWorkingTags(Vec<String>),
    RefreshTags,
}

/// Background work requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    ListDirectory(PathBuf),
    FetchTags(PathBuf),
    Commit(Commit),
}

/// A tag mutation on one file, with the tags it carried beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub path: PathBuf,
    pub op: TagOp,
    pub before: Vec<String>,
}

/// Completed background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed { dir: PathBuf, files: Vec<String> },
    TagsLoaded { path: PathBuf, tags: Vec<String> },
    Committed(Commit),
    Failed { context: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Run(Task),
    Persist { key: SessionKey, value: String },
    Notify(Notice),
    Report(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseState {
    Empty,
    Browsing(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    working_dir: Option<PathBuf>,
    working_tags: Vec<String>,
    files: Vec<String>,
    index: usize,
    current_tags: Vec<String>,
}

impl Session {
    /// Rebuild a session from persisted state. The directory is listed again
    /// but not re-persisted.
    pub fn restore(snapshot: SessionSnapshot) -> (Self, Vec<Effect>) {
        let session = Self {
            working_dir: snapshot.working_dir,
            working_tags: normalize_tags(snapshot.working_tags),
            ..Self::default()
        };
        let effects = session
            .working_dir
            .clone()
            .map(|dir| vec![Effect::Run(Task::ListDirectory(dir))])
            .unwrap_or_default();
        (session, effects)
    }

    pub fn state(&self) -> BrowseState {
        if self.files.is_empty() {
            BrowseState::Empty
        } else {
            BrowseState::Browsing(self.index)
        }
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn working_tags(&self) -> &[String] {
        &self.working_tags
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_tags(&self) -> &[String] {
        &self.current_tags
    }

    pub fn current_file(&self) -> Option<&str> {
        self.files.get(self.index).map(String::as_str)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        let dir = self.working_dir.as_ref()?;
        self.current_file().map(|name| dir.join(name))
    }

    /// Path of the file `offset` positions away from the current one, wrapping.
    pub fn path_at_offset(&self, offset: isize) -> Option<PathBuf> {
        let dir = self.working_dir.as_ref()?;
        let len = self.files.len() as isize;
        if len == 0 {
            return None;
        }
        let idx = (self.index as isize + offset).rem_euclid(len) as usize;
        self.files.get(idx).map(|name| dir.join(name))
    }

    /// Fraction of the listing already reached, for the progress gauge.
    pub fn progress(&self) -> f64 {
        if self.files.is_empty() {
            0.0
        } else {
            (self.index + 1) as f64 / self.files.len() as f64
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Next => {
                if self.step(1) {
                    self.fetch_current()
                } else {
                    Vec::new()
                }
            }
            Action::Previous => {
                if self.step(-1) {
                    self.fetch_current()
                } else {
                    Vec::new()
                }
            }
            Action::AddWorkingTags => self.commit(TagOp::Add(self.working_tags.clone())),
            Action::RemoveWorkingTags => self.commit(TagOp::Remove(self.working_tags.clone())),
            Action::SetImageTags(tags) => self.commit(TagOp::Set(normalize_tags(tags))),
            Action::ChangeDirectory(dir) => {
                tracing::info!(dir = %dir.display(), "working directory changed");
                self.files.clear();
                self.index = 0;
                self.current_tags.clear();
                self.working_dir = Some(dir.clone());
                vec![
                    Effect::Persist {
                        key: SessionKey::WorkingDir,
                        value: dir.to_string_lossy().into_owned(),
                    },
                    Effect::Run(Task::ListDirectory(dir)),
                ]
            }
            Action::UpdateWorkingTags(tags) => {
                self.working_tags = normalize_tags(tags);
                vec![Effect::Persist {
                    key: SessionKey::WorkingTags,
                    value: encode_tags(&self.working_tags),
                }]
            }
            Action::RefreshTags => self.fetch_current(),
        }
    }

    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Listed { dir, files } => {
                if self.working_dir.as_deref() != Some(dir.as_path()) {
                    tracing::debug!(dir = %dir.display(), "dropping listing for a previous directory");
                    return Vec::new();
                }
                tracing::info!(dir = %dir.display(), count = files.len(), "directory listed");
                self.files = files;
                self.index = 0;
                self.current_tags.clear();
                self.fetch_current()
            }
            // Applied in arrival order; a slow response for a file navigated
            // away from can overwrite a newer one.
            Outcome::TagsLoaded { tags, .. } => {
                self.current_tags = tags;
                Vec::new()
            }
            Outcome::Committed(commit) => {
                let notice = Notice::describe(&commit.before, &commit.op);
                let mut effects = vec![Effect::Notify(notice)];
                // Advance from the committed file, not from wherever the
                // cursor sits now. If the file left the listing, the cursor stays.
                let Some(pos) = self.position_of(&commit.path) else {
                    tracing::debug!(path = %commit.path.display(), "commit for a file no longer listed");
                    return effects;
                };
                match commit.op {
                    TagOp::Set(tags) => {
                        if pos == self.index {
                            self.current_tags = tags;
                        }
                    }
                    TagOp::Add(_) | TagOp::Remove(_) => {
                        self.index = (pos + 1) % self.files.len();
                        effects.extend(self.fetch_current());
                    }
                }
                effects
            }
            Outcome::Failed { context, message } => {
                tracing::warn!(%context, %message, "tag operation failed");
                vec![Effect::Report(format!("{}: {}", context, message))]
            }
        }
    }

    /// Move `delta` positions with wraparound. False when there is nothing to browse.
    fn step(&mut self, delta: isize) -> bool {
        let len = self.files.len();
        if len == 0 {
            return false;
        }
        self.index = (self.index as isize + delta).rem_euclid(len as isize) as usize;
        true
    }

    /// Index of `path` in the current listing.
    fn position_of(&self, path: &Path) -> Option<usize> {
        let dir = self.working_dir.as_deref()?;
        if path.parent()? != dir {
            return None;
        }
        let name = path.file_name()?.to_str()?;
        self.files.iter().position(|f| f == name)
    }

    fn fetch_current(&self) -> Vec<Effect> {
        self.current_path()
            .map(|path| vec![Effect::Run(Task::FetchTags(path))])
            .unwrap_or_default()
    }

    fn commit(&self, op: TagOp) -> Vec<Effect> {
        let Some(path) = self.current_path() else {
            return Vec::new();
        };
        vec![Effect::Run(Task::Commit(Commit {
            path,
            op,
            before: self.current_tags.clone(),
        }))]
    }
}

impl Task {
    /// Carry out the task and describe the result.
    pub async fn perform(self, gateway: &TagGateway) -> Outcome {
        match self {
            Task::ListDirectory(dir) => {
                let files = utils::list_images(&dir).await;
                Outcome::Listed { dir, files }
            }
            Task::FetchTags(path) => match gateway.list(&path).await {
                Ok(tags) => Outcome::TagsLoaded { path, tags },
                Err(e) => Outcome::Failed {
                    context: format!("Reading tags of {}", display_name(&path)),
                    message: e.to_string(),
                },
            },
            Task::Commit(commit) => match gateway.apply(&commit.path, &commit.op).await {
                Ok(()) => Outcome::Committed(commit),
                Err(e) => Outcome::Failed {
                    context: format!("Updating tags of {}", display_name(&commit.path)),
                    message: e.to_string(),
                },
            },
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Trim tag names, dropping empties and repeats (first occurrence wins).
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Split comma-separated prompt input into tag names.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}
