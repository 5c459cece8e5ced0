use crate::error::Result;
use crate::processor::ChangeRecord;
use crate::report::SkipEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CHECKPOINT_SCHEMA_VERSION: u32 = 2;

const CHECKPOINT_FILE_NAME: &str = ".stutter-checkpoint.json";

/// Persisted state of one batch run.
///
/// Discovery is the expensive part of a run over a large tree, so the
/// discovered directory and file lists are written as soon as discovery
/// finishes. `next_index` advances after every processed file, so a crash
/// mid-batch resumes at the first unprocessed file rather than replaying
/// the whole list.
///
/// The change records and skip entries accumulated so far are persisted
/// with the cursor. Resumed files are not reprocessed, so the final audit
/// log and summary must be assembled from here, not from the resuming
/// invocation's memory alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobState {
    pub schema_version: u32,
    pub root: PathBuf,
    pub target_dir_name: String,
    pub extension: String,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub next_index: usize,
    pub discovery_complete: bool,
    pub changes: Vec<ChangeRecord>,
    pub skipped: Vec<SkipEntry>,
    pub files_changed: usize,
    pub files_skipped: usize,
}

impl JobState {
    #[must_use]
    pub fn new(root: PathBuf, target_dir_name: String, extension: String) -> Self {
        Self {
            schema_version: CHECKPOINT_SCHEMA_VERSION,
            root,
            target_dir_name,
            extension,
            directories: Vec::new(),
            files: Vec::new(),
            next_index: 0,
            discovery_complete: false,
            changes: Vec::new(),
            skipped: Vec::new(),
            files_changed: 0,
            files_skipped: 0,
        }
    }

    /// Whether this state belongs to the given job parameters. A checkpoint
    /// written for a different root, target directory name, or extension is
    /// somebody else's job and must not be resumed.
    #[must_use]
    pub fn matches(&self, root: &Path, target_dir_name: &str, extension: &str) -> bool {
        self.root == root
            && self.target_dir_name == target_dir_name
            && self.extension.eq_ignore_ascii_case(extension)
    }
}

/// Handle to the durable checkpoint file. Passed explicitly into the
/// scanner; there is no process-global checkpoint path.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default checkpoint location for a run rooted at `root`.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.join(CHECKPOINT_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted job state, if any. A missing file yields `None`;
    /// so does a corrupt or schema-incompatible one, with a warning — a bad
    /// checkpoint only costs a fresh discovery pass, never the run.
    #[must_use]
    pub fn load(&self) -> Option<JobState> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("failed to read checkpoint {}: {e}", self.path.display());
                return None;
            }
        };

        let state: JobState = match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                log::warn!(
                    "checkpoint {} is corrupt, rediscovering: {e}",
                    self.path.display()
                );
                return None;
            }
        };

        if state.schema_version != CHECKPOINT_SCHEMA_VERSION {
            log::warn!(
                "checkpoint {} has schema version {}, expected {}; rediscovering",
                self.path.display(),
                state.schema_version,
                CHECKPOINT_SCHEMA_VERSION
            );
            return None;
        }

        Some(state)
    }

    /// Persist the job state atomically (write to a temp sibling, then
    /// rename) so a crash mid-write never leaves a corrupt checkpoint.
    pub fn save(&self, state: &JobState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Remove the checkpoint file. Missing is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
