use crate::checkpoint::{Checkpoint, JobState};
use crate::error::{BatchError, Result};
use crate::processor::{process_file, write_edit_sibling, Mode};
use crate::report::{write_audit_log, AuditFormat, SkipEntry, Summary};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use stutter_core::CollapseConfig;
use walkdir::WalkDir;

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the tree to search.
    pub root: PathBuf,

    /// Only directories with exactly this name are searched for files.
    pub target_dir_name: String,

    /// File extension to process, with leading dot, matched
    /// case-insensitively.
    pub extension: String,

    pub mode: Mode,
    pub collapse: CollapseConfig,

    /// Audit-log format and destination.
    pub audit_format: AuditFormat,
    pub log_path: PathBuf,

    /// Ignore any existing checkpoint and rediscover.
    pub fresh: bool,

    /// Draw a progress bar on stderr.
    pub progress: bool,
}

impl ScanConfig {
    /// Defaults for the scripture-tree use case: `Infer` directories,
    /// `.sfm` files, navigation log for collapse runs and stats log for
    /// report runs, log written into the root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        let root = root.into();
        let (audit_format, log_name) = match mode {
            Mode::Collapse => (AuditFormat::Navigation, "stutters_log.txt"),
            Mode::Report => (AuditFormat::Stats, "stutters_count.txt"),
        };
        Self {
            log_path: root.join(log_name),
            root,
            target_dir_name: "Infer".to_string(),
            extension: ".sfm".to_string(),
            mode,
            collapse: CollapseConfig::default(),
            audit_format,
            fresh: false,
            progress: true,
        }
    }
}

/// Sequential batch scanner with resumable discovery.
///
/// Discovery runs in two phases (directories by name, then files by
/// extension) and its result is checkpointed before any file is touched.
/// Files are then processed one by one; the checkpoint cursor advances after
/// each file, so an interrupted run resumes at the first unprocessed file.
pub struct Scanner {
    config: ScanConfig,
    checkpoint: Checkpoint,
}

impl Scanner {
    #[must_use]
    pub fn new(config: ScanConfig, checkpoint: Checkpoint) -> Self {
        Self { config, checkpoint }
    }

    /// Drive the full batch: discover (or resume), process every file,
    /// write the audit log, clear the checkpoint.
    pub fn run(&self) -> Result<Summary> {
        let config = &self.config;
        if !config.root.is_dir() {
            return Err(BatchError::InvalidRoot(config.root.clone()));
        }

        let mut state = self.load_or_discover()?;

        let mut summary = Summary {
            dirs_found: state.directories.len(),
            files_found: state.files.len(),
            ..Summary::new()
        };

        let remaining = state.files.len().saturating_sub(state.next_index);
        if state.next_index > 0 {
            log::info!(
                "resuming: {} of {} files already processed",
                state.next_index,
                state.files.len()
            );
        }

        let bar = if config.progress {
            ProgressBar::new(remaining as u64)
        } else {
            ProgressBar::hidden()
        };

        // Records and skip entries accumulate in the job state and are
        // persisted with the cursor, so a resumed run still writes a log
        // covering files processed before the interruption.
        while state.next_index < state.files.len() {
            let file = state.files[state.next_index].clone();

            match process_file(&file, &config.collapse, config.mode) {
                Ok(outcome) => {
                    if !outcome.changes.is_empty() {
                        state.files_changed += 1;
                    }
                    state.changes.extend(outcome.changes);

                    for line in outcome.skipped_lines {
                        state.skipped.push(SkipEntry::line(
                            file.clone(),
                            line,
                            format!(
                                "line exceeds token cap of {}",
                                config.collapse.max_line_tokens
                            ),
                        ));
                    }
                    for line in outcome.stalled_lines {
                        state.skipped.push(SkipEntry::line(
                            file.clone(),
                            line,
                            "could not locate the repeated phrase in the line text",
                        ));
                    }

                    if let Some(edited) = outcome.edited_text.as_deref() {
                        match write_edit_sibling(&file, edited) {
                            Ok(out) => log::debug!("wrote {}", out.display()),
                            Err(e) => {
                                log::warn!(
                                    "failed to write edit sibling for {}: {e}",
                                    file.display()
                                );
                                state.skipped.push(SkipEntry::file(
                                    file.clone(),
                                    format!("edit sibling write failed: {e}"),
                                ));
                            }
                        }
                    }
                }
                Err(e) => {
                    log::warn!("skipping {}: {e}", file.display());
                    state.files_skipped += 1;
                    state.skipped.push(SkipEntry::file(file.clone(), e.to_string()));
                }
            }

            summary.files_processed += 1;
            state.next_index += 1;
            if let Err(e) = self.checkpoint.save(&state) {
                log::warn!("failed to update checkpoint: {e}");
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        summary.files_changed = state.files_changed;
        summary.lines_flagged = state.changes.len();
        summary.files_skipped = state.files_skipped;

        write_audit_log(
            &config.log_path,
            config.audit_format,
            &state.changes,
            &state.skipped,
        )?;
        log::info!(
            "wrote audit log to {} ({} entries)",
            config.log_path.display(),
            state.changes.len()
        );

        if let Err(e) = self.checkpoint.clear() {
            log::warn!("failed to remove checkpoint: {e}");
        }

        Ok(summary)
    }

    /// Reuse a matching checkpoint, or run discovery and persist it.
    fn load_or_discover(&self) -> Result<JobState> {
        let config = &self.config;

        if !config.fresh {
            if let Some(state) = self.checkpoint.load() {
                if state.discovery_complete
                    && state.matches(&config.root, &config.target_dir_name, &config.extension)
                {
                    log::info!(
                        "resuming from checkpoint: {} directories, {} files",
                        state.directories.len(),
                        state.files.len()
                    );
                    return Ok(state);
                }
                log::warn!("checkpoint does not match this job, rediscovering");
            }
        }

        let mut state = JobState::new(
            config.root.clone(),
            config.target_dir_name.clone(),
            config.extension.clone(),
        );

        state.directories = discover_dirs(&config.root, &config.target_dir_name);
        log::info!(
            "found {} directories named {:?}",
            state.directories.len(),
            config.target_dir_name
        );

        state.files = discover_files(&state.directories, &config.extension);
        log::info!(
            "found {} {} files",
            state.files.len(),
            config.extension
        );

        state.discovery_complete = true;
        if let Err(e) = self.checkpoint.save(&state) {
            // The run still works without a checkpoint, it just cannot
            // resume.
            log::warn!("failed to write checkpoint: {e}");
        }

        Ok(state)
    }
}

/// Phase one: every directory under `root` whose name equals
/// `target_dir_name` (exact match). Walk errors are logged and skipped.
#[must_use]
pub fn discover_dirs(root: &Path, target_dir_name: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_dir() && entry.file_name() == target_dir_name {
                    dirs.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("walk error under {}: {e}", root.display()),
        }
    }
    dirs.sort();
    dirs
}

/// Phase two: every file under the given directories whose extension
/// matches, case-insensitively. Nested target directories can overlap, so
/// results are deduplicated. Prior `_edit` outputs are not picked up again.
#[must_use]
pub fn discover_files(dirs: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let want = extension.trim_start_matches('.').to_lowercase();
    let mut files = std::collections::BTreeSet::new();

    for dir in dirs {
        for entry in WalkDir::new(dir) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let path = entry.path();
                    let matches = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.to_lowercase() == want);
                    if !matches {
                        continue;
                    }
                    if is_edit_sibling(path) {
                        log::debug!("skipping prior output {}", path.display());
                        continue;
                    }
                    files.insert(entry.into_path());
                }
                Err(e) => log::warn!("walk error under {}: {e}", dir.display()),
            }
        }
    }

    files.into_iter().collect()
}

fn is_edit_sibling(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("_edit"))
}
