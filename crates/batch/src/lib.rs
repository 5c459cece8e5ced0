//! # Stutter Batch
//!
//! Resumable batch scanning for the stutter collapse engine.
//!
//! ## Pipeline
//!
//! ```text
//! Root tree
//!     │
//!     ├──> Discovery (directories by name, then files by extension)
//!     │      └─> checkpointed file list
//!     │
//!     ├──> File Processor (per line: stutter-core)
//!     │      └─> change records + optional _edit sibling
//!     │
//!     └──> Reports (audit log + summary counters)
//! ```
//!
//! Discovery results and a per-file cursor are persisted to a JSON
//! checkpoint, so an interrupted run over a large tree resumes instead of
//! starting over. Per-file problems are absorbed into the audit log; only
//! configuration errors fail the run.

mod checkpoint;
mod error;
mod processor;
mod report;
mod scanner;

pub use checkpoint::{Checkpoint, JobState, CHECKPOINT_SCHEMA_VERSION};
pub use error::{BatchError, Result};
pub use processor::{
    edit_sibling_path, process_file, write_edit_sibling, ChangeRecord, FileOutcome, Mode,
};
pub use report::{write_audit_log, AuditFormat, SkipEntry, Summary};
pub use scanner::{discover_dirs, discover_files, ScanConfig, Scanner};
