//! # Stutter Core
//!
//! Detection and collapse of repeated-phrase runs ("stutters") in lines of
//! plain text.
//!
//! ## Pipeline
//!
//! ```text
//! Line
//!     │
//!     ├──> Tokenizer (whitespace split, byte offsets)
//!     │      └─> Tokens
//!     │
//!     ├──> Repeat Detector (stride-aligned phrase scan)
//!     │      └─> RepeatRun
//!     │
//!     └──> Collapse Engine (iterate to fixpoint)
//!            └─> Rewritten line + edit trail
//! ```
//!
//! ## Example
//!
//! ```
//! use stutter_core::{collapse_line, CollapseConfig};
//!
//! let config = CollapseConfig::default();
//! let out = collapse_line("the cat sat the cat sat the cat sat on the mat", &config);
//! assert_eq!(out.text, "the cat sat on the mat");
//! ```

mod collapse;
mod config;
mod detector;
mod error;
mod tokenizer;
mod types;

pub use collapse::collapse_line;
pub use config::CollapseConfig;
pub use detector::{find_dominant_repeat, find_first_repeat};
pub use error::{CoreError, Result};
pub use tokenizer::{tokenize, Token};
pub use types::{LineEdit, LineOutcome, RepeatRun};
