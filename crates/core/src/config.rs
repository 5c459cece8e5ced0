use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for stutter detection and collapse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseConfig {
    /// Minimum number of consecutive phrase occurrences to count as a stutter
    pub min_dups: usize,

    /// Maximum tokens per line before detection is skipped and the line flagged
    pub max_line_tokens: usize,
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            min_dups: 3,
            max_line_tokens: 512,
        }
    }
}

impl CollapseConfig {
    /// Create a config with an explicit repetition threshold
    #[must_use]
    pub fn with_min_dups(min_dups: usize) -> Self {
        Self {
            min_dups,
            ..Default::default()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.min_dups < 2 {
            return Err(CoreError::invalid_config(format!(
                "min_dups must be at least 2, got {}",
                self.min_dups
            )));
        }
        if self.max_line_tokens == 0 {
            return Err(CoreError::invalid_config(
                "max_line_tokens must be non-zero",
            ));
        }
        Ok(())
    }
}
