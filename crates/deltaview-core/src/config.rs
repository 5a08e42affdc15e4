//! Viewer configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! show_unchanged = false
//! array_strategy = "positional"
//! lcs_cell_limit = 1000000
//! max_value_width = 120
//! log_profile = "production"
//! ```

use crate::delta::align::ArrayStrategy;
use crate::delta::engine::{DiffOptions, DEFAULT_LCS_CELL_LIMIT};
use crate::errors::{DeltaViewError, ExError, Result};
use crate::logging_facility::Profile;
use crate::render::session::ToggleState;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Narrowest value column that still leaves room for the `…` marker
const MIN_VALUE_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Initial toggle state of new sessions
    pub show_unchanged: bool,
    pub array_strategy: ArrayStrategy,
    pub lcs_cell_limit: usize,
    /// Scalars longer than this are truncated in text and HTML output
    pub max_value_width: usize,
    pub log_profile: Profile,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            show_unchanged: true,
            array_strategy: ArrayStrategy::Lcs,
            lcs_cell_limit: DEFAULT_LCS_CELL_LIMIT,
            max_value_width: 80,
            log_profile: Profile::Development,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on syntax errors, unknown keys or out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(text).map_err(|e| DeltaViewError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`ViewerConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::from(DeltaViewError::from(e))
                .with_op("load_config")
                .with_path(path.display().to_string())
        })?;
        Self::from_toml_str(&text).map_err(|e| e.with_op("load_config"))
    }

    /// # Errors
    ///
    /// `InvalidConfig` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.max_value_width < MIN_VALUE_WIDTH {
            return Err(DeltaViewError::InvalidConfig {
                reason: format!(
                    "max_value_width must be at least {}, got {}",
                    MIN_VALUE_WIDTH, self.max_value_width
                ),
            }
            .into());
        }
        if self.lcs_cell_limit == 0 {
            return Err(DeltaViewError::InvalidConfig {
                reason: "lcs_cell_limit must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            array_strategy: self.array_strategy,
            lcs_cell_limit: self.lcs_cell_limit,
        }
    }

    pub fn initial_toggle(&self) -> ToggleState {
        ToggleState::from_bool(self.show_unchanged)
    }
}
