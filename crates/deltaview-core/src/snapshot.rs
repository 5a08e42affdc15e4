//! Snapshots: the two JSON documents a delta is computed between.

use crate::errors::{DeltaViewError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which of the two snapshots a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The older snapshot
    Left,
    /// The newer snapshot
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A parsed JSON document representing a record at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    side: Side,
    value: Value,
}

impl Snapshot {
    /// Parse snapshot text.
    ///
    /// # Errors
    ///
    /// `Parse` with the failing line and column if the text is not JSON.
    /// Empty text is a parse error, not an empty document.
    pub fn parse(side: Side, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| DeltaViewError::Parse {
            side,
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;
        Ok(Self { side, value })
    }

    /// Parse snapshot bytes, checking UTF-8 first.
    ///
    /// # Errors
    ///
    /// `Parse` if the bytes are not UTF-8 or not JSON.
    pub fn parse_bytes(side: Side, bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| DeltaViewError::InvalidEncoding {
            side,
            message: e.to_string(),
        })?;
        Self::parse(side, text)
    }

    /// Wrap an already-parsed value
    pub fn from_value(side: Side, value: Value) -> Self {
        Self { side, value }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
