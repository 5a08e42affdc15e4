use crate::snapshot::Side;
use deltaview_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that hosts can match on and show
/// to reviewers without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// A snapshot is not valid JSON (fatal, must be shown to the user)
    Parse,
    InvalidInput,
    /// A JSON Pointer is malformed
    InvalidPath,

    // Rendering
    /// The render tree could not be built from the delta (no partial tree is produced)
    Render,

    // Patch application
    /// A delta op does not fit the document it is applied to
    PatchConflict,

    // Determinism
    DeterminismViolation,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::Render => "ERR_RENDER",
            ExErrorKind::PatchConflict => "ERR_PATCH_CONFLICT",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Short title shown at the top of a visible error panel
    pub fn title(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "Snapshot could not be parsed",
            ExErrorKind::InvalidInput => "Invalid input",
            ExErrorKind::InvalidPath => "Invalid path",
            ExErrorKind::Render => "Delta could not be rendered",
            ExErrorKind::PatchConflict => "Delta does not apply",
            ExErrorKind::DeterminismViolation => "Delta is not deterministic",
            ExErrorKind::InvalidConfig => "Invalid configuration",
            ExErrorKind::Io => "I/O failure",
            ExErrorKind::Serialization => "Serialization failure",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context a
/// reviewer needs to locate the problem (which snapshot, where in it).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    side: Option<Side>,
    line: Option<usize>,
    column: Option<usize>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            side: None,
            line: None,
            column: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add JSON Pointer context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add snapshot side context
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Add source position (1-based line and column)
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the JSON Pointer context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the snapshot side, if any
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// Get the source line, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the source column, if any
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(side) = self.side {
            write!(f, " (side: {})", side)?;
        }
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " (line {}, column {})", line, column)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: '{}')", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for DeltaView operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaViewError {
    // ===== Input Errors =====
    /// Snapshot text is not valid JSON
    #[error("Failed to parse {side} snapshot at line {line}, column {column}: {message}")]
    Parse {
        side: Side,
        line: usize,
        column: usize,
        message: String,
    },

    /// Snapshot bytes are not valid UTF-8
    #[error("{side} snapshot is not valid UTF-8: {message}")]
    InvalidEncoding { side: Side, message: String },

    /// JSON Pointer is malformed
    #[error("Invalid JSON Pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },

    // ===== Patch Errors =====
    /// Path does not resolve in the document
    #[error("Path not found: '{path}'")]
    PathNotFound { path: String },

    /// Array index token is not a valid index for the addressed array
    #[error("Invalid array index '{token}' at '{path}'")]
    InvalidIndex { path: String, token: String },

    /// Path descends through a scalar value
    #[error("Path '{path}' descends into a scalar value")]
    NotAContainer { path: String },

    /// Target key is already present
    #[error("Path already exists: '{path}'")]
    PathAlreadyExists { path: String },

    /// Current value differs from the value recorded in the delta
    #[error("Value at '{path}' does not match the value recorded in the delta")]
    ValueMismatch { path: String },

    // ===== Render Errors =====
    /// Delta could not be replayed over the left snapshot
    #[error("Render tree replay failed at '{path}': {reason}")]
    TreeReplay { path: String, reason: String },

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    /// I/O error (reading snapshots or configuration)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from DeltaViewError to ExError
impl From<DeltaViewError> for ExError {
    fn from(err: DeltaViewError) -> Self {
        let message = err.to_string();
        match err {
            DeltaViewError::Parse {
                side, line, column, ..
            } => ExError::new(ExErrorKind::Parse)
                .with_side(side)
                .with_position(line, column)
                .with_message(message),

            DeltaViewError::InvalidEncoding { side, .. } => ExError::new(ExErrorKind::Parse)
                .with_side(side)
                .with_message(message),

            DeltaViewError::InvalidPointer { pointer, .. } => {
                ExError::new(ExErrorKind::InvalidPath)
                    .with_path(pointer)
                    .with_message(message)
            }

            DeltaViewError::PathNotFound { path }
            | DeltaViewError::InvalidIndex { path, .. }
            | DeltaViewError::NotAContainer { path }
            | DeltaViewError::PathAlreadyExists { path }
            | DeltaViewError::ValueMismatch { path } => ExError::new(ExErrorKind::PatchConflict)
                .with_path(path)
                .with_message(message),

            DeltaViewError::TreeReplay { path, .. } => ExError::new(ExErrorKind::Render)
                .with_path(path)
                .with_message(message),

            DeltaViewError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            DeltaViewError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),

            DeltaViewError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DeltaViewError
impl From<serde_json::Error> for DeltaViewError {
    fn from(err: serde_json::Error) -> Self {
        DeltaViewError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to DeltaViewError
impl From<std::io::Error> for DeltaViewError {
    fn from(err: std::io::Error) -> Self {
        DeltaViewError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::Parse, "ERR_PARSE"),
            (ExErrorKind::Render, "ERR_RENDER"),
            (ExErrorKind::PatchConflict, "ERR_PATCH_CONFLICT"),
            (ExErrorKind::InvalidPath, "ERR_INVALID_PATH"),
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (
                ExErrorKind::DeterminismViolation,
                "ERR_DETERMINISM_VIOLATION",
            ),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_parse_error_carries_side_and_position() {
        let err: ExError = DeltaViewError::Parse {
            side: Side::Left,
            line: 1,
            column: 2,
            message: "key must be a string".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::Parse);
        assert_eq!(err.side(), Some(Side::Left));
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(2));
        assert!(err.to_string().contains("left"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Serialization).with_message("bad float");
        let outer = ExError::new(ExErrorKind::DeterminismViolation).with_source(inner);
        let source = std::error::Error::source(&outer).expect("source should be set");
        assert!(source.to_string().contains("ERR_SERIALIZATION"));
    }
}
