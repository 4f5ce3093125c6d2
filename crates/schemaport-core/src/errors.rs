use crate::model::EntityKind;
use schemaport_core_types::RunId;
use thiserror::Error;

/// Result type alias using SchemaPortError
pub type Result<T> = std::result::Result<T, SchemaPortError>;

/// Result type alias for store and orchestration boundaries
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (CLI, tests, any
/// future HTTP surface) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Document
    InvalidInput,
    ParseFailure,
    UnexpectedRoot,

    // Reconciliation
    Validation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ParseFailure => "ERR_PARSE_FAILURE",
            ExErrorKind::UnexpectedRoot => "ERR_UNEXPECTED_ROOT",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, entity kind, URI, run) needed to debug an import.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_kind: Option<EntityKind>,
    uri: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            uri: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity kind context
    pub fn with_entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    /// Add URI context
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Add run context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
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

    /// Get the entity kind context, if any
    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_kind
    }

    /// Get the URI context, if any
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Get the run context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
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
        if let Some(kind) = self.entity_kind {
            write!(f, " (kind: {})", kind)?;
        }
        if let Some(uri) = &self.uri {
            write!(f, " (uri: {})", uri)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
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

/// Domain error taxonomy for document imports
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaPortError {
    // ===== Document Errors =====
    /// The uploaded bytes are not a well-formed XML document
    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// The root element does not name a known schema
    #[error("Unsupported root element <{found}>")]
    UnsupportedRoot { found: String },

    /// The root element names a different schema than the caller asked for
    #[error("Unexpected root element <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: String, found: String },

    // ===== Validation Errors =====
    /// Candidate has no key (usually because the node carried no URI)
    #[error("{kind} has an empty key (uri: '{uri}')")]
    MissingKey { kind: EntityKind, uri: String },

    /// Another record of the same kind already uses this key
    #[error("{kind} key '{key}' is already used by {other_uri}")]
    DuplicateKey {
        kind: EntityKind,
        uri: String,
        key: String,
        other_uri: String,
    },

    /// Another record of the same kind already uses this path
    #[error("{kind} path '{path}' is already used by {other_uri}")]
    DuplicatePath {
        kind: EntityKind,
        uri: String,
        path: String,
        other_uri: String,
    },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl SchemaPortError {
    /// Whether this error marks a single candidate as invalid
    /// (contained per node) rather than failing the whole import.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchemaPortError::MissingKey { .. }
                | SchemaPortError::DuplicateKey { .. }
                | SchemaPortError::DuplicatePath { .. }
        )
    }
}

/// Conversion from SchemaPortError to ExError
impl From<SchemaPortError> for ExError {
    fn from(err: SchemaPortError) -> Self {
        let message = err.to_string();
        match err {
            SchemaPortError::MalformedDocument { .. } => {
                ExError::new(ExErrorKind::ParseFailure).with_message(message)
            }
            SchemaPortError::UnsupportedRoot { .. } | SchemaPortError::UnexpectedRoot { .. } => {
                ExError::new(ExErrorKind::UnexpectedRoot).with_message(message)
            }
            SchemaPortError::MissingKey { kind, uri }
            | SchemaPortError::DuplicateKey { kind, uri, .. }
            | SchemaPortError::DuplicatePath { kind, uri, .. } => ExError::new(ExErrorKind::Validation)
                .with_entity_kind(kind)
                .with_uri(uri)
                .with_message(message),
            SchemaPortError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for SchemaPortError {
    fn from(err: serde_json::Error) -> Self {
        SchemaPortError::Serialization {
            message: err.to_string(),
        }
    }
}
