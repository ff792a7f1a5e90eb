use std::fmt;

use anyhow::Error;
use serde::Serialize;
use serde_json::Value;

/// Usage errors are bad input on the command line: an `--action` that is not a
/// known edit (`INVALID_ACTION`) or an unsupported `--format` (`INVALID_EXPORT_FORMAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedErrorKind {
    Usage,
}

impl CodedErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Usage => 2,
        }
    }
}

/// An error with a stable machine-readable code, carried inside
/// `anyhow::Error` and recovered with [`find_coded_error`].
#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub kind: CodedErrorKind,
}

impl CodedError {
    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind: CodedErrorKind::Usage,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            ok: false,
            error: ErrorEnvelopeBody {
                code: self.code.to_owned(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

/// What `--json` / `CINEBRIEF_AGENT_MODE` print on stderr instead of `error: ...`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Envelope for any error: the coded error's own code when there is one,
    /// `RUNTIME_ERROR` with the full context chain otherwise.
    pub fn from_error(error: &Error) -> Self {
        if let Some(coded) = find_coded_error(error) {
            return coded.envelope();
        }
        Self {
            ok: false,
            error: ErrorEnvelopeBody {
                code: "RUNTIME_ERROR".to_owned(),
                message: format!("{error:#}"),
                details: None,
            },
        }
    }
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}
