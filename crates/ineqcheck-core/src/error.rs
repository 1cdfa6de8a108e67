use std::fmt;

/// Machine-readable error codes for tooling and scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidOperator,
    MissingVertex,
    DanglingEdge,
    EmptyTerm,
    MissingOperator,
    ConfigReadFailed,
    ConfigParseError,
    InputReadFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidOperator => "E1001",
            Self::MissingVertex => "E1002",
            Self::DanglingEdge => "E1003",
            Self::EmptyTerm => "E2001",
            Self::MissingOperator => "E2002",
            Self::ConfigReadFailed => "E3001",
            Self::ConfigParseError => "E3002",
            Self::InputReadFailed => "E4001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidOperator => "Invalid relation operator",
            Self::MissingVertex => "Term missing from component map",
            Self::DanglingEdge => "Adjacency references unknown vertex",
            Self::EmptyTerm => "Empty term in relation chain",
            Self::MissingOperator => "Line has no relation operator",
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InputReadFailed => "Input could not be read",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidOperator => Some("Use one of <, ≤, =, ≥, > (or <=, >=, ==)."),
            Self::MissingVertex | Self::DanglingEdge | Self::InternalUnexpected => {
                Some("This is a bug. Please report it with the input that triggered it.")
            }
            Self::EmptyTerm => Some("Every operator needs a term on both sides, e.g. `a < b`."),
            Self::MissingOperator => {
                Some("Write a chain such as `a ≤ b < c`, or prefix the line with `#` to comment it out.")
            }
            Self::ConfigReadFailed => Some("Check the path and file permissions."),
            Self::ConfigParseError => Some("Fix syntax in ineqcheck.toml and retry."),
            Self::InputReadFailed => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural errors raised by the graph layer and the consistency engine.
///
/// A contradiction between relations is never one of these: it is reported
/// as data in [`crate::engine::Report`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// An operator token outside `<`, `≤`, `=`, `≥`, `>`.
    #[error("invalid relation operator: {0:?}")]
    InvalidOperator(String),

    /// A relation endpoint has no component id.
    #[error("relation #{relation} references a term missing from the component map")]
    MissingVertex { relation: usize },

    /// An adjacency list names a successor that is not in the vertex list.
    #[error("adjacency of vertex #{vertex} references a successor outside the vertex set")]
    DanglingEdge { vertex: usize },
}

impl CheckError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidOperator(_) => ErrorCode::InvalidOperator,
            Self::MissingVertex { .. } => ErrorCode::MissingVertex,
            Self::DanglingEdge { .. } => ErrorCode::DanglingEdge,
        }
    }
}
