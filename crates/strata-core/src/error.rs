use std::fmt;

/// Result alias used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything the engine can report.
///
/// `MissingNode` and `Cycle` describe bad input data and are expected for
/// untrusted graphs. `InvalidArgument` means the caller asked for something
/// the map cannot answer. `Internal` signals a broken invariant and should
/// never surface from a validated map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An edge names a node that is not a key of the graph.
    #[error("missing node {node:?} for {from:?}")]
    MissingNode { node: String, from: String },

    /// The graph is not acyclic. `cycle` is a minimum-length cycle rooted at
    /// its lexicographically smallest member.
    #[error("graph has circle: {}", .cycle.join("->"))]
    Cycle { cycle: Vec<String> },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingNode { .. } => ErrorCode::MissingNode,
            Self::Cycle { .. } => ErrorCode::CycleDetected,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Internal(_) => ErrorCode::InternalUnexpected,
        }
    }

    /// Remediation hint for operators, falling back to the code's message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingNode,
    CycleDetected,
    InvalidArgument,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingNode => "E1001",
            Self::CycleDetected => "E1002",
            Self::InvalidArgument => "E2001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingNode => "Edge references an unknown node",
            Self::CycleDetected => "Graph contains a cycle",
            Self::InvalidArgument => "Invalid argument",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MissingNode => Some("Declare every edge target as a node key."),
            Self::CycleDetected => Some("Remove one edge of the reported cycle to make the graph acyclic."),
            Self::InvalidArgument => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with the input graph."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
