use std::result::Result as StdResult;

use thiserror::Error;

use crate::id::NodeId;

/// Result type for sprig operations.
pub type Result<T> = StdResult<T, Error>;

/// Crate error type.
///
/// Errors are confined to structural and configuration operations. Event
/// dispatch never returns `Result`: a miss is reported as `false`/`None` and
/// bubbles (or doesn't) like any other unhandled event.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A node handle does not resolve to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Focus-related failure.
    #[error("focus: {0}")]
    Focus(String),

    /// Missing or unusable configuration, fatal at construction time.
    #[error("config: {0}")]
    Config(String),

    /// Invalid structural operation (cycle, double attach, bad index).
    #[error("invalid: {0}")]
    Invalid(String),

    /// Run loop failure.
    #[error("runloop: {0}")]
    RunLoop(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}
