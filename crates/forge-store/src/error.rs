//! Store errors

use thiserror::Error;

/// Errors raised by cache and history stores
///
/// In-memory stores never raise these; file-backed stores surface I/O and
/// encoding faults through them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem fault
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
