//! Crate-wide error taxonomy.
//!
//! Every fallible operation in the engine returns [`Result`]; errors are
//! fail-fast and propagate unchanged to the embedding host, which maps them
//! onto its own error surface.

/// Errors reported by sequences, the adjacency matrix and the reducers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A vertex or element index lies outside its valid range.
    #[error("index is out of range")]
    InvalidIndex,

    /// A structural contract was violated at a boundary: unknown method name,
    /// duplicate or descending row index, a resize below the current size,
    /// a dense row of the wrong length, or a non-finite/negative coefficient.
    #[error("invalid argument")]
    InvalidArgument,

    /// An operation was called out of lifecycle order, e.g. running a
    /// reduction before the matrix was finalized.
    #[error("operation called in an invalid state")]
    InvalidState,

    /// A fixed-capacity sequence has no room left.
    #[error("sequence capacity exhausted")]
    Capacity,

    /// The installed allocator refused a request.
    #[error("out of memory")]
    OutOfMemory,
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;
