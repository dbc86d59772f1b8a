use thiserror::Error;

/// Errors surfaced by the chunk codec.
///
/// Configuration errors are returned from [`crate::config::CodecConfig::new`]
/// only; per-chunk operations assume a valid configuration. Data-corruption
/// errors are returned from the decode path when the entropy stage reports a
/// length mismatch. Violated addressing preconditions (e.g. `length0 >
/// array_count[i]`) are programming errors, not recoverable data conditions,
/// and are enforced with `debug_assert!` in the gather/scatter engine rather
/// than threaded through `Result`.
#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("Invalid compression type")]
    InvalidCompressionType,
    #[error("Invalid data type")]
    InvalidDataType,
    #[error("Corrupted data with potential out-of-bound read")]
    OutOfBoundRead,
    #[error("Not an OM file")]
    NotAnOmFile,
    #[error("Corrupted data: deflated size does not match")]
    DeflatedSizeMismatch,
    #[error("dimensions.len() ({dims}) does not match chunks.len() ({chunks})")]
    RankMismatch { dims: usize, chunks: usize },
}
