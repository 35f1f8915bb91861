//! Errors returned by the sharing codecs.
//!
//! Every fallible operation in the crate returns [`SecretSharingError`].
//! Errors fall into two groups:
//!
//! - **parameter errors** (`InvalidParameters`, `InsufficientShares`,
//!   `EmptySecret`, `EmptyShares`, `LengthMismatch`,
//!   `DuplicatePartCoordinate`, `InvalidCoordinate`, `CoordinateMismatch`,
//!   `UnequalStreamLengths`), detected at the API boundary and fixable by the
//!   caller;
//! - **resource errors** (`RandomnessUnavailable`, `SinkOpenFailed`,
//!   `SinkWriteFailed`, `SourceReadFailed`), surfaced as soon as they occur and
//!   never retried internally.
//!
//! A [`Reader`](crate::Reader) that returned any error stays failed: every
//! later read returns `ReaderFailed`.
//!
//! Broken internal invariants (a zero divisor in the field, duplicate
//! coordinates reaching the interpolator) are not represented here: they
//! panic, since the validation in front of them makes them unreachable.

use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SecretSharingError>;

/// Errors that may occur while splitting or combining a secret.
#[derive(Error, Debug)]
pub enum SecretSharingError {
    /// Share count and threshold must satisfy `2 <= threshold <= shares <= 255`.
    #[error("invalid parameters: {shares} shares with threshold {threshold} (need 2 <= threshold <= shares <= 255)")]
    InvalidParameters {
        /// Requested number of shares.
        shares: usize,
        /// Requested reconstruction threshold.
        threshold: usize,
    },

    /// Fewer than two shares were supplied for reconstruction.
    #[error("at least two shares are required, got {0}")]
    InsufficientShares(usize),

    /// Nothing was written, so there is no secret to share.
    #[error("the secret is empty")]
    EmptySecret,

    /// The supplied shares carry no secret bytes.
    #[error("shares must carry at least one secret byte")]
    EmptyShares,

    /// The supplied shares do not all have the same length.
    #[error("all shares must have the same length")]
    LengthMismatch,

    /// Two tagged shares carry the same coordinate.
    #[error("duplicate share coordinate {0}")]
    DuplicatePartCoordinate(u8),

    /// A share is tagged with the reserved origin coordinate.
    #[error("share coordinate 0 is reserved for the secret")]
    InvalidCoordinate,

    /// A tagged stream ended with a tag different from its key.
    #[error("stream keyed as coordinate {expected} is tagged {found}")]
    CoordinateMismatch {
        /// Coordinate the stream was registered under.
        expected: u8,
        /// Coordinate found in the trailing tag.
        found: u8,
    },

    /// The random source could not supply bytes.
    #[error("random source unavailable")]
    RandomnessUnavailable(#[source] rand::Error),

    /// The sink factory failed to open the sink for a coordinate.
    #[error("failed to open sink for share {x}")]
    SinkOpenFailed {
        /// Coordinate of the share whose sink could not be opened.
        x: u8,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A sink rejected a write.
    #[error("failed to write share {x}")]
    SinkWriteFailed {
        /// Coordinate of the share whose sink failed.
        x: u8,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A source failed while being read.
    #[error("failed to read share {x}")]
    SourceReadFailed {
        /// Coordinate of the share whose source failed.
        x: u8,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Share streams returned different amounts of data for the same read.
    #[error("share streams must be of equal length")]
    UnequalStreamLengths,

    /// An earlier read on this reader failed; its sources are no longer in
    /// lockstep.
    #[error("reader is unusable after an earlier failed read")]
    ReaderFailed,
}

impl From<SecretSharingError> for io::Error {
    fn from(err: SecretSharingError) -> Self {
        let kind = match &err {
            SecretSharingError::SinkWriteFailed { source, .. }
            | SecretSharingError::SinkOpenFailed { source, .. }
            | SecretSharingError::SourceReadFailed { source, .. } => source.kind(),
            SecretSharingError::UnequalStreamLengths
            | SecretSharingError::CoordinateMismatch { .. }
            | SecretSharingError::EmptyShares
            | SecretSharingError::ReaderFailed => io::ErrorKind::InvalidData,
            _ => io::ErrorKind::Other,
        };

        io::Error::new(kind, err)
    }
}
