//! Share count and threshold.
//!
//! Splitting is configured by two numbers: how many shares to produce and
//! how many of them are needed to reconstruct. This module validates them
//! once, at the API boundary, so the rest of the crate can rely on
//! `2 <= threshold <= shares <= 255` (and therefore on both fitting in a
//! byte).

use crate::error::{Result, SecretSharingError};

/// Largest number of shares: one per non-zero field element.
pub const MAX_SHARES: usize = 255;

/// Smallest useful threshold. A threshold of one would make every share a
/// copy of the secret.
pub const MIN_THRESHOLD: usize = 2;

/// Validated parameters for a split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharingParams {
    shares: u8,
    threshold: u8,
}

impl SharingParams {
    /// Validates `shares` and `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidParameters`] unless
    /// `2 <= threshold <= shares <= 255`.
    pub fn new(shares: usize, threshold: usize) -> Result<Self> {
        if threshold < MIN_THRESHOLD || threshold > shares || shares > MAX_SHARES {
            return Err(SecretSharingError::InvalidParameters { shares, threshold });
        }

        Ok(Self {
            shares: shares as u8,
            threshold: threshold as u8,
        })
    }

    /// Number of shares produced.
    pub fn shares(&self) -> usize {
        self.shares as usize
    }

    /// Number of shares required to reconstruct.
    pub fn threshold(&self) -> usize {
        self.threshold as usize
    }

    /// Degree of the per-byte polynomials, `threshold - 1`.
    pub fn degree(&self) -> u8 {
        self.threshold - 1
    }
}
