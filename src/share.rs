//! Shares and how their coordinate travels with them.
//!
//! A share is a non-zero coordinate `x` plus one evaluation per secret byte.
//! The coordinate can be carried two ways:
//!
//! - [`ShareFormat::Keyed`]: out of band, as the key under which the share's
//!   bytes are stored (a map key, a file name, a database column). Shares are
//!   exactly as long as the secret.
//! - [`ShareFormat::Tagged`]: appended as one trailing byte, so the share is
//!   self-describing. Shares are one byte longer than the secret.
//!
//! Both formats are produced by the same dealing and interpolation code;
//! only the framing differs.

use std::fmt;

use crate::error::{Result, SecretSharingError};

/// Bytes added to each share by the keyed format.
pub const SHARE_OVERHEAD_KEYED: usize = 0;

/// Bytes added to each share by the tagged format (the trailing coordinate).
pub const SHARE_OVERHEAD_TAGGED: usize = 1;

/// How a share's coordinate is carried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShareFormat {
    /// Coordinate carried out of band.
    Keyed,
    /// Coordinate appended as the share's final byte.
    #[default]
    Tagged,
}

impl ShareFormat {
    /// Number of bytes this format adds to every share.
    pub const fn overhead(self) -> usize {
        match self {
            ShareFormat::Keyed => SHARE_OVERHEAD_KEYED,
            ShareFormat::Tagged => SHARE_OVERHEAD_TAGGED,
        }
    }

    /// The trailer to write after the evaluations of share `x`, if any.
    pub(crate) fn trailer(self, x: u8) -> Option<u8> {
        match self {
            ShareFormat::Keyed => None,
            ShareFormat::Tagged => Some(x),
        }
    }
}

/// A single share: a coordinate and its evaluations.
#[derive(Clone, PartialEq, Eq)]
pub struct Share {
    x: u8,
    data: Vec<u8>,
}

impl Share {
    /// Builds a share from its coordinate and evaluations.
    ///
    /// # Errors
    ///
    /// Returns [`SecretSharingError::InvalidCoordinate`] if `x` is zero.
    pub fn new(x: u8, data: Vec<u8>) -> Result<Self> {
        if x == 0 {
            return Err(SecretSharingError::InvalidCoordinate);
        }

        Ok(Self { x, data })
    }

    /// Parses a tagged share: evaluations followed by the coordinate.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::EmptyShares`] if there is no evaluation byte
    ///   in front of the tag;
    /// - [`SecretSharingError::InvalidCoordinate`] if the tag is zero.
    pub fn from_tagged(bytes: &[u8]) -> Result<Self> {
        match bytes.split_last() {
            Some((&x, data)) if !data.is_empty() => Self::new(x, data.to_vec()),
            _ => Err(SecretSharingError::EmptyShares),
        }
    }

    /// Encodes the share in the tagged format.
    pub fn to_tagged(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + SHARE_OVERHEAD_TAGGED);
        out.extend_from_slice(&self.data);
        out.push(self.x);
        out
    }

    /// The share's coordinate.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// The share's evaluations, one per secret byte.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the share, returning its evaluations.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x)
            .field("len", &self.data.len())
            .finish()
    }
}
