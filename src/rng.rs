//! Randomness for polynomial coefficients and share coordinates.
//!
//! All randomness is drawn through [`rand::RngCore::try_fill_bytes`] from a
//! generator that is also a [`rand::CryptoRng`]. The public API defaults to
//! [`rand::rngs::OsRng`]; the `*_with_rng` entry points accept any other
//! cryptographic generator (a seeded ChaCha20 in tests, a hardware source in
//! production).
//!
//! A failing source is surfaced as
//! [`SecretSharingError::RandomnessUnavailable`] and is never retried or
//! replaced with a fallback.

use rand::{CryptoRng, RngCore};
use tracing::{trace, warn};

use crate::error::{Result, SecretSharingError};

/// Fills `buf` with random bytes, propagating source failures.
pub(crate) fn fill<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf).map_err(|err| {
        warn!(error = %err, "random source failed");
        SecretSharingError::RandomnessUnavailable(err)
    })
}

/// Draws `count` distinct, non-zero share coordinates.
///
/// Coordinates are sampled as raw bytes; zero (the origin, whose evaluation
/// is the secret itself) and already-chosen values are rejected and redrawn.
/// The returned order is the draw order.
///
/// `count` must not exceed 255, which parameter validation guarantees.
pub(crate) fn draw_coordinates<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Result<Vec<u8>> {
    debug_assert!(count <= 255);

    let mut taken = [false; 256];
    taken[0] = true;

    let mut coordinates = Vec::with_capacity(count);
    let mut draws = 0usize;
    let mut byte = [0u8; 1];

    while coordinates.len() < count {
        fill(rng, &mut byte)?;
        draws += 1;

        let x = byte[0];
        if taken[x as usize] {
            continue;
        }

        taken[x as usize] = true;
        coordinates.push(x);
    }

    trace!(count, draws, "drew share coordinates");
    Ok(coordinates)
}
