//! Whole-buffer split and combine.
//!
//! These functions take the entire secret (or the entire set of shares) in
//! memory. They come in two framings that share all the arithmetic:
//!
//! - keyed: [`split`] returns a map from coordinate to share bytes, and
//!   [`combine`] takes any map-like collection of the same shape;
//! - tagged: [`split_tagged`] returns self-describing shares whose last byte
//!   is the coordinate, and [`combine_tagged`] reads them back.
//!
//! [`refresh`] re-randomises a complete set of keyed shares without
//! reconstructing the secret.
//!
//! ## Cryptographic notes
//!
//! - Each secret byte is protected by its own polynomial of degree
//!   `threshold - 1`, with coefficients from a cryptographic generator.
//! - Coordinates are drawn at random from `1..=255`; the origin is never
//!   assigned to a share.
//! - Combining fewer than `threshold` shares returns a wrong secret rather
//!   than an error. Nothing in a share records the threshold, so the shortfall
//!   cannot be detected; this is what makes smaller coalitions learn nothing.
//! - Shares carry no integrity protection. A tampered share silently yields a
//!   wrong secret.

use std::collections::BTreeMap;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::dealer::Dealer;
use crate::error::{Result, SecretSharingError};
use crate::interpolate::reconstruct_into;
use crate::params::SharingParams;
use crate::share::ShareFormat;
use crate::stream::Writer;

/// Splits `secret` into `shares` keyed shares, any `threshold` of which
/// reconstruct it.
///
/// Every returned share is exactly `secret.len()` bytes long; its coordinate
/// is the map key.
///
/// # Errors
///
/// - [`SecretSharingError::InvalidParameters`] unless
///   `2 <= threshold <= shares <= 255`;
/// - [`SecretSharingError::EmptySecret`] if `secret` is empty;
/// - [`SecretSharingError::RandomnessUnavailable`] if the OS random source
///   fails.
pub fn split(secret: &[u8], shares: usize, threshold: usize) -> Result<BTreeMap<u8, Vec<u8>>> {
    split_with_rng(secret, shares, threshold, &mut OsRng)
}

/// [`split`] with a caller-supplied cryptographic generator.
#[tracing::instrument(skip_all, name = "batch::split", fields(shares = shares, threshold = threshold, len = secret.len()))]
pub fn split_with_rng<R: RngCore + CryptoRng + ?Sized>(
    secret: &[u8],
    shares: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<BTreeMap<u8, Vec<u8>>> {
    let params = SharingParams::new(shares, threshold)?;
    if secret.is_empty() {
        return Err(SecretSharingError::EmptySecret);
    }

    let dealer = Dealer::new(params, rng)?;
    let mut outputs = vec![Vec::new(); params.shares()];
    dealer.deal(secret, rng, &mut outputs)?;

    Ok(dealer.coordinates().iter().copied().zip(outputs).collect())
}

/// Reconstructs a secret from keyed shares.
///
/// `parts` is any collection of `(coordinate, share)` pairs, typically a
/// `&BTreeMap<u8, Vec<u8>>` or `&HashMap<u8, Vec<u8>>`.
///
/// # Errors
///
/// - [`SecretSharingError::InsufficientShares`] if fewer than two shares are
///   given;
/// - [`SecretSharingError::LengthMismatch`] if the shares differ in length;
/// - [`SecretSharingError::EmptyShares`] if the shares are empty;
/// - [`SecretSharingError::InvalidCoordinate`] if a share is keyed 0;
/// - [`SecretSharingError::DuplicatePartCoordinate`] if a coordinate
///   repeats.
#[tracing::instrument(skip_all, name = "batch::combine")]
pub fn combine<'a, I, V>(parts: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a u8, &'a V)>,
    V: AsRef<[u8]> + ?Sized + 'a,
{
    let parts: Vec<(u8, &[u8])> = parts.into_iter().map(|(&x, v)| (x, v.as_ref())).collect();
    let (xs, columns) = validate_parts(&parts)?;

    let mut secret = vec![0u8; columns[0].len()];
    reconstruct_into(&xs, &columns, &mut secret);

    debug!(shares = xs.len(), len = secret.len(), "combined secret");
    Ok(secret)
}

/// Splits `secret` into self-describing shares.
///
/// Each share is `secret.len() + 1` bytes: the evaluations followed by the
/// share's coordinate.
///
/// # Errors
///
/// As for [`split`].
pub fn split_tagged(secret: &[u8], shares: usize, threshold: usize) -> Result<Vec<Vec<u8>>> {
    split_tagged_with_rng(secret, shares, threshold, &mut OsRng)
}

/// [`split_tagged`] with a caller-supplied cryptographic generator.
#[tracing::instrument(skip_all, name = "batch::split_tagged", fields(shares = shares, threshold = threshold, len = secret.len()))]
pub fn split_tagged_with_rng<R: RngCore + CryptoRng + ?Sized>(
    secret: &[u8],
    shares: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Vec<u8>>> {
    let mut writer = Writer::with_rng(
        shares,
        threshold,
        ShareFormat::Tagged,
        |_| Ok(Vec::<u8>::with_capacity(secret.len() + ShareFormat::Tagged.overhead())),
        rng,
    )?;
    writer.write_secret(secret)?;

    Ok(writer.close()?.into_values().collect())
}

/// Reconstructs a secret from tagged shares.
///
/// # Errors
///
/// - [`SecretSharingError::InsufficientShares`] if fewer than two shares are
///   given;
/// - [`SecretSharingError::LengthMismatch`] if the shares differ in length;
/// - [`SecretSharingError::EmptyShares`] if the shares hold nothing but the
///   tag;
/// - [`SecretSharingError::InvalidCoordinate`] if a share is tagged 0;
/// - [`SecretSharingError::DuplicatePartCoordinate`] if two shares carry
///   the same tag.
#[tracing::instrument(skip_all, name = "batch::combine_tagged", fields(shares = parts.len()))]
pub fn combine_tagged<P: AsRef<[u8]>>(parts: &[P]) -> Result<Vec<u8>> {
    if parts.len() < 2 {
        return Err(SecretSharingError::InsufficientShares(parts.len()));
    }

    let len = parts[0].as_ref().len();
    if parts.iter().any(|p| p.as_ref().len() != len) {
        return Err(SecretSharingError::LengthMismatch);
    }
    if len <= ShareFormat::Tagged.overhead() {
        return Err(SecretSharingError::EmptyShares);
    }

    let parts: Vec<(u8, &[u8])> = parts
        .iter()
        .map(|p| {
            let bytes = p.as_ref();
            (bytes[len - 1], &bytes[..len - 1])
        })
        .collect();
    let (xs, columns) = validate_parts(&parts)?;

    let mut secret = vec![0u8; len - 1];
    reconstruct_into(&xs, &columns, &mut secret);

    Ok(secret)
}

/// Re-randomises a complete set of keyed shares, keeping the secret.
///
/// Each share `y` at coordinate `x` becomes `y + g(x)` for a fresh random
/// polynomial `g` of degree `threshold - 1` with `g(0) = 0`, one polynomial
/// per secret byte. The refreshed shares reconstruct the same secret, and
/// mixing old and new shares yields garbage, so shares leaked before the
/// refresh become useless.
///
/// # Errors
///
/// - [`SecretSharingError::InvalidParameters`] unless
///   `2 <= threshold <= parts <= 255`;
/// - the validation errors of [`combine`];
/// - [`SecretSharingError::RandomnessUnavailable`] if the OS random source
///   fails.
pub fn refresh<'a, I, V>(parts: I, threshold: usize) -> Result<BTreeMap<u8, Vec<u8>>>
where
    I: IntoIterator<Item = (&'a u8, &'a V)>,
    V: AsRef<[u8]> + ?Sized + 'a,
{
    refresh_with_rng(parts, threshold, &mut OsRng)
}

/// [`refresh`] with a caller-supplied cryptographic generator.
#[tracing::instrument(skip_all, name = "batch::refresh", fields(threshold = threshold))]
pub fn refresh_with_rng<'a, I, V, R>(
    parts: I,
    threshold: usize,
    rng: &mut R,
) -> Result<BTreeMap<u8, Vec<u8>>>
where
    I: IntoIterator<Item = (&'a u8, &'a V)>,
    V: AsRef<[u8]> + ?Sized + 'a,
    R: RngCore + CryptoRng + ?Sized,
{
    let parts: Vec<(u8, &[u8])> = parts.into_iter().map(|(&x, v)| (x, v.as_ref())).collect();
    let params = SharingParams::new(parts.len(), threshold)?;
    let (xs, columns) = validate_parts(&parts)?;

    let len = columns[0].len();
    let dealer = Dealer::with_coordinates(params.degree(), xs);
    let mut masks = vec![Vec::with_capacity(len); parts.len()];
    dealer.deal(&vec![0u8; len], rng, &mut masks)?;

    Ok(dealer
        .coordinates()
        .iter()
        .zip(columns.iter().zip(masks))
        .map(|(&x, (old, mask))| {
            let refreshed: Vec<u8> = old.iter().zip(mask).map(|(&y, g)| y ^ g).collect();
            (x, refreshed)
        })
        .collect())
}

/// Checks a set of `(coordinate, evaluations)` pairs and splits it into
/// coordinates and columns.
fn validate_parts<'a>(parts: &[(u8, &'a [u8])]) -> Result<(Vec<u8>, Vec<&'a [u8]>)> {
    if parts.len() < 2 {
        return Err(SecretSharingError::InsufficientShares(parts.len()));
    }

    let len = parts[0].1.len();
    if parts.iter().any(|(_, data)| data.len() != len) {
        return Err(SecretSharingError::LengthMismatch);
    }
    if len == 0 {
        return Err(SecretSharingError::EmptyShares);
    }

    let mut seen = [false; 256];
    for &(x, _) in parts {
        if x == 0 {
            return Err(SecretSharingError::InvalidCoordinate);
        }
        if seen[x as usize] {
            return Err(SecretSharingError::DuplicatePartCoordinate(x));
        }
        seen[x as usize] = true;
    }

    Ok(parts.iter().copied().unzip())
}
