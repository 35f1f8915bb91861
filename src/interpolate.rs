//! Lagrange interpolation over GF(2^8).
//!
//! Reconstruction never rebuilds the polynomial. Given samples `(x_i, y_i)`
//! of a polynomial, its value at a point `x` is
//!
//! ```text
//! f(x) = Σ_i y_i · Π_{j≠i} (x - x_j) / (x_i - x_j)
//! ```
//!
//! which at `x = 0` is the secret byte. Subtraction is XOR in this field.
//!
//! The work done and the memory touched depend only on the number of samples;
//! the field operations underneath are constant time, so sample values do not
//! influence timing.
//!
//! # Preconditions
//!
//! Coordinates must be pairwise distinct. Two equal coordinates produce a
//! zero denominator, and division by zero panics. Callers deduplicate before
//! getting here.

use crate::field::Gf256;

/// Evaluates at `x` the unique polynomial of degree `< samples.len()` that
/// passes through every `(x_i, y_i)` sample.
///
/// # Panics
///
/// Panics if two samples share a coordinate.
pub fn interpolate(samples: &[(Gf256, Gf256)], x: Gf256) -> Gf256 {
    let mut value = Gf256::ZERO;

    for (i, &(xi, yi)) in samples.iter().enumerate() {
        let mut weight = Gf256::ONE;

        for (j, &(xj, _)) in samples.iter().enumerate() {
            if i != j {
                weight *= (x - xj) / (xi - xj);
            }
        }

        value += weight * yi;
    }

    value
}

/// Recovers the intercept `f(0)` from a set of samples.
///
/// With at least `threshold` samples this is the shared secret byte. With
/// fewer it is a well-defined but unrelated value: that is the secrecy
/// guarantee of the scheme, not an error.
///
/// # Panics
///
/// Panics if two samples share a coordinate.
pub fn interpolate_at_zero(samples: &[(Gf256, Gf256)]) -> Gf256 {
    interpolate(samples, Gf256::ZERO)
}

/// Reconstructs a run of secret bytes position by position.
///
/// `xs[k]` is the coordinate of the share whose evaluations are `columns[k]`.
/// Byte `i` of `out` is interpolated at zero from `(xs[k], columns[k][i])`
/// over all `k`. Every column must be at least `out.len()` long.
pub(crate) fn reconstruct_into(xs: &[u8], columns: &[&[u8]], out: &mut [u8]) {
    debug_assert_eq!(xs.len(), columns.len());

    let mut samples: Vec<(Gf256, Gf256)> = xs
        .iter()
        .map(|&x| (Gf256::from(x), Gf256::ZERO))
        .collect();

    for (i, byte) in out.iter_mut().enumerate() {
        for (sample, column) in samples.iter_mut().zip(columns) {
            sample.1 = Gf256::from(column[i]);
        }

        *byte = interpolate_at_zero(&samples).value();
    }
}
