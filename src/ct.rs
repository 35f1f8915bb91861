//! Branch-free helpers for the field arithmetic.
//!
//! Field operands are derived from secret bytes, polynomial coefficients and
//! share values, so the code that consumes them must not branch on their
//! value. The helpers here turn comparisons into all-ones / all-zero masks
//! using only shifts and wrapping arithmetic, which compile down to
//! straight-line code.

/// Returns `1` if `x == 0` and `0` otherwise, in constant time.
#[inline(always)]
pub(crate) fn is_zero(x: u8) -> u8 {
    let mut y = x as u64;

    y = y.wrapping_sub(1);
    y >>= 63;
    y as u8
}

/// Returns `0xFF` if `x != 0` and `0x00` if `x == 0`, in constant time.
#[inline(always)]
pub(crate) fn nonzero_mask(x: u8) -> u8 {
    is_zero(x).wrapping_sub(1)
}

/// Reduces `v` modulo 255 for any `v < 510` without branching.
///
/// Log-domain sums and differences of two table entries always land in
/// `0..510`, so a single masked subtraction is enough.
#[inline(always)]
pub(crate) fn reduce_mod_255(v: u16) -> u8 {
    debug_assert!(v < 510);

    let t = v.wrapping_sub(255);
    // all ones when `v < 255`, i.e. when the subtraction borrowed
    let keep = (t >> 15).wrapping_neg();

    ((v & keep) | (t & !keep)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_detection() {
        assert_eq!(is_zero(0), 1);
        for x in 1..=255u8 {
            assert_eq!(is_zero(x), 0);
        }
    }

    #[test]
    fn masks() {
        assert_eq!(nonzero_mask(0), 0x00);
        for x in 1..=255u8 {
            assert_eq!(nonzero_mask(x), 0xFF);
        }
    }

    #[test]
    fn reduction_matches_modulo() {
        for v in 0..510u16 {
            assert_eq!(reduce_mod_255(v) as u16, v % 255, "v = {v}");
        }
    }
}
