//! Random polynomials with a fixed intercept.
//!
//! Each secret byte is hidden as the constant term of its own polynomial of
//! degree `threshold - 1` whose other coefficients are uniformly random. A
//! share's byte is the polynomial evaluated at the share's coordinate.
//!
//! Polynomials are built for one secret byte, evaluated at every coordinate
//! and dropped. Reusing one across bytes would let `threshold - 1` colluding
//! holders solve for its coefficients and read every byte it protects.

use std::fmt;

use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::field::Gf256;
use crate::rng;

/// A polynomial over GF(2^8), coefficients in increasing degree order:
///
/// ```text
/// f(x) = c[0] + c[1]·x + c[2]·x² + ...
/// ```
#[derive(Clone)]
pub struct Polynomial {
    coefficients: Vec<Gf256>,
}

impl Polynomial {
    /// Builds a polynomial of the given degree with `intercept` as its
    /// constant term and random higher coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`RandomnessUnavailable`](crate::SecretSharingError::RandomnessUnavailable)
    /// if `rng` cannot supply bytes.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(
        intercept: u8,
        degree: u8,
        rng: &mut R,
    ) -> Result<Self> {
        let mut raw = vec![0u8; degree as usize + 1];
        raw[0] = intercept;
        rng::fill(rng, &mut raw[1..])?;

        Ok(Self {
            coefficients: raw.into_iter().map(Gf256::from).collect(),
        })
    }

    /// The constant term, i.e. the value at `x = 0`.
    pub fn intercept(&self) -> u8 {
        self.coefficients[0].value()
    }

    /// Degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients in increasing degree order.
    #[cfg(test)]
    pub(crate) fn coefficients(&self) -> &[Gf256] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `x` using Horner's method.
    ///
    /// The origin is answered directly with the intercept.
    pub fn evaluate(&self, x: u8) -> u8 {
        if x == 0 {
            return self.intercept();
        }

        let x = Gf256::from(x);
        let degree = self.degree();

        self.coefficients[..degree]
            .iter()
            .rev()
            .fold(self.coefficients[degree], |acc, &c| acc * x + c)
            .value()
    }
}

impl fmt::Debug for Polynomial {
    // coefficients are secret material
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.degree())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::error::SecretSharingError;
    use crate::field::{add, mult};
    use crate::rng::tests::BrokenRng;

    #[test]
    fn keeps_intercept() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let p = Polynomial::random(42, 2, &mut rng).unwrap();

        assert_eq!(p.intercept(), 42);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coefficients().len(), 3);
    }

    #[test]
    fn evaluates_origin_as_intercept() {
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        for intercept in 0..=255u8 {
            let p = Polynomial::random(intercept, 4, &mut rng).unwrap();
            assert_eq!(p.evaluate(0), intercept);
        }
    }

    #[test]
    fn evaluates_linear_polynomial() {
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let p = Polynomial::random(42, 1, &mut rng).unwrap();
        let r = p.coefficients()[1].value();

        assert_eq!(p.evaluate(0), 42);
        assert_eq!(p.evaluate(1), add(42, mult(1, r)));
    }

    #[test]
    fn horner_matches_direct_sum() {
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let p = Polynomial::random(0x5a, 5, &mut rng).unwrap();

        for x in 1..=255u8 {
            let mut expected = Gf256::ZERO;
            let mut power = Gf256::ONE;
            for &c in p.coefficients() {
                expected += c * power;
                power *= Gf256::from(x);
            }
            assert_eq!(p.evaluate(x), expected.value());
        }
    }

    #[test]
    fn debug_hides_coefficients() {
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let p = Polynomial::random(0x99, 1, &mut rng).unwrap();

        assert!(!format!("{p:?}").contains("0x99"));
    }

    #[test]
    fn broken_source_fails() {
        let result = Polynomial::random(1, 3, &mut BrokenRng);
        assert!(matches!(result, Err(SecretSharingError::RandomnessUnavailable(_))));
    }
}
