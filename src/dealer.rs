//! Per-byte dealing shared by the batch and streaming codecs.
//!
//! A [`Dealer`] owns a set of share coordinates and a polynomial degree. For
//! every secret byte it builds a fresh random polynomial with that byte as
//! intercept and appends the polynomial's value at each coordinate to that
//! coordinate's output.

use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::params::SharingParams;
use crate::polynomial::Polynomial;
use crate::rng;

#[derive(Debug)]
pub(crate) struct Dealer {
    degree: u8,
    coordinates: Vec<u8>,
}

impl Dealer {
    /// Draws `params.shares()` fresh coordinates.
    pub(crate) fn new<R: RngCore + CryptoRng + ?Sized>(
        params: SharingParams,
        rng: &mut R,
    ) -> Result<Self> {
        let coordinates = rng::draw_coordinates(rng, params.shares())?;

        Ok(Self::with_coordinates(params.degree(), coordinates))
    }

    /// Deals over coordinates chosen by the caller. They must be distinct and
    /// non-zero.
    pub(crate) fn with_coordinates(degree: u8, coordinates: Vec<u8>) -> Self {
        debug_assert!(!coordinates.contains(&0));

        Self {
            degree,
            coordinates,
        }
    }

    pub(crate) fn coordinates(&self) -> &[u8] {
        &self.coordinates
    }

    /// Appends one evaluation per byte of `secret` to each output.
    ///
    /// `outputs[k]` receives the evaluations at `coordinates()[k]`. On error
    /// the outputs may hold evaluations for a prefix of `secret`.
    pub(crate) fn deal<R: RngCore + CryptoRng + ?Sized>(
        &self,
        secret: &[u8],
        rng: &mut R,
        outputs: &mut [Vec<u8>],
    ) -> Result<()> {
        debug_assert_eq!(outputs.len(), self.coordinates.len());

        for output in outputs.iter_mut() {
            output.reserve(secret.len());
        }

        for &byte in secret {
            let polynomial = Polynomial::random(byte, self.degree, rng)?;

            for (output, &x) in outputs.iter_mut().zip(&self.coordinates) {
                output.push(polynomial.evaluate(x));
            }
        }

        Ok(())
    }
}
