//! Finite field arithmetic over GF(2^8).
//!
//! This module implements the arithmetic of the 256-element field that the
//! sharing scheme runs on. Every byte is a field element; addition is XOR and
//! multiplication / division go through precomputed log and antilog tables
//! (see the `tables` submodule).
//!
//! ## Constant-time discipline
//!
//! Operands are derived from secret bytes and random coefficients. A naive
//! `if a == 0 || b == 0 { return 0 }` would reveal through timing which
//! coefficients or share bytes are zero, so:
//!
//! - both table lookups always happen, including for the zero operand
//!   (whose log entry is a sentinel);
//! - the log-domain sum / difference is reduced modulo 255 without branching;
//! - the zero case is applied afterwards by AND-ing the looked-up value with
//!   a mask derived from the operands.
//!
//! The instruction sequence and the number of memory accesses are therefore
//! identical for every pair of operands.
//!
//! Division by zero is a contract violation and panics: the sharing code
//! only ever divides by differences of distinct coordinates.

mod tables;

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

use crate::ct;

pub(crate) use tables::{EXP_TABLE, LOG_TABLE};

/// An element of GF(2^8).
///
/// Arithmetic operators (`+`, `-`, `*`, `/`) follow field rules rather than
/// integer arithmetic. Conversion to and from `u8` is free.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Gf256(u8);

impl Gf256 {
    /// The additive identity.
    pub const ZERO: Self = Gf256(0);

    /// The multiplicative identity.
    pub const ONE: Self = Gf256(1);

    /// Wraps a raw byte.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Gf256(value)
    }

    /// Returns the underlying byte.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Gf256 {
    #[inline]
    fn from(value: u8) -> Self {
        Gf256(value)
    }
}

impl From<Gf256> for u8 {
    #[inline]
    fn from(element: Gf256) -> Self {
        element.0
    }
}

impl fmt::Debug for Gf256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gf256({:#04x})", self.0)
    }
}

/// Adds two field elements.
///
/// In characteristic 2 addition is XOR, which is also subtraction.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplies two field elements in constant time.
///
/// Returns zero if either operand is zero, otherwise
/// `g^((log a + log b) mod 255)`.
#[inline]
pub fn mult(a: u8, b: u8) -> u8 {
    let log_a = LOG_TABLE[a as usize] as u16;
    let log_b = LOG_TABLE[b as usize] as u16;

    let product = EXP_TABLE[ct::reduce_mod_255(log_a + log_b) as usize];

    product & ct::nonzero_mask(a) & ct::nonzero_mask(b)
}

/// Divides `a` by `b` in constant time.
///
/// # Panics
///
/// Panics if `b` is zero. Division by zero is undefined and never happens
/// when coordinates are distinct, so reaching it means an invariant was
/// already broken upstream.
#[inline]
pub fn div(a: u8, b: u8) -> u8 {
    assert!(b != 0, "division by zero in GF(256)");

    let log_a = LOG_TABLE[a as usize] as u16;
    let log_b = LOG_TABLE[b as usize] as u16;

    // `log_a + 255 - log_b` stays in 1..=509, never underflows
    let quotient = EXP_TABLE[ct::reduce_mod_255(log_a + 255 - log_b) as usize];

    quotient & ct::nonzero_mask(a)
}

impl Add for Gf256 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Gf256(add(self.0, rhs.0))
    }
}

impl AddAssign for Gf256 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Gf256 {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Gf256(add(self.0, rhs.0))
    }
}

impl Mul for Gf256 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Gf256(mult(self.0, rhs.0))
    }
}

impl MulAssign for Gf256 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div for Gf256 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Gf256(div(self.0, rhs.0))
    }
}
