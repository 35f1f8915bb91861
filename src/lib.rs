//! Threshold secret sharing over GF(2^8).
//!
//! A secret of any length is split into `n` shares such that any `t` of them
//! reconstruct it exactly, while `t - 1` or fewer reveal nothing about it.
//! Every secret byte is the intercept of its own random polynomial of degree
//! `t - 1`; a share holds that polynomial's value at the share's coordinate.
//!
//! The focus is on **predictable, auditable behaviour**: a small field layer
//! with constant-time multiply and divide, plain polynomial and interpolation
//! code on top, and two codecs that share all of it.
//!
//! # Module overview
//!
//! - `field`
//!   GF(2^8) arithmetic over precomputed log/antilog tables for the
//!   reduction polynomial `0x11d`. Multiplication and division run the same
//!   instructions and memory accesses for every operand, zero included.
//!
//! - `polynomial`
//!   Random polynomials with a fixed intercept, evaluated with Horner's
//!   method.
//!
//! - `interpolate`
//!   Lagrange interpolation, in particular at `x = 0` to recover the secret
//!   byte.
//!
//! - `batch`
//!   Whole-buffer [`split`] / [`combine`] with the coordinate carried as a
//!   map key, [`split_tagged`] / [`combine_tagged`] with the coordinate
//!   appended to each share, and [`refresh`] to re-randomise shares without
//!   reconstructing the secret.
//!
//! - `stream`
//!   [`Writer`] and [`Reader`], which split into and combine from arbitrary
//!   byte sinks and sources without holding the whole secret.
//!
//! # Example
//!
//! ```
//! use shamir_gf256::{combine, split};
//!
//! let secret = b"correct horse battery staple";
//! let shares = split(secret, 5, 3)?;
//!
//! let subset: std::collections::BTreeMap<_, _> = shares.into_iter().take(3).collect();
//! assert_eq!(combine(&subset)?, secret);
//! # Ok::<(), shamir_gf256::SecretSharingError>(())
//! ```
//!
//! # Scope
//!
//! This is plain (not verifiable) secret sharing:
//!
//! - shares carry no authentication or integrity tag; a tampered share or a
//!   dishonest dealer goes undetected;
//! - combining fewer than the threshold returns a wrong secret, not an error;
//! - secret material is not zeroised on drop;
//! - where shares are stored or sent is left to the caller.
//!
//! Randomness comes from [`rand::rngs::OsRng`] unless a generator is passed
//! to one of the `*_with_rng` functions. Operations are instrumented with
//! [`tracing`] spans carrying share counts and lengths, never secret bytes.

#![warn(missing_docs)]

mod ct;
mod dealer;
mod rng;

pub mod batch;
pub mod error;
pub mod field;
pub mod interpolate;
pub mod params;
pub mod polynomial;
pub mod share;
pub mod stream;

pub use batch::{
    combine, combine_tagged, refresh, refresh_with_rng, split, split_tagged,
    split_tagged_with_rng, split_with_rng,
};
pub use error::{Result, SecretSharingError};
pub use field::Gf256;
pub use interpolate::{interpolate, interpolate_at_zero};
pub use params::SharingParams;
pub use polynomial::Polynomial;
pub use share::{SHARE_OVERHEAD_KEYED, SHARE_OVERHEAD_TAGGED, Share, ShareFormat};
pub use stream::{Reader, Writer};
