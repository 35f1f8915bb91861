//! Incremental splitting into caller-supplied sinks.

use std::collections::BTreeMap;
use std::io::{self, Write};

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::dealer::Dealer;
use crate::error::{Result, SecretSharingError};
use crate::params::SharingParams;
use crate::share::ShareFormat;

/// Upper bound on the secret bytes dealt per sink write.
const CHUNK_SIZE: usize = 4096;

/// Splits a secret written to it into one sink per share.
///
/// Every byte written becomes the intercept of a fresh random polynomial, and
/// one evaluation of it is written to each sink. Nothing but the current
/// chunk is held in memory.
///
/// [`close`](Writer::close) finishes the shares: in the tagged format it
/// appends each sink's coordinate as the final byte. A writer dropped without
/// being closed leaves its tagged shares without a tag.
///
/// The writer also implements [`std::io::Write`], so it can be fed with
/// [`io::copy`].
pub struct Writer<W, R = OsRng> {
    dealer: Dealer,
    sinks: Vec<W>,
    scratch: Vec<Vec<u8>>,
    format: ShareFormat,
    bytes_written: usize,
    rng: R,
}

impl<W: Write> Writer<W, OsRng> {
    /// Opens a tagged-share writer with OS randomness.
    ///
    /// `factory` is called once per drawn coordinate to open that share's
    /// sink.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::InvalidParameters`] unless
    ///   `2 <= threshold <= shares <= 255`;
    /// - [`SecretSharingError::RandomnessUnavailable`] if coordinates cannot
    ///   be drawn;
    /// - [`SecretSharingError::SinkOpenFailed`] if `factory` fails.
    pub fn new<F>(shares: usize, threshold: usize, factory: F) -> Result<Self>
    where
        F: FnMut(u8) -> io::Result<W>,
    {
        Self::with_rng(shares, threshold, ShareFormat::Tagged, factory, OsRng)
    }

    /// Opens a writer producing shares in `format`, with OS randomness.
    pub fn with_format<F>(
        shares: usize,
        threshold: usize,
        format: ShareFormat,
        factory: F,
    ) -> Result<Self>
    where
        F: FnMut(u8) -> io::Result<W>,
    {
        Self::with_rng(shares, threshold, format, factory, OsRng)
    }
}

impl<W: Write, R: RngCore + CryptoRng> Writer<W, R> {
    /// Opens a writer drawing all randomness from `rng`.
    #[tracing::instrument(skip_all, name = "Writer::open", fields(shares = shares, threshold = threshold, format = ?format))]
    pub fn with_rng<F>(
        shares: usize,
        threshold: usize,
        format: ShareFormat,
        mut factory: F,
        mut rng: R,
    ) -> Result<Self>
    where
        F: FnMut(u8) -> io::Result<W>,
    {
        let params = SharingParams::new(shares, threshold)?;
        let dealer = Dealer::new(params, &mut rng)?;

        let mut sinks = Vec::with_capacity(params.shares());
        for &x in dealer.coordinates() {
            let sink = factory(x).map_err(|source| {
                warn!(x, error = %source, "failed to open share sink");
                SecretSharingError::SinkOpenFailed { x, source }
            })?;
            sinks.push(sink);
        }

        debug!("opened share sinks");

        Ok(Self {
            dealer,
            sinks,
            scratch: vec![Vec::new(); params.shares()],
            format,
            bytes_written: 0,
            rng,
        })
    }

    /// Splits `secret` and writes one byte per secret byte to every sink.
    ///
    /// Returns the number of secret bytes consumed, always `secret.len()` on
    /// success.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::RandomnessUnavailable`] if polynomial
    ///   coefficients cannot be drawn;
    /// - [`SecretSharingError::SinkWriteFailed`] if any sink rejects a write.
    ///
    /// Either error aborts the call; some sinks may already hold bytes the
    /// others lack, so the shares must be discarded.
    pub fn write_secret(&mut self, secret: &[u8]) -> Result<usize> {
        for chunk in secret.chunks(CHUNK_SIZE) {
            for buf in &mut self.scratch {
                buf.clear();
            }

            self.dealer.deal(chunk, &mut self.rng, &mut self.scratch)?;

            for ((&x, sink), buf) in self
                .dealer
                .coordinates()
                .iter()
                .zip(&mut self.sinks)
                .zip(&self.scratch)
            {
                sink.write_all(buf).map_err(|source| {
                    warn!(x, error = %source, "share sink rejected write");
                    SecretSharingError::SinkWriteFailed { x, source }
                })?;
            }

            self.bytes_written += chunk.len();
        }

        Ok(secret.len())
    }

    /// Total number of secret bytes split so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Coordinates of the shares, in sink order.
    pub fn coordinates(&self) -> &[u8] {
        self.dealer.coordinates()
    }

    /// The format the shares are written in.
    pub fn format(&self) -> ShareFormat {
        self.format
    }

    /// Finishes every share and returns the sinks keyed by coordinate.
    ///
    /// In the tagged format each sink receives its coordinate as the final
    /// byte. Every sink is flushed.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::EmptySecret`] if nothing was written;
    /// - [`SecretSharingError::SinkWriteFailed`] if a sink rejects its tag or
    ///   fails to flush.
    #[tracing::instrument(skip_all, name = "Writer::close", fields(bytes_written = self.bytes_written))]
    pub fn close(self) -> Result<BTreeMap<u8, W>> {
        if self.bytes_written == 0 {
            return Err(SecretSharingError::EmptySecret);
        }

        let mut sinks = BTreeMap::new();
        for (&x, mut sink) in self.dealer.coordinates().iter().zip(self.sinks) {
            if let Some(tag) = self.format.trailer(x) {
                sink.write_all(&[tag])
                    .map_err(|source| SecretSharingError::SinkWriteFailed { x, source })?;
            }
            sink.flush()
                .map_err(|source| SecretSharingError::SinkWriteFailed { x, source })?;

            sinks.insert(x, sink);
        }

        debug!(shares = sinks.len(), "closed share sinks");
        Ok(sinks)
    }
}

impl<W: Write, R: RngCore + CryptoRng> Write for Writer<W, R> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_secret(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}
