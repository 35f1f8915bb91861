//! Incremental reconstruction from caller-supplied sources.

use std::io::{self, Read};

use tracing::{debug, warn};

use crate::error::{Result, SecretSharingError};
use crate::interpolate::reconstruct_into;
use crate::share::ShareFormat;

/// Reconstructs a secret from share streams read in lockstep.
///
/// Each call to [`read_secret`](Reader::read_secret) pulls the same number of
/// bytes from every source and interpolates them position by position. The
/// secret is produced incrementally; only the current chunk is held.
///
/// Tagged streams end with their coordinate. A tagged reader withholds each
/// stream's most recent byte until it knows whether the stream continues, and
/// checks the final byte against the coordinate the stream was registered
/// under.
///
/// Once any stream ends the reader is exhausted and every later read returns
/// `Ok(0)`. Once a read fails the sources are out of lockstep, and every
/// later read returns [`SecretSharingError::ReaderFailed`].
pub struct Reader<R> {
    coordinates: Vec<u8>,
    sources: Vec<R>,
    format: ShareFormat,
    held: Vec<Option<u8>>,
    produced: Vec<bool>,
    scratch: Vec<Vec<u8>>,
    eof: bool,
    failed: bool,
}

impl<R: Read> Reader<R> {
    /// Opens a reader over keyed share streams (no trailing tag).
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::InsufficientShares`] if fewer than two
    ///   sources are given;
    /// - [`SecretSharingError::InvalidCoordinate`] if a source is keyed 0;
    /// - [`SecretSharingError::DuplicatePartCoordinate`] if two sources share
    ///   a key.
    pub fn new<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, R)>,
    {
        Self::with_format(sources, ShareFormat::Keyed)
    }

    /// Opens a reader over tagged share streams, as produced by
    /// [`Writer::new`](crate::Writer::new).
    pub fn new_tagged<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, R)>,
    {
        Self::with_format(sources, ShareFormat::Tagged)
    }

    /// Opens a reader over share streams in `format`.
    #[tracing::instrument(skip_all, name = "Reader::open", fields(format = ?format))]
    pub fn with_format<I>(sources: I, format: ShareFormat) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, R)>,
    {
        let mut seen = [false; 256];
        let mut coordinates = Vec::new();
        let mut readers = Vec::new();

        for (x, source) in sources {
            if x == 0 {
                return Err(SecretSharingError::InvalidCoordinate);
            }
            if seen[x as usize] {
                return Err(SecretSharingError::DuplicatePartCoordinate(x));
            }
            seen[x as usize] = true;

            coordinates.push(x);
            readers.push(source);
        }

        if readers.len() < 2 {
            return Err(SecretSharingError::InsufficientShares(readers.len()));
        }

        debug!(shares = readers.len(), "opened share sources");

        Ok(Self {
            held: vec![None; readers.len()],
            produced: vec![false; readers.len()],
            scratch: vec![Vec::new(); readers.len()],
            coordinates,
            sources: readers,
            format,
            eof: false,
            failed: false,
        })
    }

    /// Coordinates of the sources, in the order they were supplied.
    pub fn coordinates(&self) -> &[u8] {
        &self.coordinates
    }

    /// Whether a source has reached end-of-stream.
    pub fn is_exhausted(&self) -> bool {
        self.eof
    }

    /// Whether an earlier read failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Reconstructs up to `buf.len()` secret bytes.
    ///
    /// Returns the number of bytes produced; `0` once the streams are
    /// exhausted.
    ///
    /// # Errors
    ///
    /// - [`SecretSharingError::SourceReadFailed`] if a source fails;
    /// - [`SecretSharingError::UnequalStreamLengths`] if the sources yield
    ///   different amounts of data for this call;
    /// - [`SecretSharingError::CoordinateMismatch`] if a tagged stream ends
    ///   with a tag other than its key;
    /// - [`SecretSharingError::EmptyShares`] if a tagged stream ends without
    ///   a single byte in front of its tag;
    /// - [`SecretSharingError::ReaderFailed`] on every call after one of the
    ///   errors above.
    pub fn read_secret(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.failed {
            return Err(SecretSharingError::ReaderFailed);
        }
        if self.eof || buf.is_empty() {
            return Ok(0);
        }

        let result = self.read_chunk(buf);
        if let Err(err) = &result {
            warn!(error = %err, "share streams rejected, reader failed");
            self.failed = true;
        }

        result
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let tagged = self.format == ShareFormat::Tagged;
        let mut available: Option<usize> = None;
        let mut ended = false;

        for (k, source) in self.sources.iter_mut().enumerate() {
            let x = self.coordinates[k];
            let chunk = &mut self.scratch[k];
            chunk.clear();

            // the first tagged read asks for one extra byte to hold back
            let held = self.held[k].take();
            let want = buf.len() + usize::from(tagged && held.is_none());
            chunk.extend(held);

            let start = chunk.len();
            chunk.resize(start + want, 0);
            let got = read_full(source, &mut chunk[start..])
                .map_err(|source| SecretSharingError::SourceReadFailed { x, source })?;
            chunk.truncate(start + got);

            let at_end = got < want;
            if tagged {
                match chunk.pop() {
                    Some(tag) if at_end && tag != x => {
                        return Err(SecretSharingError::CoordinateMismatch { expected: x, found: tag });
                    }
                    Some(_) if at_end => {}
                    Some(last) => self.held[k] = Some(last),
                    None => return Err(SecretSharingError::EmptyShares),
                }

                self.produced[k] |= !chunk.is_empty();
                if at_end && !self.produced[k] {
                    return Err(SecretSharingError::EmptyShares);
                }
            }

            match available {
                None => available = Some(chunk.len()),
                Some(m) if m != chunk.len() => return Err(SecretSharingError::UnequalStreamLengths),
                Some(_) => {}
            }
            ended |= at_end;
        }

        let m = available.unwrap_or(0);
        let columns: Vec<&[u8]> = self.scratch.iter().map(|c| &c[..m]).collect();
        reconstruct_into(&self.coordinates, &columns, &mut buf[..m]);

        if ended {
            debug!("share streams exhausted");
            self.eof = true;
        }

        Ok(m)
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_secret(buf)?)
    }
}

/// Reads until `buf` is full or the source ends, retrying interrupted and
/// short reads.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::stream::Writer;

    /// Yields its data one byte per `read` call.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    /// Fails every read.
    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    fn split(secret: &[u8], n: usize, t: usize, format: ShareFormat) -> BTreeMap<u8, Vec<u8>> {
        let rng = ChaCha20Rng::from_seed([41u8; 32]);
        let mut writer = Writer::with_rng(n, t, format, |_| Ok(Vec::<u8>::new()), rng).unwrap();
        writer.write_secret(secret).unwrap();
        writer.close().unwrap()
    }

    fn cursors(shares: &BTreeMap<u8, Vec<u8>>) -> Vec<(u8, Cursor<Vec<u8>>)> {
        shares.iter().map(|(&x, s)| (x, Cursor::new(s.clone()))).collect()
    }

    #[test]
    fn keyed_streams_reconstruct() {
        let shares = split(b"Hello world", 3, 2, ShareFormat::Keyed);
        let mut reader = Reader::new(cursors(&shares).into_iter().take(2)).unwrap();

        let mut secret = Vec::new();
        reader.read_to_end(&mut secret).unwrap();
        assert_eq!(secret, b"Hello world");
        assert!(reader.is_exhausted());
    }

    #[test]
    fn tagged_streams_strip_tag() {
        let shares = split(b"Hello world", 3, 2, ShareFormat::Tagged);
        let mut reader = Reader::new_tagged(cursors(&shares).into_iter().skip(1)).unwrap();

        let mut secret = Vec::new();
        reader.read_to_end(&mut secret).unwrap();
        assert_eq!(secret, b"Hello world");
    }

    #[test]
    fn small_buffers_and_short_reads() {
        let secret: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let shares = split(&secret, 4, 3, ShareFormat::Tagged);
        let sources = shares
            .iter()
            .take(3)
            .map(|(&x, s)| (x, Trickle(Cursor::new(s.clone()))));
        let mut reader = Reader::new_tagged(sources).unwrap();

        let mut out = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            let n = reader.read_secret(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }

        assert_eq!(out, secret);
        assert_eq!(reader.read_secret(&mut buf).unwrap(), 0);
    }

    #[test]
    fn needs_two_sources() {
        let result = Reader::new(vec![(1u8, Cursor::new(vec![1u8]))]);
        assert!(matches!(result, Err(SecretSharingError::InsufficientShares(1))));

        let result = Reader::<Cursor<Vec<u8>>>::new(Vec::new());
        assert!(matches!(result, Err(SecretSharingError::InsufficientShares(0))));
    }

    #[test]
    fn rejects_bad_keys() {
        let result = Reader::new(vec![(0u8, Cursor::new(vec![1u8])), (1, Cursor::new(vec![2]))]);
        assert!(matches!(result, Err(SecretSharingError::InvalidCoordinate)));

        let result = Reader::new(vec![(5u8, Cursor::new(vec![1u8])), (5, Cursor::new(vec![2]))]);
        assert!(matches!(result, Err(SecretSharingError::DuplicatePartCoordinate(5))));
    }

    #[test]
    fn unequal_lengths_fail() {
        let sources = vec![
            (1u8, Cursor::new(vec![1u8, 2, 3])),
            (2, Cursor::new(vec![4u8, 5])),
        ];
        let mut reader = Reader::new(sources).unwrap();

        let mut buf = [0u8; 8];
        assert!(matches!(
            reader.read_secret(&mut buf),
            Err(SecretSharingError::UnequalStreamLengths)
        ));
    }

    #[test]
    fn wrong_tag_is_detected() {
        let mut shares = split(b"abc", 2, 2, ShareFormat::Tagged);
        let (&x, share) = shares.iter_mut().next().unwrap();
        *share.last_mut().unwrap() = x.wrapping_add(1).max(1);

        let mut reader = Reader::new_tagged(cursors(&shares)).unwrap();
        let mut buf = [0u8; 16];
        assert!(matches!(
            reader.read_secret(&mut buf),
            Err(SecretSharingError::CoordinateMismatch { expected, .. }) if expected == x
        ));
    }

    #[test]
    fn empty_tagged_stream_fails() {
        let sources = vec![(1u8, Cursor::new(Vec::new())), (2, Cursor::new(Vec::new()))];
        let mut reader = Reader::new_tagged(sources).unwrap();

        let mut buf = [0u8; 4];
        assert!(matches!(reader.read_secret(&mut buf), Err(SecretSharingError::EmptyShares)));
    }

    #[test]
    fn tag_only_streams_fail() {
        let sources = vec![(1u8, Cursor::new(vec![1u8])), (2, Cursor::new(vec![2u8]))];
        let mut reader = Reader::new_tagged(sources).unwrap();

        let mut buf = [0u8; 4];
        assert!(matches!(reader.read_secret(&mut buf), Err(SecretSharingError::EmptyShares)));
        assert!(!reader.is_exhausted());
    }

    #[test]
    fn tagged_unequal_lengths_fail() {
        let mut shares = split(b"Hello world", 3, 2, ShareFormat::Tagged);
        shares.values_mut().next().unwrap().remove(0);

        let mut reader = Reader::new_tagged(cursors(&shares)).unwrap();
        let mut buf = [0u8; 64];
        assert!(matches!(
            reader.read_secret(&mut buf),
            Err(SecretSharingError::UnequalStreamLengths)
        ));
    }

    #[test]
    fn mismatch_after_good_reads_is_sticky() {
        let sources = vec![
            (1u8, Cursor::new(vec![1u8, 2, 3, 4, 5, 6])),
            (2, Cursor::new(vec![1u8, 2, 3, 4])),
        ];
        let mut reader = Reader::new(sources).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(reader.read_secret(&mut buf).unwrap(), 4);
        assert!(matches!(
            reader.read_secret(&mut buf),
            Err(SecretSharingError::UnequalStreamLengths)
        ));
        assert!(reader.has_failed());

        for _ in 0..2 {
            assert!(matches!(reader.read_secret(&mut buf), Err(SecretSharingError::ReaderFailed)));
        }
        assert!(!reader.is_exhausted());
    }

    #[test]
    fn failed_reader_stays_failed_through_io_read() {
        let sources = vec![(1u8, Cursor::new(vec![1u8])), (2, Cursor::new(vec![2u8]))];
        let mut reader = Reader::new_tagged(sources).unwrap();

        let mut buf = [0u8; 4];
        assert!(reader.read(&mut buf).is_err());

        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn source_failure_is_reported() {
        let sources = vec![(1u8, FailingSource), (2, FailingSource)];
        let mut reader = Reader::new(sources).unwrap();

        let mut buf = [0u8; 4];
        assert!(matches!(
            reader.read_secret(&mut buf),
            Err(SecretSharingError::SourceReadFailed { x: 1, .. })
        ));
    }
}
