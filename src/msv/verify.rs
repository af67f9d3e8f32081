// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: verify.rs

//! The verifying reader.
//!
//! A sealed stream carries its keyed digest as a fixed-size suffix:
//! `payload || digest`, positional, no delimiter, no length prefix. The
//! payload/digest boundary is therefore unknown until the source is
//! exhausted, so [`AuthenticatedReader`] keeps a lookahead reserve of the
//! most recent `digest_size` bytes and never releases a byte that might
//! still turn out to be part of the trailing digest.

use std::borrow::Cow;
use std::io::{self, Read};

use super::mac::registry::MacAccumulator;

const PULL_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationErrorKind {
	/// The stream ended before a full digest could have been present.
	TruncatedInput,
	/// The recomputed digest does not equal the trailing bytes.
	DigestMismatch,
}

#[derive(Debug)]
pub struct VerificationError {
	kind: VerificationErrorKind,
	message: Cow<'static, str>,
}

impl VerificationError {
	fn truncated(digest_size: usize, got: usize) -> Self {
		Self {
			kind: VerificationErrorKind::TruncatedInput,
			message: format!(
				"stream too short to carry a {}-byte digest (got {} bytes)",
				digest_size, got
			)
			.into(),
		}
	}

	fn mismatch() -> Self {
		Self {
			kind: VerificationErrorKind::DigestMismatch,
			message: Cow::Borrowed(
				"trailing digest does not match stream contents",
			),
		}
	}

	fn from_kind(kind: VerificationErrorKind) -> Self {
		match kind {
			VerificationErrorKind::TruncatedInput => Self {
				kind,
				message: Cow::Borrowed(
					"stream too short to carry a digest",
				),
			},
			VerificationErrorKind::DigestMismatch => Self::mismatch(),
		}
	}

	pub fn kind(&self) -> VerificationErrorKind {
		self.kind
	}
}

impl std::fmt::Display for VerificationError {
	fn fmt(
		&self,
		f: &mut std::fmt::Formatter<'_>,
	) -> std::fmt::Result {
		write!(f, "MAC verification failed: {}", self.message)
	}
}

impl std::error::Error for VerificationError {}

/// Error surface of [`AuthenticatedReader`]. I/O errors from the wrapped
/// source pass through unchanged; both truncation and digest mismatch arrive
/// as the `Verification` variant.
#[derive(Debug)]
pub enum ReadError {
	Io(io::Error),
	Verification(VerificationError),
}

impl std::fmt::Display for ReadError {
	fn fmt(
		&self,
		f: &mut std::fmt::Formatter<'_>,
	) -> std::fmt::Result {
		match self {
			ReadError::Io(err) => write!(f, "{}", err),
			ReadError::Verification(err) => write!(f, "{}", err),
		}
	}
}

impl std::error::Error for ReadError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ReadError::Io(err) => Some(err),
			ReadError::Verification(err) => Some(err),
		}
	}
}

impl From<io::Error> for ReadError {
	fn from(err: io::Error) -> Self {
		ReadError::Io(err)
	}
}

impl From<ReadError> for io::Error {
	fn from(err: ReadError) -> Self {
		match err {
			ReadError::Io(err) => err,
			ReadError::Verification(err) => {
				io::Error::new(io::ErrorKind::InvalidData, err)
			}
		}
	}
}

enum State {
	/// Still pulling from the source; the accumulator is live.
	Streaming(Box<dyn MacAccumulator>),
	/// Source exhausted, digest checked out; `reserve` holds leftover payload.
	Draining,
	/// Verification failed; every further non-empty read re-fails.
	Failed(VerificationErrorKind),
}

/// Chunked reader over a sealed stream that yields only payload bytes and
/// verifies the trailing digest once the source is exhausted.
///
/// Authenticity is only established at end-of-stream. A caller that reads a
/// prefix and drops the reader has acted on unverified bytes; callers that
/// need the whole payload vouched for before use should [`read_all`] and
/// only then touch the result.
///
/// [`read_all`]: AuthenticatedReader::read_all
pub struct AuthenticatedReader<R> {
	source: R,
	digest_size: usize,
	reserve: Vec<u8>,
	state: State,
}

impl<R: Read> AuthenticatedReader<R> {
	pub fn new(mac: Box<dyn MacAccumulator>, source: R) -> Self {
		let digest_size = mac.digest_size();
		Self {
			source,
			digest_size,
			reserve: Vec::new(),
			state: State::Streaming(mac),
		}
	}

	pub fn digest_size(&self) -> usize {
		self.digest_size
	}

	/// Returns up to `limit` payload bytes, pulling from the source as
	/// needed. Short results only occur at end of payload; an empty result
	/// means the payload is done and the digest checked out. `limit == 0`
	/// returns empty without touching source or MAC state.
	pub fn read_chunk(
		&mut self,
		limit: usize,
	) -> Result<Vec<u8>, ReadError> {
		if limit == 0 {
			return Ok(Vec::new());
		}
		if let State::Failed(kind) = &self.state {
			return Err(ReadError::Verification(
				VerificationError::from_kind(*kind),
			));
		}
		if let State::Draining = self.state {
			return Ok(self.release(limit));
		}
		let exhausted = self.fill_reserve(limit)?;
		if exhausted {
			self.finish()?;
			return Ok(self.release(limit));
		}
		// More data may follow, so everything beyond the trailing
		// digest_size window is proven payload.
		let releasable = self.reserve.len() - self.digest_size;
		let chunk: Vec<u8> =
			self.reserve.drain(..limit.min(releasable)).collect();
		if let State::Streaming(mac) = &mut self.state {
			mac.update(&chunk);
		}
		Ok(chunk)
	}

	/// Reads and verifies the entire remaining payload. Equivalent to
	/// calling [`read_chunk`] until it returns empty.
	///
	/// [`read_chunk`]: AuthenticatedReader::read_chunk
	pub fn read_all(&mut self) -> Result<Vec<u8>, ReadError> {
		let mut payload = Vec::new();
		loop {
			let chunk = self.read_chunk(PULL_SIZE)?;
			if chunk.is_empty() {
				return Ok(payload);
			}
			payload.extend_from_slice(&chunk);
		}
	}

	/// Pulls from the source until at least `limit` bytes beyond the digest
	/// window are buffered, or the source is exhausted. Returns whether the
	/// source hit end-of-stream.
	fn fill_reserve(&mut self, limit: usize) -> Result<bool, ReadError> {
		let mut buf = [0u8; PULL_SIZE];
		while self.reserve.len().saturating_sub(self.digest_size)
			< limit
		{
			let pulled = loop {
				match self.source.read(&mut buf) {
					Ok(n) => break n,
					Err(err)
						if err.kind() == io::ErrorKind::Interrupted =>
					{
						continue
					}
					Err(err) => return Err(ReadError::Io(err)),
				}
			};
			if pulled == 0 {
				return Ok(true);
			}
			self.reserve.extend_from_slice(&buf[..pulled]);
		}
		Ok(false)
	}

	/// Terminal step: the reserve now holds all remaining bytes, the last
	/// `digest_size` of which are the claimed digest. Feeds the payload
	/// remainder to the accumulator and verifies, leaving the reader in
	/// `Draining` on success.
	fn finish(&mut self) -> Result<(), ReadError> {
		if self.reserve.len() < self.digest_size {
			let err = VerificationError::truncated(
				self.digest_size,
				self.reserve.len(),
			);
			self.state = State::Failed(err.kind());
			self.reserve.clear();
			return Err(ReadError::Verification(err));
		}
		let tag_start = self.reserve.len() - self.digest_size;
		let tag = self.reserve.split_off(tag_start);
		let state = std::mem::replace(
			&mut self.state,
			State::Failed(VerificationErrorKind::DigestMismatch),
		);
		let mut mac = match state {
			State::Streaming(mac) => mac,
			// finish is only entered from the Streaming arm
			_ => unreachable!("finalization outside streaming state"),
		};
		mac.update(&self.reserve);
		if !mac.verify(&tag) {
			self.reserve.clear();
			return Err(ReadError::Verification(
				VerificationError::mismatch(),
			));
		}
		self.state = State::Draining;
		Ok(())
	}

	fn release(&mut self, limit: usize) -> Vec<u8> {
		let take = limit.min(self.reserve.len());
		self.reserve.drain(..take).collect()
	}
}

impl<R: Read> Read for AuthenticatedReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let chunk =
			self.read_chunk(buf.len()).map_err(io::Error::from)?;
		buf[..chunk.len()].copy_from_slice(&chunk);
		Ok(chunk.len())
	}
}
