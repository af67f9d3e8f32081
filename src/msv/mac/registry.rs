// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: registry.rs

//! Algorithm registry: metadata, factory dispatch, and the incremental
//! accumulator trait consumed by the verifying reader.

use std::borrow::Cow;

use super::hmac;

/// Incremental MAC state, fed strictly in stream order.
///
/// `finalize` and `verify` both consume the accumulator; `verify` compares in
/// constant time and is what the verifying reader uses at end-of-stream.
pub trait MacAccumulator: Send + 'static {
	fn update(&mut self, data: &[u8]);
	fn finalize(self: Box<Self>) -> Vec<u8>;
	fn verify(self: Box<Self>, expected: &[u8]) -> bool;
	/// Digest length in bytes, fixed per algorithm, always >= 1.
	fn digest_size(&self) -> usize;
}

pub type MacFactory =
	fn(&[u8]) -> Result<Box<dyn MacAccumulator>, MacError>;

/// One registry entry. `digest_size` is advertised here so callers can size
/// buffers without instantiating the algorithm.
#[derive(Clone, Copy)]
pub struct MacAlgorithm {
	pub identifier: &'static str,
	pub display_name: &'static str,
	pub digest_size: usize,
	pub legacy: bool,
	pub factory: MacFactory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacErrorKind {
	UnsupportedAlgorithm,
	InvalidKey,
	InvalidKeyLength,
}

#[derive(Debug)]
pub struct MacError {
	kind: MacErrorKind,
	message: Cow<'static, str>,
}

impl MacError {
	pub fn new(
		kind: MacErrorKind,
		message: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	pub fn kind(&self) -> MacErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		self.message.as_ref()
	}
}

impl std::fmt::Display for MacError {
	fn fmt(
		&self,
		f: &mut std::fmt::Formatter<'_>,
	) -> std::fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for MacError {}

pub fn algorithms() -> &'static [MacAlgorithm] {
	hmac::catalog()
}

pub fn find_algorithm(
	identifier: &str,
) -> Option<&'static MacAlgorithm> {
	algorithms()
		.iter()
		.find(|alg| alg.identifier.eq_ignore_ascii_case(identifier))
}

/// Builds a keyed accumulator for `identifier`, returning its registry entry
/// alongside so callers can inspect digest size and legacy status.
pub fn create_accumulator(
	identifier: &str,
	key: &[u8],
) -> Result<(Box<dyn MacAccumulator>, &'static MacAlgorithm), MacError>
{
	let algorithm = find_algorithm(identifier).ok_or_else(|| {
		MacError::new(
			MacErrorKind::UnsupportedAlgorithm,
			format!("unsupported MAC algorithm `{}`", identifier),
		)
	})?;
	let accumulator = (algorithm.factory)(key)?;
	Ok((accumulator, algorithm))
}
