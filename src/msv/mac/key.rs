// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: key.rs

//! Loading MAC keys from files, inline hex, or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use super::registry::{MacError, MacErrorKind};
use zeroize::Zeroizing;

#[derive(Debug)]
pub enum KeySource {
	File(PathBuf),
	Hex(String),
	Stdin,
}

impl KeySource {
	pub fn description(&self) -> &'static str {
		match self {
			KeySource::File(_) => "file",
			KeySource::Hex(_) => "hex",
			KeySource::Stdin => "stdin",
		}
	}
}

/// Loads the key material, rejecting empty keys. The returned buffer is
/// zeroized on drop.
pub fn load_key(
	source: &KeySource,
) -> Result<Zeroizing<Vec<u8>>, MacError> {
	let key = match source {
		KeySource::File(path) => {
			Zeroizing::new(fs::read(path).map_err(|err| {
				MacError::new(
					MacErrorKind::InvalidKey,
					format!(
						"failed to read key file `{}`: {}",
						path.display(),
						err
					),
				)
			})?)
		}
		KeySource::Hex(encoded) => Zeroizing::new(
			hex::decode(encoded.trim()).map_err(|err| {
				MacError::new(
					MacErrorKind::InvalidKey,
					format!("key is not valid hex: {}", err),
				)
			})?,
		),
		KeySource::Stdin => {
			let mut buf = Zeroizing::new(Vec::new());
			io::stdin().read_to_end(&mut buf).map_err(|err| {
				MacError::new(
					MacErrorKind::InvalidKey,
					format!("failed to read key from stdin: {}", err),
				)
			})?;
			buf
		}
	};
	if key.is_empty() {
		return Err(MacError::new(
			MacErrorKind::InvalidKey,
			format!("{} key input was empty", source.description()),
		));
	}
	Ok(key)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_key_is_decoded() {
		let source = KeySource::Hex("6465766b6579".into());
		let key = load_key(&source).expect("key");
		assert_eq!(key.as_slice(), b"devkey");
	}

	#[test]
	fn malformed_hex_is_rejected() {
		let source = KeySource::Hex("zz".into());
		let err = load_key(&source).err().expect("error");
		assert_eq!(err.kind(), MacErrorKind::InvalidKey);
	}

	#[test]
	fn empty_hex_key_is_rejected() {
		let source = KeySource::Hex(String::new());
		let err = load_key(&source).err().expect("error");
		assert_eq!(err.kind(), MacErrorKind::InvalidKey);
	}
}
