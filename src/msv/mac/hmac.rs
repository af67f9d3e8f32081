// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: hmac.rs

//! HMAC accumulators covering SHA-1 (legacy) and SHA-2/SHA-3 variants.

use super::registry::{
	MacAccumulator, MacAlgorithm, MacError, MacErrorKind,
};
use digest::{KeyInit, OutputSizeUser};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use sha3::{Sha3_256, Sha3_512};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;
type HmacSha3_256 = Hmac<Sha3_256>;
type HmacSha3_512 = Hmac<Sha3_512>;

pub(super) fn catalog() -> &'static [MacAlgorithm] {
	const ALGORITHMS: &[MacAlgorithm] = &[
		MacAlgorithm {
			identifier: "hmac-sha1",
			display_name: "HMAC-SHA1",
			digest_size: 20,
			legacy: true,
			factory: build::<HmacSha1>,
		},
		MacAlgorithm {
			identifier: "hmac-sha256",
			display_name: "HMAC-SHA256",
			digest_size: 32,
			legacy: false,
			factory: build::<HmacSha256>,
		},
		MacAlgorithm {
			identifier: "hmac-sha512",
			display_name: "HMAC-SHA512",
			digest_size: 64,
			legacy: false,
			factory: build::<HmacSha512>,
		},
		MacAlgorithm {
			identifier: "hmac-sha3-256",
			display_name: "HMAC-SHA3-256",
			digest_size: 32,
			legacy: false,
			factory: build::<HmacSha3_256>,
		},
		MacAlgorithm {
			identifier: "hmac-sha3-512",
			display_name: "HMAC-SHA3-512",
			digest_size: 64,
			legacy: false,
			factory: build::<HmacSha3_512>,
		},
	];
	ALGORITHMS
}

struct HmacState<M>(M);

impl<M> MacAccumulator for HmacState<M>
where
	M: Mac + Send + 'static,
{
	fn update(&mut self, data: &[u8]) {
		self.0.update(data);
	}

	fn finalize(self: Box<Self>) -> Vec<u8> {
		self.0.finalize().into_bytes().to_vec()
	}

	fn verify(self: Box<Self>, expected: &[u8]) -> bool {
		self.0.verify_slice(expected).is_ok()
	}

	fn digest_size(&self) -> usize {
		<M as OutputSizeUser>::output_size()
	}
}

fn build<M>(key: &[u8]) -> Result<Box<dyn MacAccumulator>, MacError>
where
	M: Mac + KeyInit + Send + 'static,
{
	let mac = <M as Mac>::new_from_slice(key).map_err(|_| {
		MacError::new(
			MacErrorKind::InvalidKeyLength,
			"HMAC key has an unusable length",
		)
	})?;
	Ok(Box::new(HmacState(mac)))
}

#[cfg(test)]
mod tests {
	use super::super::registry::create_accumulator;

	#[test]
	fn finalize_and_verify_agree() {
		let (acc, _) =
			create_accumulator("hmac-sha256", b"Jefe").expect("build");
		let (mut probe, _) =
			create_accumulator("hmac-sha256", b"Jefe").expect("build");
		let digest = acc.finalize();
		probe.update(b"");
		assert!(probe.verify(&digest));
	}
}
