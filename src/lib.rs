// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: lib.rs

//! Streaming verification of MAC-sealed byte streams.
//!
//! A sealed stream is `payload || digest` with the keyed digest appended
//! positionally, no delimiter and no length prefix. [`msv::verify`] holds the
//! reader that strips and checks the trailing digest while streaming the
//! payload through; [`msv::mac`] holds the algorithm registry it is fed with.

pub mod msv {
	pub mod app;
	pub mod mac;
	pub mod verify;
}
