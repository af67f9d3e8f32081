// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// Module: mac (message authentication codes)

//! Keyed message authentication code (MAC) support: the incremental
//! accumulator trait, the algorithm registry, and key loading helpers.

pub mod hmac;
pub mod key;
pub mod registry;
