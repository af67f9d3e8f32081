// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: main.rs

use macstream::msv::app;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	app::run()?;
	Ok(())
}
