// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream
// File: app.rs

//! CLI for `msv`: verify sealed files/streams and list MAC algorithms.

use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::msv::mac::key::{load_key, KeySource};
use crate::msv::mac::registry;
use crate::msv::verify::{AuthenticatedReader, ReadError};

#[derive(Parser, Debug)]
#[command(
	name = "msv",
	version,
	about = "Verify MAC-sealed byte streams (payload || digest)."
)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Verify a sealed input and emit its payload.
	Verify {
		/// MAC algorithm identifier (see `msv algorithms`).
		#[arg(short, long)]
		algorithm: String,
		/// Read the key from a file.
		#[arg(long, value_name = "FILE", conflicts_with_all = ["key_hex", "key_stdin"])]
		key_file: Option<PathBuf>,
		/// Take the key as an inline hex string.
		#[arg(long, value_name = "HEX", conflicts_with = "key_stdin")]
		key_hex: Option<String>,
		/// Read the key from stdin (input must then be a file).
		#[arg(long)]
		key_stdin: bool,
		/// Sealed input file; stdin when omitted.
		input: Option<PathBuf>,
		/// Write the payload here instead of stdout.
		#[arg(short, long, value_name = "FILE")]
		output: Option<PathBuf>,
	},
	/// List the supported MAC algorithms.
	Algorithms,
}

pub fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	match cli.command {
		Command::Verify {
			algorithm,
			key_file,
			key_hex,
			key_stdin,
			input,
			output,
		} => {
			let key_source =
				resolve_key_source(key_file, key_hex, key_stdin)?;
			if matches!(key_source, KeySource::Stdin)
				&& input.is_none()
			{
				return Err(
					"stdin cannot supply both the key and the sealed input"
						.into(),
				);
			}
			run_verify(&algorithm, &key_source, input, output)
		}
		Command::Algorithms => {
			list_algorithms();
			Ok(())
		}
	}
}

fn resolve_key_source(
	key_file: Option<PathBuf>,
	key_hex: Option<String>,
	key_stdin: bool,
) -> Result<KeySource, Box<dyn Error>> {
	if let Some(path) = key_file {
		Ok(KeySource::File(path))
	} else if let Some(encoded) = key_hex {
		Ok(KeySource::Hex(encoded))
	} else if key_stdin {
		Ok(KeySource::Stdin)
	} else {
		Err("no key given: use --key-file, --key-hex, or --key-stdin"
			.into())
	}
}

fn run_verify(
	algorithm: &str,
	key_source: &KeySource,
	input: Option<PathBuf>,
	output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
	let key = load_key(key_source)?;
	let (mac, entry) = registry::create_accumulator(algorithm, &key)?;
	if entry.legacy {
		eprintln!(
			"{}",
			format!(
				"warning: {} is legacy; prefer a SHA-2/SHA-3 variant",
				entry.display_name
			)
			.yellow()
		);
	}

	let source: Box<dyn Read> = match &input {
		Some(path) => Box::new(File::open(path).map_err(|err| {
			io::Error::other(format!(
				"failed to open `{}`: {}",
				path.display(),
				err
			))
		})?),
		None => Box::new(io::stdin().lock()),
	};

	let mut reader = AuthenticatedReader::new(mac, source);
	let payload = reader.read_all().map_err(|err| {
		if let ReadError::Verification(_) = &err {
			eprintln!("{}", format!("{}", err).red());
		}
		err
	})?;

	match &output {
		Some(path) => {
			let mut file = File::create(path)?;
			file.write_all(&payload)?;
		}
		None => {
			io::stdout().write_all(&payload)?;
		}
	}
	eprintln!(
		"{}",
		format!(
			"{}: verified {} payload bytes",
			entry.display_name,
			payload.len()
		)
		.green()
	);
	Ok(())
}

fn list_algorithms() {
	for alg in registry::algorithms() {
		let flag = if alg.legacy { "  (legacy)" } else { "" };
		println!(
			"{:<14} {:<14} {:>2} bytes{}",
			alg.identifier, alg.display_name, alg.digest_size, flag
		);
	}
}
