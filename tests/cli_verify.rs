// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: macstream

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

use macstream::msv::mac::registry::create_accumulator;
use tempfile::tempdir;

const KEY: &[u8] = b"devkey##123";
const PAYLOAD: &[u8] = b"helloworld! sealed for transport";

fn seal(payload: &[u8]) -> Vec<u8> {
	let (mut mac, _) =
		create_accumulator("hmac-sha256", KEY).expect("accumulator");
	mac.update(payload);
	let mut sealed = payload.to_vec();
	sealed.extend_from_slice(&mac.finalize());
	sealed
}

#[test]
fn verify_writes_payload_to_output_file() {
	let dir = tempdir().expect("tempdir");
	let key_path = dir.path().join("key");
	let input_path = dir.path().join("sealed.bin");
	let output_path = dir.path().join("payload.bin");
	fs::write(&key_path, KEY).expect("write key");
	fs::write(&input_path, seal(PAYLOAD)).expect("write input");

	let mut cmd = cargo_bin_cmd!("msv");
	cmd.args([
		"verify",
		"--algorithm",
		"hmac-sha256",
		"--key-file",
		key_path.to_str().unwrap(),
		"--output",
		output_path.to_str().unwrap(),
		input_path.to_str().unwrap(),
	])
	.assert()
	.success();

	let payload = fs::read(&output_path).expect("payload written");
	assert_eq!(payload, PAYLOAD);
}

#[test]
fn verify_streams_stdin_to_stdout_with_hex_key() {
	let key_hex = hex::encode(KEY);
	let mut cmd = cargo_bin_cmd!("msv");
	let assert = cmd
		.args([
			"verify",
			"--algorithm",
			"hmac-sha256",
			"--key-hex",
			key_hex.as_str(),
		])
		.write_stdin(seal(PAYLOAD))
		.assert()
		.success();
	assert_eq!(assert.get_output().stdout, PAYLOAD);
}

#[test]
fn tampered_input_fails_with_diagnostic() {
	let dir = tempdir().expect("tempdir");
	let key_path = dir.path().join("key");
	let input_path = dir.path().join("sealed.bin");
	fs::write(&key_path, KEY).expect("write key");
	let mut sealed = seal(PAYLOAD);
	sealed[4] ^= 0x20;
	fs::write(&input_path, sealed).expect("write input");

	let mut cmd = cargo_bin_cmd!("msv");
	let assert = cmd
		.args([
			"verify",
			"--algorithm",
			"hmac-sha256",
			"--key-file",
			key_path.to_str().unwrap(),
			input_path.to_str().unwrap(),
		])
		.assert()
		.failure();
	let stderr =
		String::from_utf8(assert.get_output().stderr.clone())
			.expect("stderr utf8");
	assert!(stderr.contains("MAC verification failed"));
}

#[test]
fn verify_without_key_flags_is_an_error() {
	let mut cmd = cargo_bin_cmd!("msv");
	cmd.args(["verify", "--algorithm", "hmac-sha256"])
		.write_stdin(seal(PAYLOAD))
		.assert()
		.failure();
}

#[test]
fn algorithms_lists_the_catalog() {
	let mut cmd = cargo_bin_cmd!("msv");
	let assert = cmd.arg("algorithms").assert().success();
	let stdout =
		String::from_utf8(assert.get_output().stdout.clone())
			.expect("stdout utf8");
	assert!(stdout.contains("hmac-sha256"));
	assert!(stdout.contains("hmac-sha1"));
	assert!(stdout.contains("legacy"));
}
