//! text container support test

use std::fs;

use cvn_rs::prelude::file::xor;
use cvn_rs::prelude::*;
use encoding_rs::{SHIFT_JIS, UTF_8};

use super::scratch_dir;

#[test_log::test]
fn test_known_ciphertext_on_disk() {
	let dir = scratch_dir("text-known");
	let path = dir.join("known.cv0");

	let mut text = TextFile::new();
	text.set_data(vec![0x00, 0x01, 0x02]).unwrap();
	text.save(&path).unwrap();
	assert_eq!(fs::read(&path).unwrap(), [0x8B, 0xFD, 0x00]);

	let reopened = TextFile::open(&path).unwrap();
	assert_eq!(reopened.raw(), &[0x00, 0x01, 0x02]);
}

#[test_log::test]
fn test_shift_jis_roundtrip() {
	let dir = scratch_dir("text-sjis");
	let path = dir.join("story.cv0");
	let message = "こんにちは、世界\r\n";

	let mut text = TextFile::new();
	text.set_text(message);
	text.save(&path).unwrap();

	let (expected, _, _) = SHIFT_JIS.encode(message);
	assert_eq!(fs::read(&path).unwrap(), xor::apply(&expected));

	let mut reopened = TextFile::open(&path).unwrap();
	assert_eq!(reopened.encoding(), SHIFT_JIS);
	assert_eq!(reopened.text(), message);

	let plain = dir.join("story.txt");
	reopened.extract(&plain).unwrap();
	assert_eq!(fs::read(&plain).unwrap(), &expected[..]);
}

#[test_log::test]
fn test_reinterpret_encoding() {
	let dir = scratch_dir("text-utf8");
	let path = dir.join("utf8.cv0");
	fs::write(&path, xor::apply("héllo".as_bytes())).unwrap();

	let mut text = TextFile::open_with_encoding(&path, UTF_8).unwrap();
	assert_eq!(text.text(), "héllo");

	text.set_encoding(SHIFT_JIS);
	assert_eq!(text.raw(), "héllo".as_bytes());
	assert_ne!(text.text(), "héllo");
}

#[test_log::test]
fn test_open_missing_file_fails() {
	let dir = scratch_dir("text-missing");
	assert!(matches!(TextFile::open(dir.join("nope.cv0")), Err(CvnError::IOError(_))));
}
