//! extension dispatch test

use std::fs;

use cvn_rs::prelude::file::xor;
use cvn_rs::prelude::*;

use super::scratch_dir;

#[test_log::test]
fn test_dispatch_by_extension() {
	let dir = scratch_dir("dispatch-ext");
	fs::write(dir.join("a.cv0"), xor::apply(b"text")).unwrap();
	fs::write(dir.join("b.CV1"), xor::apply(b"x,y\r\n")).unwrap();
	fs::write(dir.join("c.cv3"), [0u8; 20]).unwrap();

	let mut bitmap = vec![0x20];
	for value in [1i32, 1, 1] {
		bitmap.extend_from_slice(&value.to_le_bytes());
	}
	bitmap.extend_from_slice(&[0; 8]);
	fs::write(dir.join("d.cv2"), &bitmap).unwrap();

	let expected = [
		("a.cv0", FileType::Text),
		("b.CV1", FileType::Table),
		("c.cv3", FileType::Audio),
		("d.cv2", FileType::Bitmap),
	];
	for (name, file_type) in expected {
		let container = open_path(dir.join(name), None, None).unwrap();
		assert_eq!(container.file_type(), file_type, "{name}");
		assert!(container.is_loaded());
	}
}

#[test_log::test]
fn test_declared_type_overrides_extension() {
	let dir = scratch_dir("dispatch-declared");
	let path = dir.join("strings.dat");
	fs::write(&path, xor::apply(b"k,v\r\n")).unwrap();

	assert!(matches!(open_path(&path, None, None), Err(CvnError::UnsupportedExtension(_))));

	let container = open_path(&path, Some(FileType::Table), None).unwrap();
	let json = serde_json::to_value(container.summary()).unwrap();
	assert_eq!(json["type"], "table");
	assert_eq!(json["records"], 1);
}

#[test_log::test]
fn test_summary_json_for_audio() {
	let dir = scratch_dir("dispatch-json");
	let path = dir.join("voice.cv3");
	fs::write(&path, [0u8; 24]).unwrap();

	let mut container = open_path(&path, None, None).unwrap();
	let json = serde_json::to_value(container.summary()).unwrap();
	assert_eq!(json["type"], "audio");
	assert_eq!(json["wav_len"], 24 + 0x1C);
	assert_eq!(json["format"]["channels"], 0);

	container.close();
	container.close();
	assert!(!container.is_loaded());
}

#[test_log::test]
fn test_summary_json_for_bitmap_header() {
	let dir = scratch_dir("dispatch-bitmap-json");
	let path = dir.join("face.cv2");
	let mut bitmap = vec![0x18];
	for value in [2i32, 1, 3] {
		bitmap.extend_from_slice(&value.to_le_bytes());
	}
	bitmap.extend_from_slice(&[9, 8, 7, 6]);
	bitmap.extend_from_slice(&[0; 12]);
	fs::write(&path, &bitmap).unwrap();

	let container = open_path(&path, None, None).unwrap();
	let json = serde_json::to_value(container.summary()).unwrap();
	assert_eq!(json["type"], "bitmap");
	assert_eq!(json["has_palette"], false);
	assert_eq!(json["header"]["raw_format"], 0x18);
	assert_eq!(json["header"]["width"], 2);
	assert_eq!(json["header"]["data_width"], 3);
	assert_eq!(json["header"]["reserved"], serde_json::json!([9, 8, 7, 6]));
}
