//! bitmap support test

use std::fs;

use cvn_rs::prelude::*;
use image::{Rgba, RgbaImage};

use super::scratch_dir;

fn gradient(width: u32, height: u32) -> RgbaImage {
	RgbaImage::from_fn(width, height, |x, y| Rgba([(x * 40) as u8, (y * 60) as u8, 128, 255]))
}

#[test_log::test]
fn test_truecolor_create_save_extract() {
	let dir = scratch_dir("bitmap-truecolor");
	let path = dir.join("face.cv2");
	let image = gradient(5, 3);

	let mut bitmap = BitmapFile::create(Pixels::from_rgba_image(&image), None).unwrap();
	bitmap.save(&path).unwrap();
	assert_eq!(fs::metadata(&path).unwrap().len(), 0x11 + 5 * 3 * 4);

	let mut reopened = BitmapFile::open(&path, None).unwrap();
	assert_eq!(reopened.pixel_format(), Some(PixelFormat::Argb32));
	assert_eq!(reopened.header().map(|h| h.raw_format()), Some(0x20));

	let png = dir.join("face.png");
	reopened.extract(&png).unwrap();
	let decoded = image::open(&png).unwrap().to_rgba8();
	assert_eq!(decoded, image);
}

#[test_log::test]
fn test_indexed_with_palette_file() {
	let dir = scratch_dir("bitmap-indexed");
	let path = dir.join("map.cv2");
	let palette_path = dir.join("map.pal");

	let mut palette = Palette::new();
	palette.set_raw(1, 0x7C00);
	palette.set_raw(2, 0x001F);
	palette.save(&palette_path).unwrap();

	// width 3, data width 4, height 2
	let mut data = vec![0x08];
	for value in [3i32, 2, 4] {
		data.extend_from_slice(&value.to_le_bytes());
	}
	data.extend_from_slice(&[0x55; 4]);
	data.extend_from_slice(&[0, 1, 2, 9, 2, 1, 0, 9]);
	fs::write(&path, &data).unwrap();

	assert!(matches!(BitmapFile::open(&path, None), Err(CvnError::MissingPalette)));

	let mut bitmap = BitmapFile::open(&path, Some(palette_path.as_path())).unwrap();
	let image = bitmap.to_rgba_image().unwrap();
	assert_eq!(image.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
	assert_eq!(image.get_pixel(0, 1), &Rgba([0, 0, 255, 255]));

	let saved = bitmap.to_bytes().unwrap();
	assert_eq!(&saved[..0x11], &data[..0x11]);
	assert_eq!(&saved[0x11..], &[0, 1, 2, 0, 2, 1, 0, 0]);
}

#[test_log::test]
fn test_replace_truecolor_pixels() {
	let dir = scratch_dir("bitmap-replace");
	let path = dir.join("bg.cv2");

	let mut bitmap = BitmapFile::create(Pixels::from_rgba_image(&gradient(2, 2)), None).unwrap();
	bitmap.save(&path).unwrap();

	let replacement = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
	let mut bitmap = BitmapFile::open(&path, None).unwrap();
	bitmap.set_data(Pixels::from_rgba_image(&replacement)).unwrap();
	bitmap.save(&path).unwrap();

	let reopened = BitmapFile::open(&path, None).unwrap();
	assert_eq!(reopened.to_rgba_image().unwrap(), replacement);
	assert!(matches!(
		bitmap.set_data(Pixels::from_rgba_image(&gradient(3, 2))),
		Err(CvnError::SizeMismatch { .. })
	));
}
