//! Benchmark helper utilities for cvn-rs
//!
//! This module generates synthetic containers for the benchmark suite. The
//! formats are simple enough that synthetic data exercises the same paths as
//! game files.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Size of the bitmap header
const BITMAP_HEADER_SIZE: usize = 0x11;

/// Generates `len` bytes of deterministic, non-repeating-looking plaintext.
pub fn generate_plaintext(len: usize) -> Vec<u8> {
	let mut rng = SmallRng::seed_from_u64(0x2545_F491);
	let mut data = vec![0u8; len];
	rng.fill(&mut data[..]);
	data
}

/// Generates a bitmap container with the given raw format and a data width
/// of `width + padding`.
pub fn generate_bitmap(raw_format: u8, width: u32, height: u32, padding: u32) -> Vec<u8> {
	let data_width = width + padding;
	let bytes_per_pixel = if raw_format == 0x08 {
		1
	} else {
		4
	};

	let mut data = Vec::with_capacity(
		BITMAP_HEADER_SIZE + (data_width * height) as usize * bytes_per_pixel,
	);
	data.push(raw_format);
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend_from_slice(&data_width.to_le_bytes());
	data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
	data.extend(generate_plaintext((data_width * height) as usize * bytes_per_pixel));
	data
}

/// Generates a palette file with a gray ramp.
pub fn generate_palette() -> Vec<u8> {
	let mut data = vec![0x10];
	for i in 0..256u16 {
		let v = i >> 3;
		data.extend_from_slice(&((v << 10) | (v << 5) | v).to_le_bytes());
	}
	data
}

/// Generates header-less 16-bit mono PCM audio with `samples` samples.
pub fn generate_raw_audio(samples: usize) -> Vec<u8> {
	let mut data = Vec::with_capacity(16 + samples * 2);
	data.extend_from_slice(&1u16.to_le_bytes());
	data.extend_from_slice(&1u16.to_le_bytes());
	data.extend_from_slice(&22050u32.to_le_bytes());
	data.extend_from_slice(&44100u32.to_le_bytes());
	data.extend_from_slice(&2u16.to_le_bytes());
	data.extend_from_slice(&16u16.to_le_bytes());
	data.extend(generate_plaintext(samples * 2));
	data
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generators() {
		assert_eq!(generate_plaintext(10).len(), 10);
		assert_eq!(generate_plaintext(64), generate_plaintext(64));
		assert_eq!(generate_bitmap(0x08, 3, 2, 1).len(), BITMAP_HEADER_SIZE + 8);
		assert_eq!(generate_bitmap(0x20, 3, 2, 1).len(), BITMAP_HEADER_SIZE + 32);
		assert_eq!(generate_palette().len(), 513);
		assert_eq!(generate_raw_audio(4).len(), 24);
	}
}
