//! Bitmap palette support.
//!
//! Indexed bitmaps take their colors from a companion palette file:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │ Marker (1 byte, always 0x10)    │  0x000
//! ├─────────────────────────────────┤
//! │ 256 × u16 LE, X1R5G5B5          │  0x001-0x200
//! └─────────────────────────────────┘
//! ```
//!
//! The top bit of each entry is reserved and ignored; every palette color is
//! fully opaque.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::file::{CvnError, FileType};

/// Marker byte at the start of a palette file
pub const PALETTE_MARKER: u8 = 0x10;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 256;

/// Size of a palette file in bytes (marker + 256 × 2 bytes)
pub const PALETTE_FILE_SIZE: usize = 1 + PALETTE_SIZE * 2;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Expands a packed X1R5G5B5 value to 8 bits per channel.
	pub const fn from_x1r5g5b5(value: u16) -> Self {
		const fn expand(v: u16) -> u8 {
			let v = (v & 0x1F) as u8;
			(v << 3) | (v >> 2)
		}
		Self::rgb(expand(value >> 10), expand(value >> 5), expand(value))
	}

	/// Packs the color to X1R5G5B5, dropping the low bits and alpha.
	pub const fn to_x1r5g5b5(self) -> u16 {
		((self.r as u16 >> 3) << 10) | ((self.g as u16 >> 3) << 5) | (self.b as u16 >> 3)
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// 256-entry palette of packed 16-bit colors.
///
/// Entries are kept in their packed form so a palette survives a
/// load/save cycle bit for bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	entries: [u16; PALETTE_SIZE],
}

impl Palette {
	/// Creates a palette with every entry black.
	pub fn new() -> Self {
		Self {
			entries: [0; PALETTE_SIZE],
		}
	}

	/// Loads a palette file from `path`.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CvnError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Parses a palette from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, CvnError> {
		let mut reader = data;
		Self::from_reader(&mut reader)
	}

	/// Reads a palette (marker and entries) from `reader`.
	///
	/// # Errors
	///
	/// - [`CvnError::MalformedPalette`] if the marker byte is not 0x10
	/// - [`CvnError::InsufficientData`] if fewer than 513 bytes are available
	pub fn from_reader<R: Read + ?Sized>(reader: &mut R) -> Result<Self, CvnError> {
		let mut data = Vec::with_capacity(PALETTE_FILE_SIZE);
		reader.take(PALETTE_FILE_SIZE as u64).read_to_end(&mut data)?;

		let Some(&marker) = data.first() else {
			return Err(CvnError::insufficient_data(FileType::Bitmap, PALETTE_FILE_SIZE, 0));
		};
		if marker != PALETTE_MARKER {
			return Err(CvnError::MalformedPalette {
				marker,
			});
		}
		if data.len() < PALETTE_FILE_SIZE {
			return Err(CvnError::insufficient_data(
				FileType::Bitmap,
				PALETTE_FILE_SIZE,
				data.len(),
			));
		}

		let mut palette = Self::new();
		for (entry, chunk) in palette.entries.iter_mut().zip(data[1..].chunks_exact(2)) {
			*entry = u16::from_le_bytes([chunk[0], chunk[1]]);
		}
		Ok(palette)
	}

	/// Serializes the palette to the 513-byte file layout.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(PALETTE_FILE_SIZE);
		data.push(PALETTE_MARKER);
		for entry in &self.entries {
			data.extend_from_slice(&entry.to_le_bytes());
		}
		data
	}

	/// Saves the palette to `path`.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		std::fs::write(path, self.to_bytes())?;
		Ok(())
	}

	/// Returns the expanded color at `index`.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		Color::from_x1r5g5b5(self.entries[index as usize])
	}

	/// Returns the packed entry at `index`.
	#[inline]
	pub fn raw(&self, index: u8) -> u16 {
		self.entries[index as usize]
	}

	/// Sets the packed entry at `index`.
	#[inline]
	pub fn set_raw(&mut self, index: u8, value: u16) {
		self.entries[index as usize] = value;
	}

	/// Returns all packed entries.
	pub fn entries(&self) -> &[u16; PALETTE_SIZE] {
		&self.entries
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = u16;

	fn index(&self, index: u8) -> &Self::Output {
		&self.entries[index as usize]
	}
}

impl std::ops::IndexMut<u8> for Palette {
	fn index_mut(&mut self, index: u8) -> &mut Self::Output {
		&mut self.entries[index as usize]
	}
}
