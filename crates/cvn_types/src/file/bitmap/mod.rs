//! `.cv2` bitmap support.
//!
//! # File Format
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │ Raw format (1 byte)             │  0x00
//! │ Width (4 bytes, LE)             │  0x01  visible columns
//! │ Height (4 bytes, LE)            │  0x05
//! │ Data width (4 bytes, LE)        │  0x09  stored columns, >= width
//! │ Reserved (4 bytes)              │  0x0D  preserved as-is
//! ├─────────────────────────────────┤
//! │ Pixel rows                      │  0x11
//! │ (data width × height × bpp)     │
//! └─────────────────────────────────┘
//! ```
//!
//! Raw format 0x08 is palette indexed (1 byte per pixel, colors in a
//! companion palette file, see [`Palette`]). 0x18 and 0x20 are both 32-bit
//! truecolor stored as B, G, R, A; the byte is written back unchanged.
//!
//! Only the first `width` columns of a row are meaningful. The remaining
//! `data width - width` columns are encoder padding: they are skipped on
//! load and written as zeros on save.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cvn_types::file::{BitmapFile, Container};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bitmap = BitmapFile::open("face.cv2", Some(Path::new("face.pal")))?;
//! println!("{}x{}", bitmap.width(), bitmap.height());
//! bitmap.extract("face.png")?;
//! # Ok(())
//! # }
//! ```

mod palette;
mod pixels;

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

pub use self::palette::{Color, PALETTE_FILE_SIZE, PALETTE_MARKER, PALETTE_SIZE, Palette};
pub use self::pixels::{Pixels, ROW_ALIGNMENT};

use super::{Container, CvnError, FileType};

/// Bitmap constants.
pub mod constants {
	/// Size of the bitmap header in bytes
	pub const HEADER_SIZE: usize = 0x11;

	/// Raw format byte of indexed bitmaps
	pub const RAW_INDEXED: u8 = 0x08;

	/// Raw format byte of 24-bit-tagged truecolor bitmaps
	pub const RAW_TRUECOLOR_24: u8 = 0x18;

	/// Raw format byte of 32-bit truecolor bitmaps
	pub const RAW_TRUECOLOR_32: u8 = 0x20;
}

/// Pixel encoding of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
	/// One palette index per pixel
	Indexed8,
	/// Four bytes per pixel, B, G, R, A
	Argb32,
}

impl PixelFormat {
	/// Maps a raw format byte to a pixel encoding.
	pub fn from_raw(raw_format: u8) -> Result<Self, CvnError> {
		match raw_format {
			constants::RAW_INDEXED => Ok(Self::Indexed8),
			constants::RAW_TRUECOLOR_24 | constants::RAW_TRUECOLOR_32 => Ok(Self::Argb32),
			_ => Err(CvnError::UnsupportedSubformat {
				raw_format,
			}),
		}
	}

	/// Raw format byte used when authoring a new bitmap.
	pub const fn default_raw(self) -> u8 {
		match self {
			Self::Indexed8 => constants::RAW_INDEXED,
			Self::Argb32 => constants::RAW_TRUECOLOR_32,
		}
	}

	/// Bytes per pixel.
	pub const fn bytes_per_pixel(self) -> usize {
		match self {
			Self::Indexed8 => 1,
			Self::Argb32 => 4,
		}
	}
}

impl fmt::Display for PixelFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Indexed8 => write!(f, "Indexed8"),
			Self::Argb32 => write!(f, "Argb32"),
		}
	}
}

/// Bitmap header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Header {
	raw_format: u8,
	width: u32,
	height: u32,
	data_width: u32,
	reserved: [u8; 4],
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Creates a header for a new bitmap whose rows carry no padding.
	pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
		Self {
			raw_format: format.default_raw(),
			width,
			height,
			data_width: width,
			reserved: [0; 4],
		}
	}

	/// Parses a header from a byte slice.
	///
	/// # Errors
	///
	/// - [`CvnError::InsufficientData`] for fewer than 17 bytes
	/// - [`CvnError::UnsupportedSubformat`] for an unknown raw format
	/// - [`CvnError::InvalidDimensions`] for negative sizes or
	///   `data width < width`
	pub fn from_bytes(data: &[u8]) -> Result<Self, CvnError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(CvnError::insufficient_data(
				FileType::Bitmap,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let raw_format = data[0];
		PixelFormat::from_raw(raw_format)?;

		let read_i32 = |at: usize| i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
		let width = read_i32(1);
		let height = read_i32(5);
		let data_width = read_i32(9);
		let reserved = [data[13], data[14], data[15], data[16]];

		if width < 0 || height < 0 || data_width < width {
			return Err(CvnError::InvalidDimensions {
				width,
				height,
				data_width,
			});
		}

		Ok(Self {
			raw_format,
			width: width as u32,
			height: height as u32,
			data_width: data_width as u32,
			reserved,
		})
	}

	/// Reads a header from `reader`.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, CvnError> {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		reader.read_exact(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut bytes = [0u8; constants::HEADER_SIZE];
		bytes[0] = self.raw_format;
		bytes[1..5].copy_from_slice(&self.width.to_le_bytes());
		bytes[5..9].copy_from_slice(&self.height.to_le_bytes());
		bytes[9..13].copy_from_slice(&self.data_width.to_le_bytes());
		bytes[13..17].copy_from_slice(&self.reserved);
		bytes
	}

	/// Raw format byte as stored.
	pub fn raw_format(&self) -> u8 {
		self.raw_format
	}

	/// Pixel encoding implied by the raw format byte.
	pub fn pixel_format(&self) -> PixelFormat {
		match self.raw_format {
			constants::RAW_INDEXED => PixelFormat::Indexed8,
			_ => PixelFormat::Argb32,
		}
	}

	/// Visible width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Stored row width in pixels, including padding columns.
	pub fn data_width(&self) -> u32 {
		self.data_width
	}

	/// Reserved field, preserved opaquely.
	pub fn reserved(&self) -> [u8; 4] {
		self.reserved
	}

	/// Bytes per stored row.
	pub fn stored_row_len(&self) -> usize {
		self.data_width as usize * self.pixel_format().bytes_per_pixel()
	}

	/// Meaningful bytes per row.
	pub fn visible_row_len(&self) -> usize {
		self.width as usize * self.pixel_format().bytes_per_pixel()
	}

	/// Size of the pixel payload following the header.
	pub fn payload_len(&self) -> Option<usize> {
		self.stored_row_len().checked_mul(self.height as usize)
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"CV2 Header:\n\
			- Raw Format: 0x{:02X} ({})\n\
			- Width: {} pixels\n\
			- Height: {} pixels\n\
			- Data Width: {} pixels\n\
			- Reserved: {:02X?}",
			self.raw_format,
			self.pixel_format(),
			self.width,
			self.height,
			self.data_width,
			self.reserved,
		)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Image {
	header: Header,
	palette: Option<Palette>,
	pixels: Pixels,
}

/// Bitmap container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
	image: Option<Image>,
}

impl File {
	/// Creates an empty bitmap container.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a bitmap from `path`, with an optional palette file.
	pub fn open(path: impl AsRef<Path>, palette_path: Option<&Path>) -> Result<Self, CvnError> {
		let file = std::fs::File::open(path)?;
		match palette_path {
			Some(palette_path) => {
				let mut palette = std::fs::File::open(palette_path)?;
				Self::from_reader(file, Some(&mut palette as &mut dyn Read))
			}
			None => Self::from_reader(file, None),
		}
	}

	/// Reads a bitmap from `reader`.
	///
	/// `palette` is only consulted for indexed bitmaps, where it is required.
	pub fn from_reader<R: Read>(reader: R, palette: Option<&mut dyn Read>) -> Result<Self, CvnError> {
		let mut file = Self::new();
		file.load(reader, palette)?;
		Ok(file)
	}

	/// Parses an in-memory bitmap.
	pub fn from_bytes(data: &[u8], palette: Option<&[u8]>) -> Result<Self, CvnError> {
		let mut palette = palette;
		Self::from_reader(data, palette.as_mut().map(|p| p as &mut dyn Read))
	}

	/// Authors a new bitmap from `pixels`.
	///
	/// # Errors
	///
	/// Returns [`CvnError::MissingPalette`] for indexed pixels without a
	/// palette.
	pub fn create(pixels: Pixels, palette: Option<Palette>) -> Result<Self, CvnError> {
		let format = pixels.format();
		if format == PixelFormat::Indexed8 && palette.is_none() {
			return Err(CvnError::MissingPalette);
		}

		Ok(Self {
			image: Some(Image {
				header: Header::new(format, pixels.width(), pixels.height()),
				palette: palette.filter(|_| format == PixelFormat::Indexed8),
				pixels,
			}),
		})
	}

	/// Reads a bitmap into this instance, replacing its contents.
	///
	/// On failure the instance is left empty.
	pub fn load<R: Read>(&mut self, reader: R, palette: Option<&mut dyn Read>) -> Result<(), CvnError> {
		self.image = None;
		self.image = Some(Self::decode(reader, palette)?);
		Ok(())
	}

	fn decode<R: Read>(mut reader: R, palette: Option<&mut dyn Read>) -> Result<Image, CvnError> {
		let header = Header::from_reader(&mut reader)?;
		let format = header.pixel_format();

		let payload_len = header.payload_len().ok_or(CvnError::InvalidDimensions {
			width: header.width as i32,
			height: header.height as i32,
			data_width: header.data_width as i32,
		})?;
		let mut payload = Vec::new();
		reader.take(payload_len as u64).read_to_end(&mut payload)?;
		if payload.len() < payload_len {
			return Err(CvnError::insufficient_data(
				FileType::Bitmap,
				Header::SIZE + payload_len,
				Header::SIZE + payload.len(),
			));
		}

		let palette = match format {
			PixelFormat::Indexed8 => {
				let reader = palette.ok_or(CvnError::MissingPalette)?;
				Some(Palette::from_reader(reader)?)
			}
			PixelFormat::Argb32 => None,
		};

		let mut pixels = Pixels::new(format, header.width, header.height);
		let stored = header.stored_row_len();
		let visible = header.visible_row_len();
		for y in 0..header.height {
			let start = y as usize * stored;
			pixels.row_mut(y).copy_from_slice(&payload[start..start + visible]);
		}

		debug!(
			"Decoded {} bitmap {}x{} (data width {})",
			format, header.width, header.height, header.data_width
		);

		Ok(Image {
			header,
			palette,
			pixels,
		})
	}

	fn image(&self) -> Result<&Image, CvnError> {
		self.image.as_ref().ok_or(CvnError::NotLoaded {
			file_type: FileType::Bitmap,
		})
	}

	/// Header of the open bitmap.
	pub fn header(&self) -> Option<&Header> {
		self.image.as_ref().map(|image| &image.header)
	}

	/// Palette of the open bitmap (indexed bitmaps only).
	pub fn palette(&self) -> Option<&Palette> {
		self.image.as_ref().and_then(|image| image.palette.as_ref())
	}

	/// Pixels of the open bitmap.
	pub fn pixels(&self) -> Option<&Pixels> {
		self.image.as_ref().map(|image| &image.pixels)
	}

	/// Visible width, 0 when nothing is loaded.
	pub fn width(&self) -> u32 {
		self.header().map_or(0, Header::width)
	}

	/// Height, 0 when nothing is loaded.
	pub fn height(&self) -> u32 {
		self.header().map_or(0, Header::height)
	}

	/// Pixel encoding of the open bitmap.
	pub fn pixel_format(&self) -> Option<PixelFormat> {
		self.header().map(Header::pixel_format)
	}

	/// Converts the open bitmap to an RGBA image.
	pub fn to_rgba_image(&self) -> Result<RgbaImage, CvnError> {
		let image = self.image()?;
		image.pixels.to_rgba_image(image.palette.as_ref())
	}
}

impl Container for File {
	type Data = Pixels;

	fn file_type(&self) -> FileType {
		FileType::Bitmap
	}

	fn is_loaded(&self) -> bool {
		self.image.is_some()
	}

	fn data(&self) -> Option<&Pixels> {
		self.pixels()
	}

	/// Replaces the pixels of the open bitmap.
	///
	/// The replacement must use the same pixel encoding and have exactly the
	/// same width and height.
	fn set_data(&mut self, data: Pixels) -> Result<(), CvnError> {
		let image = self.image.as_mut().ok_or(CvnError::NotLoaded {
			file_type: FileType::Bitmap,
		})?;

		let expected = image.header.pixel_format();
		if data.format() != expected {
			return Err(CvnError::FormatMismatch {
				expected,
				actual: data.format(),
			});
		}
		let size = (image.header.width, image.header.height);
		if data.dimensions() != size {
			return Err(CvnError::SizeMismatch {
				expected: size,
				actual: data.dimensions(),
			});
		}

		image.pixels = data;
		Ok(())
	}

	fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError> {
		let image = self.image()?;
		let header = &image.header;
		writer.write_all(&header.to_bytes())?;

		let padding = vec![0u8; header.stored_row_len() - header.visible_row_len()];
		for row in image.pixels.rows() {
			writer.write_all(row)?;
			writer.write_all(&padding)?;
		}
		Ok(())
	}

	/// Writes the bitmap as PNG, or in the format implied by the extension
	/// of `path`.
	fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		let path = path.as_ref();
		let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
		self.to_rgba_image()?.save_with_format(path, format)?;
		Ok(())
	}

	fn close(&mut self) {
		self.image = None;
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.header() {
			Some(header) => write!(f, "{header}"),
			None => write!(f, "CV2 (empty)"),
		}
	}
}
