//! In-memory pixel buffer used by the bitmap codec.

use image::{Rgba, RgbaImage};

use super::PixelFormat;
use super::palette::Palette;
use crate::file::{CvnError, FileType};

/// Row alignment of [`Pixels`] in bytes.
pub const ROW_ALIGNMENT: usize = 4;

/// Row-major pixel buffer.
///
/// Indexed buffers hold one palette index per pixel. Truecolor buffers hold
/// four bytes per pixel in stored order (B, G, R, A). Rows are padded to
/// [`ROW_ALIGNMENT`]; the padding is never part of a row returned by
/// [`Pixels::row`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pixels {
	format: PixelFormat,
	width: u32,
	height: u32,
	stride: usize,
	data: Vec<u8>,
}

impl Pixels {
	/// Creates a zero-filled buffer.
	pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
		let stride = Self::stride_for(format, width);
		Self {
			format,
			width,
			height,
			stride,
			data: vec![0; stride * height as usize],
		}
	}

	/// Builds a buffer from tightly packed rows (`width × bytes per pixel`
	/// bytes each).
	///
	/// # Errors
	///
	/// Returns [`CvnError::InsufficientData`] if `packed` is not exactly
	/// `width × height × bytes per pixel` bytes long.
	pub fn from_packed(
		format: PixelFormat,
		width: u32,
		height: u32,
		packed: &[u8],
	) -> Result<Self, CvnError> {
		let row_len = width as usize * format.bytes_per_pixel();
		let expected = row_len * height as usize;
		if packed.len() != expected {
			return Err(CvnError::insufficient_data(FileType::Bitmap, expected, packed.len()));
		}

		let mut pixels = Self::new(format, width, height);
		if row_len > 0 {
			for (y, src) in packed.chunks_exact(row_len).enumerate() {
				pixels.row_mut(y as u32).copy_from_slice(src);
			}
		}
		Ok(pixels)
	}

	/// Converts an RGBA image into a truecolor buffer.
	pub fn from_rgba_image(image: &RgbaImage) -> Self {
		let (width, height) = image.dimensions();
		let mut pixels = Self::new(PixelFormat::Argb32, width, height);
		for (x, y, Rgba([r, g, b, a])) in image.enumerate_pixels() {
			pixels.pixel_mut(x, y).copy_from_slice(&[*b, *g, *r, *a]);
		}
		pixels
	}

	fn stride_for(format: PixelFormat, width: u32) -> usize {
		(width as usize * format.bytes_per_pixel()).next_multiple_of(ROW_ALIGNMENT)
	}

	/// Pixel encoding.
	pub fn format(&self) -> PixelFormat {
		self.format
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// `(width, height)`
	pub fn dimensions(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Distance between rows in bytes, including alignment padding.
	pub fn stride(&self) -> usize {
		self.stride
	}

	/// Whole buffer including row padding.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Meaningful bytes of row `y`.
	///
	/// # Panics
	///
	/// Panics if `y >= height`.
	pub fn row(&self, y: u32) -> &[u8] {
		let start = y as usize * self.stride;
		&self.data[start..start + self.row_len()]
	}

	/// Meaningful bytes of row `y`, mutably.
	///
	/// # Panics
	///
	/// Panics if `y >= height`.
	pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
		let start = y as usize * self.stride;
		let len = self.row_len();
		&mut self.data[start..start + len]
	}

	/// Bytes of the pixel at `(x, y)`: one index or four B, G, R, A bytes.
	///
	/// # Panics
	///
	/// Panics if the coordinates are out of bounds.
	pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
		let bpp = self.format.bytes_per_pixel();
		let start = x as usize * bpp;
		&self.row(y)[start..start + bpp]
	}

	/// Bytes of the pixel at `(x, y)`, mutably.
	///
	/// # Panics
	///
	/// Panics if the coordinates are out of bounds.
	pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
		let bpp = self.format.bytes_per_pixel();
		let start = x as usize * bpp;
		&mut self.row_mut(y)[start..start + bpp]
	}

	/// Iterates over the meaningful bytes of every row.
	pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
		(0..self.height).map(move |y| self.row(y))
	}

	fn row_len(&self) -> usize {
		self.width as usize * self.format.bytes_per_pixel()
	}

	/// Converts to an RGBA image, resolving indices through `palette`.
	///
	/// # Errors
	///
	/// Returns [`CvnError::MissingPalette`] for an indexed buffer without a
	/// palette.
	pub fn to_rgba_image(&self, palette: Option<&Palette>) -> Result<RgbaImage, CvnError> {
		let mut image = RgbaImage::new(self.width, self.height);
		match self.format {
			PixelFormat::Indexed8 => {
				let palette = palette.ok_or(CvnError::MissingPalette)?;
				for (x, y, pixel) in image.enumerate_pixels_mut() {
					*pixel = Rgba(palette.get(self.pixel(x, y)[0]).to_array());
				}
			}
			PixelFormat::Argb32 => {
				for (x, y, pixel) in image.enumerate_pixels_mut() {
					let bgra = self.pixel(x, y);
					*pixel = Rgba([bgra[2], bgra[1], bgra[0], bgra[3]]);
				}
			}
		}
		Ok(image)
	}
}
