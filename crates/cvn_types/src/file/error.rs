//! Error types for container parsing and manipulation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bitmap::PixelFormat;

/// The four kinds of CVN containers, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
	/// `.cv0`: XOR-obfuscated text
	Text,
	/// `.cv1`: XOR-obfuscated comma separated records
	Table,
	/// `.cv2`: palette-indexed or truecolor bitmap
	Bitmap,
	/// `.cv3`: raw PCM audio without a RIFF header
	Audio,
}

impl FileType {
	/// All container kinds, in extension order.
	pub const ALL: [FileType; 4] = [Self::Text, Self::Table, Self::Bitmap, Self::Audio];

	/// Returns the file extension (without the dot) used for this container kind.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Text => "cv0",
			Self::Table => "cv1",
			Self::Bitmap => "cv2",
			Self::Audio => "cv3",
		}
	}

	/// Resolves a container kind from a bare extension, ignoring ASCII case.
	pub fn from_extension(extension: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|ty| ty.extension().eq_ignore_ascii_case(extension))
	}

	/// Infers the container kind from the extension of `path`.
	///
	/// # Errors
	///
	/// Returns [`CvnError::UnsupportedExtension`] when the path has no extension
	/// or the extension is not one of `cv0`..`cv3`.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CvnError> {
		let path = path.as_ref();
		let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
		Self::from_extension(extension)
			.ok_or_else(|| CvnError::UnsupportedExtension(path.display().to_string()))
	}
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text => write!(f, "Text"),
			Self::Table => write!(f, "Table"),
			Self::Bitmap => write!(f, "Bitmap"),
			Self::Audio => write!(f, "Audio"),
		}
	}
}

/// Unified error type for every container codec.
#[derive(Debug, Error)]
pub enum CvnError {
	/// The container kind could not be inferred from a path
	#[error("Unsupported extension: {0}")]
	UnsupportedExtension(String),

	/// Bitmap raw-format byte is not 0x08, 0x18 or 0x20
	#[error("Unsupported bitmap format: 0x{raw_format:02X}")]
	UnsupportedSubformat {
		/// Raw format byte found in the header
		raw_format: u8,
	},

	/// An indexed bitmap was opened without a palette source
	#[error("Indexed bitmap requires a palette, but none was given")]
	MissingPalette,

	/// Palette marker byte is not 0x10
	#[error("Malformed palette: expected marker 0x10, got 0x{marker:02X}")]
	MalformedPalette {
		/// Marker byte found at the start of the palette
		marker: u8,
	},

	/// Replacement pixels use a different encoding than the open image
	#[error("Pixel format mismatch: image is {expected}, replacement is {actual}")]
	FormatMismatch {
		/// Format of the currently open image
		expected: PixelFormat,
		/// Format of the rejected replacement
		actual: PixelFormat,
	},

	/// Replacement pixels have different dimensions than the open image
	#[error(
		"Image size mismatch: image is {}x{}, replacement is {}x{}",
		expected.0, expected.1, actual.0, actual.1
	)]
	SizeMismatch {
		/// (width, height) of the currently open image
		expected: (u32, u32),
		/// (width, height) of the rejected replacement
		actual: (u32, u32),
	},

	/// Operation has no defined semantics for this container kind
	#[error("{operation} is not implemented for {file_type} containers")]
	Unimplemented {
		/// Container kind
		file_type: FileType,
		/// Name of the unsupported operation
		operation: &'static str,
	},

	/// Not enough data to parse a structure
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Container kind
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Bitmap header dimensions are structurally invalid
	#[error("Invalid bitmap dimensions: width {width}, height {height}, data width {data_width}")]
	InvalidDimensions {
		/// Visible width
		width: i32,
		/// Height
		height: i32,
		/// Stored row width
		data_width: i32,
	},

	/// Operation requires an open container
	#[error("{file_type} container is not loaded")]
	NotLoaded {
		/// Container kind
		file_type: FileType,
	},

	/// Audio parameter block describes a format that cannot be played as PCM
	#[error("Unsupported wave format tag: 0x{format_tag:04X}")]
	UnsupportedWaveFormat {
		/// `wFormatTag` from the parameter block
		format_tag: u16,
	},

	/// Input does not start with the expected magic bytes
	#[error("{file_type}: invalid magic, expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Container kind
		file_type: FileType,
		/// Expected magic bytes
		expected: [u8; 4],
		/// Bytes found instead
		actual: [u8; 4],
	},

	/// Text encoding label is not known to `encoding_rs`
	#[error("Unknown text encoding: {0}")]
	UnknownEncoding(String),

	/// Interchange image error
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// WAV error
	#[error(transparent)]
	Wav(#[from] hound::Error),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl CvnError {
	/// Shorthand for [`CvnError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Shorthand for [`CvnError::Unimplemented`].
	pub fn unimplemented(file_type: FileType, operation: &'static str) -> Self {
		Self::Unimplemented {
			file_type,
			operation,
		}
	}
}
