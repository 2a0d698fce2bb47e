//! Opening containers by declared or inferred kind.

use std::fs::File as FsFile;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use encoding_rs::Encoding;
use log::debug;
use serde::Serialize;

use super::audio::{File as AudioFile, WaveFormat};
use super::bitmap::{File as BitmapFile, Header};
use super::table::File as TableFile;
use super::text::{DEFAULT_ENCODING, File as TextFile};
use super::{Container, CvnError, FileType};

/// A container of any of the four kinds.
#[derive(Debug)]
pub enum AnyContainer<R = FsFile> {
	/// `.cv0`
	Text(TextFile),
	/// `.cv1`
	Table(TableFile),
	/// `.cv2`
	Bitmap(BitmapFile),
	/// `.cv3`
	Audio(AudioFile<R>),
}

/// Short description of an open container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Summary {
	/// Text container
	Text {
		/// Encoding name
		encoding: &'static str,
		/// Plaintext length in bytes
		bytes: usize,
		/// Decoded length in characters
		chars: usize,
	},
	/// Record table
	Table {
		/// Encoding name
		encoding: &'static str,
		/// Number of records
		records: usize,
		/// Widest record
		max_fields: usize,
	},
	/// Bitmap
	Bitmap {
		/// Decoded header
		header: Header,
		/// Whether a palette is attached
		has_palette: bool,
	},
	/// Audio
	Audio {
		/// Length of the header-less source
		source_len: u64,
		/// Length of the synthesized WAV stream
		wav_len: u64,
		/// Decoded parameter block
		format: WaveFormat,
	},
	/// Nothing loaded
	Empty {
		/// Container kind
		file_type: FileType,
	},
}

/// Opens the container at `path`.
///
/// The kind is taken from `file_type` or, when `None`, inferred from the
/// extension. `palette` is only consulted for indexed bitmaps. Text-based
/// containers are decoded as Shift_JIS; use [`AnyContainer::set_encoding`]
/// to reinterpret them.
pub fn open_path(
	path: impl AsRef<Path>,
	file_type: Option<FileType>,
	palette: Option<&Path>,
) -> Result<AnyContainer, CvnError> {
	let path = path.as_ref();
	let file_type = match file_type {
		Some(file_type) => file_type,
		None => FileType::from_path(path)?,
	};
	debug!("Dispatching {} as {file_type}", path.display());

	Ok(match file_type {
		FileType::Text => AnyContainer::Text(TextFile::open(path)?),
		FileType::Table => AnyContainer::Table(TableFile::open(path)?),
		FileType::Bitmap => AnyContainer::Bitmap(BitmapFile::open(path, palette)?),
		FileType::Audio => AnyContainer::Audio(AudioFile::open(path)?),
	})
}

/// Opens a container of kind `file_type` from `reader`.
///
/// `reader` is rewound to its start first. Audio containers keep `reader` as
/// their backing source; the other kinds consume it.
pub fn open_reader<R: Read + Seek>(
	mut reader: R,
	file_type: FileType,
	palette: Option<&mut dyn Read>,
) -> Result<AnyContainer<R>, CvnError> {
	reader.seek(SeekFrom::Start(0))?;
	Ok(match file_type {
		FileType::Text => AnyContainer::Text(TextFile::from_reader(reader, DEFAULT_ENCODING)?),
		FileType::Table => AnyContainer::Table(TableFile::from_reader(reader, DEFAULT_ENCODING)?),
		FileType::Bitmap => AnyContainer::Bitmap(BitmapFile::from_reader(reader, palette)?),
		FileType::Audio => AnyContainer::Audio(AudioFile::from_reader(reader)?),
	})
}

impl<R: Read + Seek> AnyContainer<R> {
	/// Container kind.
	pub fn file_type(&self) -> FileType {
		match self {
			Self::Text(file) => file.file_type(),
			Self::Table(file) => file.file_type(),
			Self::Bitmap(file) => file.file_type(),
			Self::Audio(file) => file.file_type(),
		}
	}

	/// Whether the wrapped container holds data.
	pub fn is_loaded(&self) -> bool {
		match self {
			Self::Text(file) => file.is_loaded(),
			Self::Table(file) => file.is_loaded(),
			Self::Bitmap(file) => file.is_loaded(),
			Self::Audio(file) => file.is_loaded(),
		}
	}

	/// Reinterprets text-based containers under `encoding`. Other kinds are
	/// left untouched.
	pub fn set_encoding(&mut self, encoding: &'static Encoding) {
		match self {
			Self::Text(file) => file.set_encoding(encoding),
			Self::Table(file) => file.set_encoding(encoding),
			Self::Bitmap(_) | Self::Audio(_) => {}
		}
	}

	/// See [`Container::write_to`].
	pub fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError> {
		match self {
			Self::Text(file) => file.write_to(writer),
			Self::Table(file) => file.write_to(writer),
			Self::Bitmap(file) => file.write_to(writer),
			Self::Audio(file) => file.write_to(writer),
		}
	}

	/// See [`Container::to_bytes`].
	pub fn to_bytes(&mut self) -> Result<Vec<u8>, CvnError> {
		let mut buffer = Vec::new();
		self.write_to(&mut buffer)?;
		Ok(buffer)
	}

	/// See [`Container::save`].
	pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		match self {
			Self::Text(file) => file.save(path),
			Self::Table(file) => file.save(path),
			Self::Bitmap(file) => file.save(path),
			Self::Audio(file) => file.save(path),
		}
	}

	/// See [`Container::extract`].
	pub fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		match self {
			Self::Text(file) => file.extract(path),
			Self::Table(file) => file.extract(path),
			Self::Bitmap(file) => file.extract(path),
			Self::Audio(file) => file.extract(path),
		}
	}

	/// See [`Container::close`].
	pub fn close(&mut self) {
		match self {
			Self::Text(file) => file.close(),
			Self::Table(file) => file.close(),
			Self::Bitmap(file) => file.close(),
			Self::Audio(file) => file.close(),
		}
	}

	/// Describes the container.
	pub fn summary(&self) -> Summary {
		let empty = Summary::Empty {
			file_type: self.file_type(),
		};
		match self {
			Self::Text(file) if file.is_loaded() => Summary::Text {
				encoding: file.encoding().name(),
				bytes: file.raw().len(),
				chars: file.text().chars().count(),
			},
			Self::Table(file) if file.is_loaded() => Summary::Table {
				encoding: file.encoding().name(),
				records: file.len(),
				max_fields: file.records().iter().map(|record| record.len()).max().unwrap_or(0),
			},
			Self::Bitmap(file) => match file.header() {
				Some(header) => Summary::Bitmap {
					header: *header,
					has_palette: file.palette().is_some(),
				},
				None => empty,
			},
			Self::Audio(file) => match (file.stream(), file.wave_format()) {
				(Some(stream), Some(format)) => Summary::Audio {
					source_len: stream.source_len(),
					wav_len: stream.len(),
					format,
				},
				_ => empty,
			},
			_ => empty,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::xor;
	use std::io::Cursor;

	#[test]
	fn test_open_reader_text() {
		let encoded = xor::apply(b"hello");
		let container = open_reader(Cursor::new(encoded.clone()), FileType::Text, None).unwrap();
		assert_eq!(container.file_type(), FileType::Text);
		assert_eq!(
			container.summary(),
			Summary::Text {
				encoding: "Shift_JIS",
				bytes: 5,
				chars: 5,
			}
		);

		let mut container = container;
		assert_eq!(container.to_bytes().unwrap(), encoded);
	}

	#[test]
	fn test_open_reader_rewinds() {
		let mut reader = Cursor::new(xor::apply(b"a,b\r\nc\r\n"));
		reader.set_position(4);
		let container = open_reader(reader, FileType::Table, None).unwrap();
		assert!(matches!(container.summary(), Summary::Table { records: 2, max_fields: 2, .. }));

		let mut bitmap = vec![0x20];
		for value in [1i32, 1, 1] {
			bitmap.extend_from_slice(&value.to_le_bytes());
		}
		bitmap.extend_from_slice(&[0, 0, 0, 0, 1, 2, 3, 4]);
		let mut reader = Cursor::new(bitmap);
		reader.seek(SeekFrom::End(0)).unwrap();
		let container = open_reader(reader, FileType::Bitmap, None).unwrap();
		assert!(container.is_loaded());
	}

	#[test]
	fn test_open_reader_table() {
		let encoded = xor::apply(b"a,b\r\n#skip\r\nc\r\n");
		let container = open_reader(Cursor::new(encoded), FileType::Table, None).unwrap();
		assert_eq!(
			container.summary(),
			Summary::Table {
				encoding: "Shift_JIS",
				records: 2,
				max_fields: 2,
			}
		);
	}

	#[test]
	fn test_open_reader_audio_keeps_source() {
		let raw: Vec<u8> = (0..40).collect();
		let mut container = open_reader(Cursor::new(raw.clone()), FileType::Audio, None).unwrap();
		assert!(matches!(container.summary(), Summary::Audio { source_len: 40, wav_len: 68, .. }));
		assert_eq!(container.to_bytes().unwrap(), raw);
	}

	#[test]
	fn test_open_reader_bitmap_requires_palette() {
		let mut data = vec![0x08];
		for value in [1i32, 1, 1] {
			data.extend_from_slice(&value.to_le_bytes());
		}
		data.extend_from_slice(&[0, 0, 0, 0, 7]);
		assert!(matches!(
			open_reader(Cursor::new(data), FileType::Bitmap, None),
			Err(CvnError::MissingPalette)
		));
	}

	#[test]
	fn test_open_path_unsupported_extension() {
		assert!(matches!(
			open_path("scene.png", None, None),
			Err(CvnError::UnsupportedExtension(_))
		));
	}

	#[test]
	fn test_close_leaves_empty_summary() {
		let mut container = open_reader(Cursor::new(xor::apply(b"x")), FileType::Text, None).unwrap();
		container.close();
		assert!(!container.is_loaded());
		assert_eq!(
			container.summary(),
			Summary::Empty {
				file_type: FileType::Text
			}
		);
	}
}
