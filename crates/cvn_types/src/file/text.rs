//! `.cv0` text container support.
//!
//! A text container has no header: the whole file is the plaintext run
//! through the keyed XOR schedule (see [`crate::file::xor`]).
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ XOR-obfuscated text bytes            │  0x00 .. EOF
//! └──────────────────────────────────────┘
//! ```
//!
//! The plaintext is interpreted with a caller-selected encoding; the game
//! ships its scripts in Shift_JIS, which is the default.
//!
//! # Examples
//!
//! ```no_run
//! use cvn_types::file::{Container, TextFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut text = TextFile::open("story.cv0")?;
//! println!("{}", text.text());
//!
//! text.set_text("new script");
//! text.save("story_new.cv0")?;
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::io::{Read, Write};
use std::path::Path;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_16BE, UTF_16LE};
use log::{debug, warn};

use super::xor::{XorReader, XorWriter};
use super::{Container, CvnError, FileType};

/// Encoding used when the caller does not pick one.
pub const DEFAULT_ENCODING: &Encoding = SHIFT_JIS;

/// Resolves an encoding label such as `"shift_jis"` or `"utf-8"`.
///
/// # Errors
///
/// Returns [`CvnError::UnknownEncoding`] for labels `encoding_rs` does not know.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, CvnError> {
	Encoding::for_label(label.trim().as_bytes())
		.ok_or_else(|| CvnError::UnknownEncoding(label.to_string()))
}

/// Encodes `text` with `encoding`.
///
/// `encoding_rs` only decodes UTF-16, so those two are encoded here directly.
/// Characters the target encoding cannot represent are replaced with numeric
/// character references and reported with a warning.
pub(crate) fn encode_text(text: &str, encoding: &'static Encoding) -> Vec<u8> {
	if encoding == UTF_16LE {
		return text.encode_utf16().flat_map(u16::to_le_bytes).collect();
	}
	if encoding == UTF_16BE {
		return text.encode_utf16().flat_map(u16::to_be_bytes).collect();
	}

	let (bytes, _, had_unmappable) = encoding.encode(text);
	if had_unmappable {
		warn!("Text contains characters not representable in {}", encoding.name());
	}
	bytes.into_owned()
}

/// Text container with a de-obfuscated buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Plaintext bytes, `None` until opened
	buffer: Option<Vec<u8>>,

	/// Encoding used to interpret `buffer`
	encoding: &'static Encoding,
}

impl File {
	/// Creates an empty text container.
	pub fn new() -> Self {
		Self {
			buffer: None,
			encoding: DEFAULT_ENCODING,
		}
	}

	/// Opens a text container from `path` using the default encoding.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, CvnError> {
		Self::open_with_encoding(path, DEFAULT_ENCODING)
	}

	/// Opens a text container from `path` using `encoding`.
	pub fn open_with_encoding(
		path: impl AsRef<Path>,
		encoding: &'static Encoding,
	) -> Result<Self, CvnError> {
		let file = std::fs::File::open(path)?;
		Self::from_reader(file, encoding)
	}

	/// Reads and de-obfuscates a whole text container from `reader`.
	pub fn from_reader<R: Read>(reader: R, encoding: &'static Encoding) -> Result<Self, CvnError> {
		let mut file = Self::new();
		file.load(reader, encoding)?;
		Ok(file)
	}

	/// De-obfuscates an in-memory text container.
	pub fn from_bytes(data: &[u8], encoding: &'static Encoding) -> Self {
		Self {
			buffer: Some(super::xor::apply(data)),
			encoding,
		}
	}

	/// Reads a container into this instance, replacing its contents.
	///
	/// On failure the instance is left empty.
	pub fn load<R: Read>(&mut self, reader: R, encoding: &'static Encoding) -> Result<(), CvnError> {
		let mut buffer = Vec::new();
		if let Err(e) = XorReader::new(reader).read_to_end(&mut buffer) {
			self.close();
			return Err(e.into());
		}

		debug!("Loaded {} bytes of text ({})", buffer.len(), encoding.name());
		self.buffer = Some(buffer);
		self.encoding = encoding;
		Ok(())
	}

	/// Returns the encoding used to interpret the buffer.
	pub fn encoding(&self) -> &'static Encoding {
		self.encoding
	}

	/// Changes how the buffer is interpreted without touching its bytes.
	pub fn set_encoding(&mut self, encoding: &'static Encoding) {
		self.encoding = encoding;
	}

	/// Returns the de-obfuscated bytes (empty when nothing is loaded).
	pub fn raw(&self) -> &[u8] {
		self.buffer.as_deref().unwrap_or_default()
	}

	/// Decodes the buffer with the stored encoding.
	///
	/// Returns an empty string when nothing is loaded. Malformed sequences
	/// decode to U+FFFD.
	pub fn text(&self) -> Cow<'_, str> {
		match &self.buffer {
			Some(buffer) => self.encoding.decode_without_bom_handling(buffer).0,
			None => Cow::Borrowed(""),
		}
	}

	/// Replaces the buffer with `text` encoded in the stored encoding.
	pub fn set_text(&mut self, text: &str) {
		self.buffer = Some(encode_text(text, self.encoding));
	}

	/// Replaces the buffer with `text` encoded in `encoding`, and keeps
	/// `encoding` for later decoding.
	pub fn set_text_with_encoding(&mut self, text: &str, encoding: &'static Encoding) {
		self.buffer = Some(encode_text(text, encoding));
		self.encoding = encoding;
	}
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl Container for File {
	type Data = Vec<u8>;

	fn file_type(&self) -> FileType {
		FileType::Text
	}

	fn is_loaded(&self) -> bool {
		self.buffer.is_some()
	}

	fn data(&self) -> Option<&Vec<u8>> {
		self.buffer.as_ref()
	}

	fn set_data(&mut self, data: Vec<u8>) -> Result<(), CvnError> {
		self.buffer = Some(data);
		Ok(())
	}

	fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError> {
		let buffer = self.buffer.as_deref().ok_or(CvnError::NotLoaded {
			file_type: FileType::Text,
		})?;

		let mut writer = XorWriter::new(writer);
		writer.write_all(buffer)?;
		writer.flush()?;
		Ok(())
	}

	fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		let buffer = self.buffer.as_deref().ok_or(CvnError::NotLoaded {
			file_type: FileType::Text,
		})?;
		std::fs::write(path, buffer)?;
		Ok(())
	}

	fn close(&mut self) {
		self.buffer = None;
		self.encoding = DEFAULT_ENCODING;
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text())
	}
}
