//! Lifecycle contract shared by every container codec.

use std::io::{BufWriter, Write};
use std::path::Path;

use super::{CvnError, FileType};

/// Common operations of the four container codecs.
///
/// Opening is codec specific (text encodings, companion palettes), so it is
/// not part of the trait. Everything after a successful open is.
pub trait Container {
	/// Decoded representation exposed by [`Container::data`].
	type Data;

	/// Container kind handled by this codec.
	fn file_type(&self) -> FileType;

	/// Returns `true` once a container has been opened or created.
	fn is_loaded(&self) -> bool;

	/// Returns the decoded data, or `None` when nothing is loaded.
	fn data(&self) -> Option<&Self::Data>;

	/// Replaces the decoded data.
	///
	/// # Errors
	///
	/// Fails when the replacement is incompatible with the open container.
	fn set_data(&mut self, data: Self::Data) -> Result<(), CvnError>;

	/// Encodes the container into its on-disk layout.
	///
	/// # Errors
	///
	/// Fails when nothing is loaded or the writer fails.
	fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError>;

	/// Writes the decoded data to `path` in an interchange format.
	///
	/// # Errors
	///
	/// Fails when nothing is loaded or the file cannot be written.
	fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError>;

	/// Releases the loaded data. Safe to call any number of times.
	fn close(&mut self);

	/// Encodes the container into a byte vector.
	fn to_bytes(&mut self) -> Result<Vec<u8>, CvnError> {
		let mut buffer = Vec::new();
		self.write_to(&mut buffer)?;
		Ok(buffer)
	}

	/// Encodes the container and writes it to `path`.
	fn save(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		let path = path.as_ref();
		log::debug!("Saving {} container to {}", self.file_type(), path.display());
		let mut writer = BufWriter::new(std::fs::File::create(path)?);
		self.write_to(&mut writer)?;
		writer.flush()?;
		Ok(())
	}
}
