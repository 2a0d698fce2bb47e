//! `.cv3` audio container support.
//!
//! An audio container is a WAV file with its RIFF framing removed: the
//! 16-byte `fmt ` parameter block followed directly by PCM samples.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Parameter block (16 bytes)           │  0x00
//! │   format tag, channels, sample rate, │
//! │   byte rate, block align, bits       │
//! ├──────────────────────────────────────┤
//! │ Samples                              │  0x10
//! └──────────────────────────────────────┘
//! ```
//!
//! [`File`] never materializes the WAV file. It wraps the source in a
//! [`VirtualWavStream`] that synthesizes the missing header on the fly.

mod stream;

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

pub use self::stream::{VirtualWavStream, constants, real_offset};

use self::constants::{DATA_MARKER, DATA_MARKER_OFFSET, HEADER_SIZE, PARAM_OFFSET, PARAM_SIZE, RIFF_MAGIC};
use crate::file::{Container, CvnError, FileType};

/// PCM format tag
const WAVE_FORMAT_PCM: u16 = 0x0001;

/// IEEE float format tag
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;

/// Decoded `fmt ` parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveFormat {
	/// `wFormatTag`
	pub format_tag: u16,
	/// Number of interleaved channels
	pub channels: u16,
	/// Samples per second
	pub sample_rate: u32,
	/// Average bytes per second
	pub byte_rate: u32,
	/// Bytes per sample frame
	pub block_align: u16,
	/// Bits per sample
	pub bits_per_sample: u16,
}

impl WaveFormat {
	/// Parses a 16-byte parameter block.
	pub fn from_bytes(block: &[u8; PARAM_SIZE as usize]) -> Self {
		let u16_at = |at: usize| u16::from_le_bytes([block[at], block[at + 1]]);
		let u32_at = |at: usize| u32::from_le_bytes([block[at], block[at + 1], block[at + 2], block[at + 3]]);
		Self {
			format_tag: u16_at(0),
			channels: u16_at(2),
			sample_rate: u32_at(4),
			byte_rate: u32_at(8),
			block_align: u16_at(12),
			bits_per_sample: u16_at(14),
		}
	}

	/// Serializes back to the 16-byte parameter block.
	pub fn to_bytes(&self) -> [u8; PARAM_SIZE as usize] {
		let mut block = [0u8; PARAM_SIZE as usize];
		block[0..2].copy_from_slice(&self.format_tag.to_le_bytes());
		block[2..4].copy_from_slice(&self.channels.to_le_bytes());
		block[4..8].copy_from_slice(&self.sample_rate.to_le_bytes());
		block[8..12].copy_from_slice(&self.byte_rate.to_le_bytes());
		block[12..14].copy_from_slice(&self.block_align.to_le_bytes());
		block[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
		block
	}

	/// Converts to a [`hound::WavSpec`].
	///
	/// # Errors
	///
	/// Returns [`CvnError::UnsupportedWaveFormat`] unless the tag is PCM or
	/// IEEE float.
	pub fn to_wav_spec(&self) -> Result<hound::WavSpec, CvnError> {
		let sample_format = match self.format_tag {
			WAVE_FORMAT_PCM => hound::SampleFormat::Int,
			WAVE_FORMAT_IEEE_FLOAT => hound::SampleFormat::Float,
			format_tag => {
				return Err(CvnError::UnsupportedWaveFormat {
					format_tag,
				});
			}
		};
		Ok(hound::WavSpec {
			channels: self.channels,
			sample_rate: self.sample_rate,
			bits_per_sample: self.bits_per_sample,
			sample_format,
		})
	}
}

impl fmt::Display for WaveFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"tag 0x{:04X}, {} ch, {} Hz, {} bit",
			self.format_tag, self.channels, self.sample_rate, self.bits_per_sample
		)
	}
}

/// Strips the RIFF framing from a WAV file laid out like the synthesized
/// header, producing container bytes.
///
/// # Errors
///
/// - [`CvnError::InsufficientData`] if `wav` is shorter than the 0x2C-byte header
/// - [`CvnError::InvalidMagic`] if the `RIFF` or `data` markers are missing
pub fn unwrap_wav(wav: &[u8]) -> Result<Vec<u8>, CvnError> {
	let header_size = HEADER_SIZE as usize;
	if wav.len() < header_size {
		return Err(CvnError::insufficient_data(FileType::Audio, header_size, wav.len()));
	}

	let marker_at = |at: usize| [wav[at], wav[at + 1], wav[at + 2], wav[at + 3]];
	for (at, expected) in [(0, RIFF_MAGIC), (DATA_MARKER_OFFSET as usize, DATA_MARKER)] {
		let actual = marker_at(at);
		if actual != expected {
			return Err(CvnError::InvalidMagic {
				file_type: FileType::Audio,
				expected,
				actual,
			});
		}
	}

	let mut raw = Vec::with_capacity(wav.len() - (header_size - PARAM_SIZE as usize));
	raw.extend_from_slice(&wav[PARAM_OFFSET as usize..DATA_MARKER_OFFSET as usize]);
	raw.extend_from_slice(&wav[header_size..]);
	Ok(raw)
}

/// `.cv3` audio container.
///
/// Generic over the source so that files, cursors and any other seekable
/// reader can be exposed as WAV.
#[derive(Debug)]
pub struct File<R = std::fs::File> {
	stream: Option<VirtualWavStream<R>>,
}

impl File<std::fs::File> {
	/// Opens the audio container at `path`.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, CvnError> {
		let path = path.as_ref();
		debug!("Opening audio container {}", path.display());
		Self::from_reader(std::fs::File::open(path)?)
	}
}

impl File<Cursor<Vec<u8>>> {
	/// Wraps an in-memory container.
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, CvnError> {
		Self::from_reader(Cursor::new(data))
	}
}

impl<R> File<R> {
	/// Creates an empty container.
	pub fn new() -> Self {
		Self {
			stream: None,
		}
	}

	/// The virtual WAV stream, if loaded.
	pub fn stream(&self) -> Option<&VirtualWavStream<R>> {
		self.stream.as_ref()
	}

	/// Decoded parameter block, if loaded.
	pub fn wave_format(&self) -> Option<WaveFormat> {
		self.stream.as_ref().map(|stream| WaveFormat::from_bytes(&stream.param_block()))
	}

	/// Releases the container and returns the wrapped source.
	pub fn into_inner(self) -> Option<R> {
		self.stream.map(VirtualWavStream::into_inner)
	}
}

impl<R: Read + Seek> File<R> {
	/// Wraps `reader` as an audio container.
	pub fn from_reader(reader: R) -> Result<Self, CvnError> {
		let mut file = Self::new();
		file.load(reader)?;
		Ok(file)
	}

	/// Replaces the current source with `reader`.
	///
	/// On failure the container is left empty.
	pub fn load(&mut self, reader: R) -> Result<(), CvnError> {
		self.close();
		self.stream = Some(VirtualWavStream::new(reader)?);
		Ok(())
	}

	/// The virtual WAV stream, mutably.
	///
	/// # Errors
	///
	/// Returns [`CvnError::NotLoaded`] when nothing is open.
	pub fn stream_mut(&mut self) -> Result<&mut VirtualWavStream<R>, CvnError> {
		self.stream.as_mut().ok_or(CvnError::NotLoaded {
			file_type: FileType::Audio,
		})
	}

	/// Rewinds the stream and opens it with a WAV decoder.
	pub fn wav_reader(&mut self) -> Result<hound::WavReader<&mut VirtualWavStream<R>>, CvnError> {
		let stream = self.stream_mut()?;
		stream.seek(SeekFrom::Start(0))?;
		Ok(hound::WavReader::new(stream)?)
	}

	/// Materializes the whole virtual WAV file.
	pub fn to_wav_bytes(&mut self) -> Result<Vec<u8>, CvnError> {
		let stream = self.stream_mut()?;
		let mut wav = Vec::with_capacity(stream.len() as usize);
		stream.seek(SeekFrom::Start(0))?;
		stream.read_to_end(&mut wav)?;
		stream.seek(SeekFrom::Start(0))?;
		Ok(wav)
	}

	/// Writes the header-less original to `path`. Same as [`Container::save`].
	pub fn unwrap_to_original(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		self.save(path)
	}
}

impl<R> Default for File<R> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: Read + Seek> Container for File<R> {
	type Data = VirtualWavStream<R>;

	fn file_type(&self) -> FileType {
		FileType::Audio
	}

	fn is_loaded(&self) -> bool {
		self.stream.is_some()
	}

	fn data(&self) -> Option<&Self::Data> {
		self.stream.as_ref()
	}

	/// Audio content cannot be replaced in place.
	fn set_data(&mut self, _data: Self::Data) -> Result<(), CvnError> {
		Err(CvnError::unimplemented(FileType::Audio, "set_data"))
	}

	/// Writes the original header-less bytes: the parameter block and the
	/// samples.
	fn write_to<W: Write>(&mut self, writer: &mut W) -> Result<(), CvnError> {
		let stream = self.stream_mut()?;
		let param_len = stream.source_len().min(PARAM_SIZE);

		stream.seek(SeekFrom::Start(PARAM_OFFSET))?;
		io::copy(&mut Read::take(&mut *stream, param_len), writer)?;
		if stream.len() > HEADER_SIZE {
			stream.seek(SeekFrom::Start(HEADER_SIZE))?;
			io::copy(&mut *stream, writer)?;
		}
		stream.seek(SeekFrom::Start(0))?;
		Ok(())
	}

	/// Writes the complete virtual WAV file.
	///
	/// The output is read in full before `path` is created, so the source may
	/// be the target.
	fn extract(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		let path = path.as_ref();
		let wav = self.to_wav_bytes()?;
		debug!("Extracting {} bytes of WAV to {}", wav.len(), path.display());
		std::fs::write(path, wav)?;
		Ok(())
	}

	/// Writes the header-less original to `path`.
	///
	/// The output is read in full before `path` is created, so the container
	/// can be saved over its own source file.
	fn save(&mut self, path: impl AsRef<Path>) -> Result<(), CvnError> {
		let path = path.as_ref();
		let raw = self.to_bytes()?;
		debug!("Saving {} bytes of audio to {}", raw.len(), path.display());
		std::fs::write(path, raw)?;
		Ok(())
	}

	fn close(&mut self) {
		self.stream = None;
	}
}

impl<R> fmt::Display for File<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.stream, self.wave_format()) {
			(Some(stream), Some(format)) => write!(
				f,
				"Audio container: {} source bytes, {} WAV bytes, {}",
				stream.source_len(),
				stream.len(),
				format
			),
			_ => write!(f, "Audio container (not loaded)"),
		}
	}
}
