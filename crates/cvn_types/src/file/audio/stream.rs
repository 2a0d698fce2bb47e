//! Read-only WAV view over header-less audio data.
//!
//! The wrapped source starts with a 16-byte `fmt ` parameter block followed
//! directly by PCM samples. [`VirtualWavStream`] presents it as a RIFF/WAVE
//! file without ever writing header bytes into the source:
//!
//! ```text
//! virtual offset          content                         source offset
//! 0x00..0x14              "RIFF" size "WAVEfmt " 16       (synthetic)
//! 0x14..0x24              parameter block                 0x00..0x10
//! 0x24..0x2C              "data" payload size             (synthetic)
//! 0x2C..len               samples                         0x10..L
//! ```
//!
//! The logical length is `L + 0x1C`.

use std::io::{self, Read, Seek, SeekFrom, Write};

use log::trace;

/// Stream layout constants.
pub mod constants {
	/// Size of the synthesized header
	pub const HEADER_SIZE: u64 = 0x2C;

	/// Virtual offset of the parameter block
	pub const PARAM_OFFSET: u64 = 0x14;

	/// Size of the parameter block
	pub const PARAM_SIZE: u64 = 0x10;

	/// Virtual offset of the `data` chunk marker
	pub const DATA_MARKER_OFFSET: u64 = PARAM_OFFSET + PARAM_SIZE;

	/// Bytes the header adds on top of the source length
	pub const EXTRA_LEN: u64 = HEADER_SIZE - PARAM_SIZE;

	/// RIFF magic
	pub const RIFF_MAGIC: [u8; 4] = *b"RIFF";

	/// Form type and first chunk id
	pub const WAVE_FMT: [u8; 8] = *b"WAVEfmt ";

	/// Size of the `fmt ` chunk
	pub const FMT_CHUNK_SIZE: [u8; 4] = [0x10, 0x00, 0x00, 0x00];

	/// Data chunk id
	pub const DATA_MARKER: [u8; 4] = *b"data";
}

use constants::*;

/// Maps a virtual offset to the source offset that backs it.
///
/// Offsets inside the synthetic zones map to where the next real byte
/// comes from.
pub fn real_offset(virtual_offset: u64) -> u64 {
	if virtual_offset < PARAM_OFFSET {
		0
	} else if virtual_offset < DATA_MARKER_OFFSET {
		virtual_offset - PARAM_OFFSET
	} else if virtual_offset < HEADER_SIZE {
		PARAM_SIZE
	} else {
		virtual_offset - EXTRA_LEN
	}
}

/// Seekable WAV view over a header-less audio source.
///
/// Writing is not supported: [`Write`] is implemented as a no-op that
/// reports every byte as written and discards it, and the source is never
/// modified.
#[derive(Debug)]
pub struct VirtualWavStream<R> {
	inner: R,
	header: [u8; HEADER_SIZE as usize],
	source_len: u64,
	virtual_pos: u64,
	real_pos: u64,
}

impl<R: Read + Seek> VirtualWavStream<R> {
	/// Wraps `inner`, building the synthetic header from its first 16 bytes.
	///
	/// A source shorter than 16 bytes gets a zero-filled parameter block.
	pub fn new(mut inner: R) -> io::Result<Self> {
		let source_len = inner.seek(SeekFrom::End(0))?;
		inner.seek(SeekFrom::Start(0))?;

		let mut params = [0u8; PARAM_SIZE as usize];
		let mut filled = 0;
		while filled < params.len() {
			let n = inner.read(&mut params[filled..])?;
			if n == 0 {
				break;
			}
			filled += n;
		}
		inner.seek(SeekFrom::Start(0))?;

		let logical_len = source_len + EXTRA_LEN;
		let mut header = [0u8; HEADER_SIZE as usize];
		header[0x00..0x04].copy_from_slice(&RIFF_MAGIC);
		header[0x04..0x08].copy_from_slice(&(logical_len as u32).to_le_bytes());
		header[0x08..0x10].copy_from_slice(&WAVE_FMT);
		header[0x10..0x14].copy_from_slice(&FMT_CHUNK_SIZE);
		header[0x14..0x24].copy_from_slice(&params);
		header[0x24..0x28].copy_from_slice(&DATA_MARKER);
		header[0x28..0x2C]
			.copy_from_slice(&(source_len.saturating_sub(PARAM_SIZE) as u32).to_le_bytes());

		trace!("Wrapped {source_len} bytes of raw audio, logical length {logical_len}");

		Ok(Self {
			inner,
			header,
			source_len,
			virtual_pos: 0,
			real_pos: 0,
		})
	}

	/// Moves both cursors to `virtual_pos`, which must be within bounds.
	fn seek_virtual(&mut self, virtual_pos: u64) -> io::Result<()> {
		self.virtual_pos = virtual_pos;
		self.real_pos = real_offset(virtual_pos);
		self.inner.seek(SeekFrom::Start(self.real_pos))?;
		Ok(())
	}
}

impl<R> VirtualWavStream<R> {
	/// Logical length: source length plus 0x1C.
	pub fn len(&self) -> u64 {
		self.source_len + EXTRA_LEN
	}

	/// Always `false`; even an empty source has a header.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Length of the wrapped source.
	pub fn source_len(&self) -> u64 {
		self.source_len
	}

	/// Current virtual position.
	pub fn position(&self) -> u64 {
		self.virtual_pos
	}

	/// Current position in the wrapped source.
	pub fn real_position(&self) -> u64 {
		self.real_pos
	}

	/// The synthesized 0x2C-byte header.
	pub fn header(&self) -> &[u8; HEADER_SIZE as usize] {
		&self.header
	}

	/// The 16-byte parameter block copied from the start of the source.
	pub fn param_block(&self) -> [u8; PARAM_SIZE as usize] {
		let mut block = [0u8; PARAM_SIZE as usize];
		block.copy_from_slice(&self.header[PARAM_OFFSET as usize..DATA_MARKER_OFFSET as usize]);
		block
	}

	/// Returns the wrapped source.
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl<R: Read + Seek> Read for VirtualWavStream<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let len = self.len();
		if buf.is_empty() || self.virtual_pos >= len {
			return Ok(0);
		}

		let mut copied = 0;
		if self.virtual_pos < HEADER_SIZE {
			let start = self.virtual_pos as usize;
			let end = HEADER_SIZE.min(len) as usize;
			copied = (end - start).min(buf.len());
			buf[..copied].copy_from_slice(&self.header[start..start + copied]);
			self.seek_virtual((start + copied) as u64)?;
		}

		if copied < buf.len() && self.virtual_pos >= HEADER_SIZE && self.virtual_pos < len {
			let wanted = (buf.len() - copied).min((len - self.virtual_pos) as usize);
			let n = self.inner.read(&mut buf[copied..copied + wanted])?;
			self.virtual_pos += n as u64;
			self.real_pos += n as u64;
			copied += n;
		}

		Ok(copied)
	}
}

impl<R: Read + Seek> Seek for VirtualWavStream<R> {
	/// Seeks within the logical stream.
	///
	/// Targets outside `0..=len` are clamped instead of rejected.
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		let len = self.len();
		let target = match pos {
			SeekFrom::Start(offset) => i128::from(offset),
			SeekFrom::Current(delta) => i128::from(self.virtual_pos) + i128::from(delta),
			SeekFrom::End(delta) => i128::from(len) + i128::from(delta),
		};
		let clamped = target.clamp(0, i128::from(len)) as u64;
		self.seek_virtual(clamped)?;
		Ok(clamped)
	}
}

impl<R> Write for VirtualWavStream<R> {
	/// Discards `buf`; the stream is read-only.
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		trace!("Discarding write of {} bytes to read-only WAV view", buf.len());
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
