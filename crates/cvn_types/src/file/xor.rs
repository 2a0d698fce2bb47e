//! Keyed XOR obfuscation shared by the text and table containers.
//!
//! Every byte is XORed with a key that evolves additively:
//!
//! ```text
//! out[i] = in[i] ^ key
//! key    = key + delta      (mod 256)
//! delta  = delta - 0x6B     (mod 256)
//! ```
//!
//! starting from `key = 0x8B`, `delta = 0x71`. The schedule depends only on
//! the byte position, so the same pass both obfuscates and de-obfuscates.
//! It always restarts at offset zero and is never persisted.

use std::io::{self, Read, Write};

use log::trace;

mod constants {
	/// Initial key
	pub const INITIAL_KEY: u8 = 0x8B;

	/// Initial delta
	pub const INITIAL_DELTA: u8 = 0x71;

	/// Amount subtracted from delta after every byte
	pub const DELTA_STEP: u8 = 0x6B;
}

/// Position-dependent key stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySchedule {
	key: u8,
	delta: u8,
}

impl KeySchedule {
	/// Creates a schedule at its canonical starting point.
	pub const fn new() -> Self {
		Self {
			key: constants::INITIAL_KEY,
			delta: constants::INITIAL_DELTA,
		}
	}

	/// Returns the key for the current byte and advances the schedule.
	#[inline]
	pub fn next_key(&mut self) -> u8 {
		let key = self.key;
		self.key = self.key.wrapping_add(self.delta);
		self.delta = self.delta.wrapping_sub(constants::DELTA_STEP);
		key
	}

	/// XORs `data` in place, continuing from the current schedule position.
	pub fn apply_in_place(&mut self, data: &mut [u8]) {
		for byte in data {
			*byte ^= self.next_key();
		}
	}
}

impl Default for KeySchedule {
	fn default() -> Self {
		Self::new()
	}
}

/// Applies a fresh schedule to `data` and returns the transformed copy.
///
/// Calling this twice returns the original bytes.
pub fn apply(data: &[u8]) -> Vec<u8> {
	trace!("Applying XOR schedule to {} bytes", data.len());
	let mut schedule = KeySchedule::new();
	data.iter().map(|&b| b ^ schedule.next_key()).collect()
}

/// Applies a fresh schedule to `data` in place.
pub fn apply_in_place(data: &mut [u8]) {
	trace!("Applying XOR schedule in place to {} bytes", data.len());
	KeySchedule::new().apply_in_place(data);
}

/// Reader adapter that removes (or adds) the obfuscation while reading.
pub struct XorReader<R> {
	inner: R,
	schedule: KeySchedule,
}

impl<R: Read> XorReader<R> {
	/// Wraps `inner`, starting a fresh schedule at its current position.
	pub fn new(inner: R) -> Self {
		Self {
			inner,
			schedule: KeySchedule::new(),
		}
	}

	/// Returns the wrapped reader.
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl<R: Read> Read for XorReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let n = self.inner.read(buf)?;
		self.schedule.apply_in_place(&mut buf[..n]);
		Ok(n)
	}
}

/// Writer adapter that obfuscates bytes on their way to `inner`.
///
/// The caller's buffers are never modified; each chunk is transformed in a
/// scratch copy.
pub struct XorWriter<W> {
	inner: W,
	schedule: KeySchedule,
	scratch: Vec<u8>,
}

impl<W: Write> XorWriter<W> {
	/// Wraps `inner`, starting a fresh schedule.
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			schedule: KeySchedule::new(),
			scratch: Vec::new(),
		}
	}

	/// Returns the wrapped writer.
	pub fn into_inner(self) -> W {
		self.inner
	}
}

impl<W: Write> Write for XorWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		// Only advance the schedule by what the inner writer accepted.
		let mut probe = self.schedule;
		self.scratch.clear();
		self.scratch.extend_from_slice(buf);
		probe.apply_in_place(&mut self.scratch);

		let written = self.inner.write(&self.scratch)?;
		for _ in 0..written {
			self.schedule.next_key();
		}
		Ok(written)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}
}
