//! Prelude module for `cvn_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use cvn_types::prelude::*;
//!
//! let text = TextFile::open("script/op.cv0")?;
//! println!("{}", text.text());
//! # Ok::<(), CvnError>(())
//! ```

#[doc(inline)]
pub use crate::file::{
	// Dispatch
	AnyContainer,

	// Audio types
	AudioFile,

	// Bitmap types
	BitmapFile,
	BitmapHeader,
	Color,

	// Shared contract
	Container,
	CvnError,
	FileType,

	Palette,
	PixelFormat,
	Pixels,

	// Table types
	Record,
	Summary,
	TableFile,

	// Text types
	TextFile,
	VirtualWavStream,
	WaveFormat,

	open_path,
	open_reader,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
