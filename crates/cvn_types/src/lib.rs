//! This crate provides the container codecs of the `cvn-rs` project.
//!
//! # File Formats
//!
//! - **CV0**: Text obfuscated with an evolving XOR key schedule
//! - **CV1**: Comma separated records layered on the text container
//! - **CV2**: Bitmaps with 8-bit palette indices or 32-bit color, rows padded
//!   to a stored data width, palettes in a companion file
//! - **CV3**: PCM audio stored without its RIFF header, exposed as a
//!   seekable virtual WAV stream
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use cvn_types::prelude::*;
//!
//! let mut table = TableFile::open("data/item.cv1")?;
//! for record in table.records() {
//! 	println!("{record}");
//! }
//! table.extract("item.csv")?;
//! # Ok::<(), CvnError>(())
//! ```
//!
//! Or dispatch on the file extension:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cvn_types::file::open_path;
//!
//! let mut container = open_path("bg/title.cv2", None, Some(Path::new("bg/title.pal")))?;
//! container.extract("title.png")?;
//! # Ok::<(), cvn_types::file::CvnError>(())
//! ```

pub mod file;

/// `use cvn_types::prelude::*;` to import commonly used items.
pub mod prelude;
