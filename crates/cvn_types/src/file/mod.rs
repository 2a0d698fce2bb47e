//! Container codecs for the `.cv0`..`.cv3` resource formats.

mod container;
mod error;

pub mod audio;
pub mod bitmap;
pub mod dispatch;
pub mod table;
pub mod text;
pub mod xor;

pub use container::Container;
pub use error::{CvnError, FileType};

pub use audio::{File as AudioFile, VirtualWavStream, WaveFormat, unwrap_wav};
pub use bitmap::{
	Color, File as BitmapFile, Header as BitmapHeader, Palette, PixelFormat, Pixels,
};
pub use dispatch::{AnyContainer, Summary, open_path, open_reader};
pub use table::{File as TableFile, Record};
pub use text::{DEFAULT_ENCODING, File as TextFile, encoding_for_label};
pub use xor::{KeySchedule, XorReader, XorWriter};
