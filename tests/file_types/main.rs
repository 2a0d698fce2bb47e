//! Integration tests for the container codecs of `cvn-rs`

use std::fs;
use std::path::PathBuf;

mod audio;
mod bitmap;
mod dispatch;
mod table;
mod text;

/// Creates an empty scratch directory unique to this process and `name`.
fn scratch_dir(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("cvn-rs-{}-{name}", std::process::id()));
	if dir.exists() {
		fs::remove_dir_all(&dir).unwrap();
	}
	fs::create_dir_all(&dir).unwrap();
	dir
}
