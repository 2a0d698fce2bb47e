#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `cvn-rs` reads and writes the CVN family of game resource containers.
//!
//! Four formats are supported, keyed by extension: obfuscated text (`.cv0`),
//! record tables (`.cv1`), palette or truecolor bitmaps (`.cv2`) and
//! header-less audio (`.cv3`).
//!
pub use cvn_internal::*;
