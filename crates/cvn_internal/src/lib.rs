//! This module is separated into its own crate to keep the public facade thin, and should not be used directly.

/// `use cvn_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export cvn_types for convenience
pub use cvn_types;

// Re-export commonly used types at crate root
pub use cvn_types::file::{AnyContainer, Container, CvnError, FileType, open_path, open_reader};
