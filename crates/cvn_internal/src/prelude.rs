//! Prelude module for `cvn_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use cvn_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let text = TextFile::new();
//! let palette = Palette::new();
//! assert!(!text.is_loaded());
//! assert_eq!(palette.get(0), Color::rgb(0, 0, 0));
//! ```

// Re-export everything from cvn_types::prelude
#[doc(inline)]
pub use cvn_types::prelude::*;

// Re-export the entire cvn_types module for advanced usage
#[doc(inline)]
pub use cvn_types;
