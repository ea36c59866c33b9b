//! Foundation types for the minsharp resolver.
//!
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Name`] - Cheap-to-clone identifier strings
//!
//! This module has NO dependencies on other minsharp modules.

mod intern;

pub use intern::Name;

pub use text_size::{TextRange, TextSize};
