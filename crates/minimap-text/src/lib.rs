//! Document-side data model for the minimap renderer.
//!
//! This crate describes what the renderer reads from a host editor:
//! - Per-line styled text (fragments and character format ranges)
//! - Per-line visibility, fold and revision flags
//! - 24-bit colors as the host's highlighter resolved them
//!
//! The renderer never mutates any of this; hosts either implement
//! [`DocumentSource`] over their own buffer or fill a [`TextDocument`].

pub mod color;
pub mod document;
pub mod line;

pub use color::Rgb;
pub use document::{DocumentSource, TextDocument};
pub use line::{DocumentLine, FormatRange, Revision, TextFragment};
