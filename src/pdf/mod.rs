//! PDF encoding of a [`DocumentLayout`](crate::render::DocumentLayout).
//!
//! Uses the base-14 Helvetica fonts with `/WinAnsiEncoding`, so no font
//! files are embedded. Content streams are Flate-compressed.

mod writer;

pub use writer::{write_pdf, write_pdf_to};
