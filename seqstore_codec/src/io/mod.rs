//! The capabilities a [`crate::serde::Decoder`] needs from where it reads.
//!
//! Sinks are plain [`std::io::Write`]s.

mod source;

pub use source::*;
