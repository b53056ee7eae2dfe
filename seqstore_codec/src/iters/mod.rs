//! Iterators drive a [`crate::serde::Decoder`] over a whole stream.
//!
//! ```text
//! struct Stream {
//!     record_0:   Record,
//!     record_1:   Record,
//!     ...
//!     // Until the end of the source, or until an unknown marker,
//!     // beyond which the framing is undefined.
//! }
//! ```

mod iter_records;

pub use iter_records::*;
