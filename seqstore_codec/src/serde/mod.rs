//! # Serialization format
//!
//! A stream is a sequence of records with no separator, alignment or padding
//! between them. Every record starts with a one-byte `marker`, whose two high
//! bits select how the payload is framed:
//!
//! - `0b00......`: direct. The payload has a fixed width, which is not encoded.
//! - `0b01......`: the payload is preceded by an `i32` length.
//! - `0b10......`: the payload is preceded by an `i64` length.
//!
//! Bit `0b00100000` marks a null value. A null marker keeps the low five bits
//! of its non-null counterpart, and is never followed by a payload.
//! Custom markers have no null counterpart; an absent custom payload is written
//! with a zero length instead.
//!
//! All multi-byte integers are big-endian.
//!
//! ```text
//! struct Int {
//!     marker:     u8 = 0x01,
//!     body:       [u8; 4],
//! }
//!
//! struct Long or Double or Date {
//!     marker:     u8 = 0x02 | 0x03 | 0x04,
//!     body:       [u8; 8],        // Date: milliseconds since the unix epoch.
//! }
//!
//! struct Bytes or CustomInt {
//!     marker:     u8 = 0x45 | 0x41,
//!     body_len:   i32,
//!     body:       [u8; body_len],
//! }
//!
//! struct Chars or String {
//!     marker:     u8 = 0x46 | 0x47,
//!     units_ct:   i32,
//!     body:       [[u8; 2]; units_ct],    // UTF-16 code units.
//! }
//!
//! struct CustomLong {
//!     marker:     u8 = 0x82,
//!     body_len:   i64,
//!     body:       [u8; body_len],
//! }
//!
//! struct DateNull or BytesNull or CharsNull or StringNull {
//!     marker:     u8 = 0x24 | 0x25 | 0x26 | 0x27,
//! }
//! ```
//!
//! Readers that are not interested in a record may skip its body by byte count.

mod decoder;
mod encoder;
mod lengths;
mod marker;
mod mask;
pub mod primitives;
mod value;

pub use decoder::*;
pub use encoder::*;
pub use lengths::*;
pub use marker::*;
pub use mask::*;
pub use value::*;
