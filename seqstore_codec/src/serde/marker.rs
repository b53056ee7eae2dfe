use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::any;
use std::fmt;

const FRAMING_BITS: u8 = 0b1100_0000;
const NULL_BIT: u8 = 0b0010_0000;
const LOGICAL_TYPE_BITS: u8 = 0b0001_1111;

/// The raw marker byte, as found on the wire.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct MarkerByte(u8);
impl From<Marker> for MarkerByte {
    fn from(marker: Marker) -> Self {
        Self(marker as u8)
    }
}

/// How a record's payload is delimited.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Framing {
    /// Fixed width; no length on the wire.
    Direct,
    /// Preceded by an `i32` length.
    Sized32,
    /// Preceded by an `i64` length.
    Sized64,
}

/// The markers are fixed by the wire format. Their discriminants are the marker bytes.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum Marker {
    /// Not a marker that can be written. Decoders report unrecognized marker bytes with it.
    Unknown = 0b0000_0000,

    Int = 0b0000_0001,
    Long = 0b0000_0010,
    Double = 0b0000_0011,
    Date = 0b0000_0100,
    DateNull = 0b0010_0100,
    Bytes = 0b0100_0101,
    BytesNull = 0b0010_0101,
    Chars = 0b0100_0110,
    CharsNull = 0b0010_0110,
    String = 0b0100_0111,
    StringNull = 0b0010_0111,

    CustomInt = 0b0100_0001,
    CustomLong = 0b1000_0010,
}

impl TryFrom<MarkerByte> for Marker {
    type Error = anyhow::Error;
    fn try_from(byte: MarkerByte) -> Result<Self> {
        match Marker::from_u8(byte.0) {
            Some(marker) if marker != Marker::Unknown => Ok(marker),
            _ => Err(anyhow!(
                "Unknown {} {:#04x}",
                any::type_name::<MarkerByte>(),
                byte.0
            )),
        }
    }
}

impl Marker {
    pub const ALL: [Marker; 13] = [
        Marker::Int,
        Marker::Long,
        Marker::Double,
        Marker::Date,
        Marker::DateNull,
        Marker::Bytes,
        Marker::BytesNull,
        Marker::Chars,
        Marker::CharsNull,
        Marker::String,
        Marker::StringNull,
        Marker::CustomInt,
        Marker::CustomLong,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn framing(self) -> Framing {
        match (self as u8 & FRAMING_BITS) >> 6 {
            0b01 => Framing::Sized32,
            0b10 => Framing::Sized64,
            _ => Framing::Direct,
        }
    }

    pub fn is_direct(self) -> bool {
        self.framing() == Framing::Direct
    }

    pub fn is_null_variant(self) -> bool {
        self.is_direct() && (self as u8 & NULL_BIT) != 0
    }

    pub fn is_custom(self) -> bool {
        matches!(self, Marker::CustomInt | Marker::CustomLong)
    }

    /// Width of the length that precedes the payload.
    pub fn prefix_width(self) -> usize {
        match self.framing() {
            Framing::Direct => 0,
            Framing::Sized32 => 4,
            Framing::Sized64 => 8,
        }
    }

    /// Width of the payload of a direct marker. Null variants have an empty payload.
    pub fn direct_width(self) -> Option<usize> {
        match self {
            Marker::Int => Some(4),
            Marker::Long | Marker::Double | Marker::Date => Some(8),
            Marker::DateNull | Marker::BytesNull | Marker::CharsNull | Marker::StringNull => {
                Some(0)
            }
            _ => None,
        }
    }

    /// The marker that encodes a null value of the same logical type, if the type is nullable.
    pub fn null_variant(self) -> Option<Marker> {
        if self == Marker::Unknown || self.is_null_variant() {
            return None;
        }
        let int = (self as u8 & LOGICAL_TYPE_BITS) | NULL_BIT;
        Marker::from_u8(int)
    }

    /// Inverse of [`Self::null_variant()`].
    pub fn non_null_variant(self) -> Option<Marker> {
        if !self.is_null_variant() {
            return None;
        }
        let logical_type = self as u8 & LOGICAL_TYPE_BITS;
        [0b0000_0000, 0b0100_0000, 0b1000_0000]
            .into_iter()
            .filter_map(|framing| Marker::from_u8(framing | logical_type))
            .find(|candidate| candidate.null_variant() == Some(self))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Marker::Unknown => "UNKNOWN",
            Marker::Int => "INT",
            Marker::Long => "LONG",
            Marker::Double => "DOUBLE",
            Marker::Date => "DATE",
            Marker::DateNull => "DATE_NULL",
            Marker::Bytes => "BYTES",
            Marker::BytesNull => "BYTES_NULL",
            Marker::Chars => "CHARS",
            Marker::CharsNull => "CHARS_NULL",
            Marker::String => "STRING",
            Marker::StringNull => "STRING_NULL",
            Marker::CustomInt => "CUSTOM_INT",
            Marker::CustomLong => "CUSTOM_LONG",
        };
        f.write_str(name)
    }
}
