use anyhow::Result;
use derive_more::{Deref, From};

/// The `i32` that precedes the payload of [`crate::serde::Framing::Sized32`] records.
///
/// It counts bytes, or UTF-16 code units for chars and strings.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct BodyLen32(i32);
impl BodyLen32 {
    pub const ZERO: Self = Self(0);

    pub fn from_count(count: usize) -> Result<Self> {
        let int = i32::try_from(count)?;
        Ok(Self(int))
    }
}

/// The `i64` that precedes the payload of [`crate::serde::Framing::Sized64`] records.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct BodyLen64(i64);
impl BodyLen64 {
    pub const ZERO: Self = Self(0);

    pub fn from_count(count: u64) -> Result<Self> {
        let int = i64::try_from(count)?;
        Ok(Self(int))
    }

    /// The leading portion that may be materialized in memory, and the remainder that is always skipped.
    pub fn split_at_cap(self) -> (u64, u64) {
        if self.0 <= 0 {
            return (0, 0);
        }
        let declared = self.0 as u64;
        let capped = declared.min(i32::MAX as u64);
        (capped, declared - capped)
    }
}

#[derive(Deref, PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct WriteLen(usize);
impl WriteLen {
    pub fn new_manual(len: usize) -> Self {
        Self(len)
    }
}
