//! Fixed-width big-endian conversions.
//!
//! Decoding returns `None` when the input is shorter than the type's width.
//! [`BigEndian::from_be_slice_or_sentinel()`] maps that case to a fixed sentinel value instead,
//! which callers cannot tell apart from a payload that legitimately equals the sentinel.

mod test;

pub trait BigEndian: Sized + Copy {
    const WIDTH: usize;

    /// `MIN` for integers and NaN for floats.
    const SENTINEL: Self;

    fn put_be(self, buf: &mut Vec<u8>);

    /// Decodes the leading `WIDTH` bytes. Trailing bytes are ignored.
    fn from_be_slice(buf: &[u8]) -> Option<Self>;

    fn to_be_vec(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIDTH);
        self.put_be(&mut buf);
        buf
    }

    fn from_be_slice_or_sentinel(buf: &[u8]) -> Self {
        Self::from_be_slice(buf).unwrap_or(Self::SENTINEL)
    }
}

macro_rules! impl_big_endian_int {
    ($int:ty, $sentinel:expr) => {
        impl BigEndian for $int {
            const WIDTH: usize = std::mem::size_of::<$int>();
            const SENTINEL: Self = $sentinel;

            fn put_be(self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_be_bytes());
            }

            fn from_be_slice(buf: &[u8]) -> Option<Self> {
                let head = buf.get(..Self::WIDTH)?;
                let arr = head.try_into().ok()?;
                Some(<$int>::from_be_bytes(arr))
            }
        }
    };
}

impl_big_endian_int!(i16, i16::MIN);
impl_big_endian_int!(i32, i32::MIN);
impl_big_endian_int!(i64, i64::MIN);
// UTF-16 code units. A missing unit is left as zero.
impl_big_endian_int!(u16, 0);

/// Reinterprets the bits of the `i64` encoding.
impl BigEndian for f64 {
    const WIDTH: usize = 8;
    const SENTINEL: Self = f64::NAN;

    fn put_be(self, buf: &mut Vec<u8>) {
        (self.to_bits() as i64).put_be(buf);
    }

    fn from_be_slice(buf: &[u8]) -> Option<Self> {
        let bits = i64::from_be_slice(buf)?;
        Some(f64::from_bits(bits as u64))
    }
}
