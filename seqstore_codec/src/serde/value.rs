use crate::serde::Marker;
use derive_more::{Display, From, Into};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch.
#[derive(From, Into, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[display(fmt = "{}ms", _0)]
pub struct Timestamp(i64);
impl Timestamp {
    pub fn from_epoch_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn epoch_millis(self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// `None` if the instant is not representable by [`SystemTime`] on this platform.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let magnitude = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH.checked_add(magnitude)
        } else {
            UNIX_EPOCH.checked_sub(magnitude)
        }
    }
}
/// Rounds towards negative infinity, and saturates at the bounds of `i64`.
impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
            Err(e) => {
                let before = e.duration();
                let mut millis = before.as_millis();
                if before.subsec_nanos() % 1_000_000 != 0 {
                    millis += 1;
                }
                i64::try_from(millis).map(|m| -m).unwrap_or(i64::MIN)
            }
        };
        Self(millis)
    }
}

/// A decoded value. [`Value::None`] is what null markers decode to; it is also the value of
/// records whose payload was not materialized.
#[derive(PartialEq, Clone, Default, Debug)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Timestamp(Timestamp),
    RawBytes(Vec<u8>),
    /// UTF-16 code units, as decoded from chars records.
    CharSequence(Vec<u16>),
    Text(String),
    #[default]
    None,
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::RawBytes(b) => Some(b),
            _ => None,
        }
    }
    pub fn as_chars(&self) -> Option<&[u16]> {
        match self {
            Value::CharSequence(units) => Some(units),
            _ => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int32(i)
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}
impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}
impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::RawBytes(b)
    }
}
impl From<Vec<u16>> for Value {
    fn from(units: Vec<u16>) -> Self {
        Value::CharSequence(units)
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            None => Value::None,
            Some(t) => t.into(),
        }
    }
}

/// One decoded record.
///
/// A record that is not valid never carries a value: its payload was skipped, or not fully read.
/// A valid record carrying [`Value::None`] was decoded from a null marker.
#[derive(PartialEq, Clone, Debug)]
pub struct ValueRecord {
    position: u64,
    marker: Marker,
    value: Value,
    valid: bool,
}

impl ValueRecord {
    pub fn decoded(position: u64, marker: Marker, value: Value) -> Self {
        Self {
            position,
            marker,
            value,
            valid: true,
        }
    }

    pub fn null(position: u64, marker: Marker) -> Self {
        debug_assert!(marker.is_null_variant(), "{marker} is not a null marker");
        Self::decoded(position, marker, Value::None)
    }

    pub fn invalid(position: u64, marker: Marker) -> Self {
        Self {
            position,
            marker,
            value: Value::None,
            valid: false,
        }
    }

    pub fn unknown(position: u64) -> Self {
        Self::invalid(position, Marker::Unknown)
    }

    /// Bytes consumed from the source before this record's marker.
    pub fn position(&self) -> u64 {
        self.position
    }
    pub fn marker(&self) -> Marker {
        self.marker
    }
    pub fn value(&self) -> &Value {
        &self.value
    }
    pub fn is_valid(&self) -> bool {
        self.valid
    }
    pub fn is_null(&self) -> bool {
        self.valid && self.value.is_none()
    }
    pub fn is_unknown(&self) -> bool {
        self.marker == Marker::Unknown
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
