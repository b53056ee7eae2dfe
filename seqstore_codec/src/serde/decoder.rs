use crate::io::{ByteSource, ReadSource, SeekSource};
use crate::iters::{RecordIterator, TryRecordIterator};
use crate::serde::primitives::BigEndian;
use crate::serde::{BodyLen64, Marker, MarkerByte, Mask, Timestamp, Value, ValueRecord};
use std::io::{self, Read, Seek};
use thiserror::Error;
use tracing::{debug, warn};


#[derive(PartialEq, Eq, Debug)]
pub enum ReadResult<T> {
    EOF,
    /// Bytes consumed, and the item.
    Some(u64, T),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O failure while decoding the record at {position}")]
    Io {
        position: u64,
        #[source]
        source: io::Error,
    },
    #[error("{marker} at {position}: expected {expected} bytes, obtained {obtained}")]
    ShortRead {
        position: u64,
        marker: Marker,
        expected: u64,
        obtained: u64,
    },
    #[error("{marker} at {position}: requested to skip {requested} bytes, skipped {skipped}")]
    SkipShortfall {
        position: u64,
        marker: Marker,
        requested: u64,
        skipped: u64,
    },
    #[error("Unknown marker byte {byte:#04x} at {position}")]
    UnknownMarker { position: u64, byte: u8 },
    #[error("{marker} at {position}: negative length {len}")]
    InvalidLength {
        position: u64,
        marker: Marker,
        len: i64,
    },
}
impl DecodeError {
    /// Where the failing record began.
    pub fn position(&self) -> u64 {
        match self {
            Self::Io { position, .. }
            | Self::ShortRead { position, .. }
            | Self::SkipShortfall { position, .. }
            | Self::UnknownMarker { position, .. }
            | Self::InvalidLength { position, .. } => *position,
        }
    }
}

/// A non-I/O problem met while decoding one record.
/// The record is still produced, in its degraded form.
#[derive(Clone, Copy, Debug)]
enum Fault {
    ShortRead { expected: u64, obtained: u64 },
    SkipShortfall { requested: u64, skipped: u64 },
    UnknownMarker { byte: u8 },
    InvalidLength { len: i64 },
}
impl Fault {
    fn into_error(self, position: u64, marker: Marker) -> DecodeError {
        match self {
            Fault::ShortRead { expected, obtained } => DecodeError::ShortRead {
                position,
                marker,
                expected,
                obtained,
            },
            Fault::SkipShortfall { requested, skipped } => DecodeError::SkipShortfall {
                position,
                marker,
                requested,
                skipped,
            },
            Fault::UnknownMarker { byte } => DecodeError::UnknownMarker { position, byte },
            Fault::InvalidLength { len } => DecodeError::InvalidLength {
                position,
                marker,
                len,
            },
        }
    }
}

struct Outcome {
    record: ValueRecord,
    fault: Option<Fault>,
}
impl Outcome {
    fn clean(record: ValueRecord) -> Self {
        Self {
            record,
            fault: None,
        }
    }
    fn faulted(record: ValueRecord, fault: Fault) -> Self {
        Self {
            record,
            fault: Some(fault),
        }
    }
}

/// Reads records from a source, one per call.
///
/// Records whose marker the [`Mask`] does not match have their payload skipped, and are reported
/// as not valid. [`Self::position()`] always equals the bytes consumed from the source, whether
/// read or skipped.
///
/// Two APIs are offered:
/// - [`Self::next_record()`] never fails. Short reads and skip shortfalls degrade the record;
///     I/O failures are reported as [`ReadResult::EOF`].
/// - [`Self::try_next()`] reports each of these conditions as a [`DecodeError`].
///
/// After an unknown marker, the framing of the rest of the stream is undefined;
/// callers should stop decoding.
pub struct Decoder<S> {
    src: S,
    position: u64,
    mask: Mask,
}

impl<R: Read> Decoder<ReadSource<R>> {
    pub fn from_reader(r: R) -> Self {
        Self::new(ReadSource::from(r))
    }
}

impl<R: Read + Seek> Decoder<SeekSource<R>> {
    pub fn from_seekable(r: R) -> Self {
        Self::new(SeekSource::from(r))
    }
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(src: S) -> Self {
        Self {
            src,
            position: 0,
            mask: Mask::All,
        }
    }

    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }

    pub fn set_mask(&mut self, mask: Mask) {
        self.mask = mask;
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &S {
        &self.src
    }

    pub fn into_inner(self) -> S {
        self.src
    }

    pub fn next_record(&mut self) -> ReadResult<ValueRecord> {
        let start = self.position;
        match self.decode_one() {
            Ok(None) => ReadResult::EOF,
            Ok(Some(Outcome { record, fault })) => {
                if let Some(fault) = fault {
                    debug!(position = start, marker = %record.marker(), ?fault, "Degraded record");
                }
                ReadResult::Some(self.position - start, record)
            }
            Err(e) => {
                warn!(position = start, "Read failed; reporting end of stream: {e}");
                ReadResult::EOF
            }
        }
    }

    pub fn try_next(&mut self) -> Result<ReadResult<ValueRecord>, DecodeError> {
        let start = self.position;
        match self.decode_one() {
            Ok(None) => Ok(ReadResult::EOF),
            Ok(Some(Outcome {
                record,
                fault: None,
            })) => Ok(ReadResult::Some(self.position - start, record)),
            Ok(Some(Outcome {
                record,
                fault: Some(fault),
            })) => Err(fault.into_error(start, record.marker())),
            Err(source) => Err(DecodeError::Io {
                position: start,
                source,
            }),
        }
    }

    /// Iterates with [`Self::next_record()`], until the end of stream or an unknown marker.
    pub fn records(&mut self) -> RecordIterator<'_, S> {
        RecordIterator::from(self)
    }

    /// Iterates with [`Self::try_next()`], until the end of stream or the first error.
    pub fn try_records(&mut self) -> TryRecordIterator<'_, S> {
        TryRecordIterator::from(self)
    }

    /* Source access. Each one advances the position by what the source actually yielded. */

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let r_len = self.src.read_up_to(buf)?;
        self.position += r_len as u64;
        Ok(r_len)
    }

    fn read_vec(&mut self, len: u64) -> io::Result<Vec<u8>> {
        let buf = self.src.read_vec_up_to(len)?;
        self.position += buf.len() as u64;
        Ok(buf)
    }

    fn skip(&mut self, len: u64) -> io::Result<u64> {
        let skipped = self.src.skip_up_to(len)?;
        self.position += skipped;
        Ok(skipped)
    }

    /* Decoding */

    fn decode_one(&mut self) -> io::Result<Option<Outcome>> {
        let start = self.position;

        /* marker */
        let mut buf = [0u8; 1];
        if self.read(&mut buf)? == 0 {
            return Ok(None);
        }
        let byte = MarkerByte::from(buf[0]);
        let marker = match Marker::try_from(byte) {
            Ok(marker) => marker,
            Err(e) => {
                debug!(position = start, "{e}");
                let fault = Fault::UnknownMarker { byte: *byte };
                return Ok(Some(Outcome::faulted(ValueRecord::unknown(start), fault)));
            }
        };
        let is_match = self.mask.matches(marker);

        /* payload */
        let outcome = match marker {
            Marker::DateNull | Marker::BytesNull | Marker::CharsNull | Marker::StringNull => {
                Outcome::clean(ValueRecord::null(start, marker))
            }
            Marker::Int => self.decode_direct(start, marker, is_match, Value::Int32)?,
            Marker::Long => self.decode_direct(start, marker, is_match, Value::Int64)?,
            Marker::Double => self.decode_direct(start, marker, is_match, Value::Float64)?,
            Marker::Date => self.decode_direct(start, marker, is_match, |millis: i64| {
                Value::Timestamp(Timestamp::from_epoch_millis(millis))
            })?,
            Marker::Bytes | Marker::Chars | Marker::String | Marker::CustomInt => {
                self.decode_sized32(start, marker, is_match)?
            }
            Marker::CustomLong => self.decode_sized64(start, marker, is_match)?,
            Marker::Unknown => {
                let fault = Fault::UnknownMarker { byte: *byte };
                Outcome::faulted(ValueRecord::unknown(start), fault)
            }
        };
        Ok(Some(outcome))
    }

    fn decode_direct<T: BigEndian>(
        &mut self,
        start: u64,
        marker: Marker,
        is_match: bool,
        to_value: impl FnOnce(T) -> Value,
    ) -> io::Result<Outcome> {
        if !is_match {
            return self.skip_payload(start, marker, T::WIDTH as u64);
        }

        let mut buf = [0u8; 8];
        let buf = &mut buf[..T::WIDTH];
        let r_len = self.read(buf)?;
        let outcome = match T::from_be_slice(&buf[..r_len]) {
            Some(t) => Outcome::clean(ValueRecord::decoded(start, marker, to_value(t))),
            None => Outcome::faulted(
                ValueRecord::invalid(start, marker),
                Fault::ShortRead {
                    expected: T::WIDTH as u64,
                    obtained: r_len as u64,
                },
            ),
        };
        Ok(outcome)
    }

    fn decode_sized32(&mut self, start: u64, marker: Marker, is_match: bool) -> io::Result<Outcome> {
        /* body_len */
        let mut buf = [0u8; 4];
        let r_len = self.read(&mut buf)?;
        let len = match i32::from_be_slice(&buf[..r_len]) {
            Some(len) => len,
            None => {
                let fault = Fault::ShortRead {
                    expected: buf.len() as u64,
                    obtained: r_len as u64,
                };
                let record = match marker {
                    Marker::CustomInt => Self::empty_custom(start, marker),
                    _ => ValueRecord::invalid(start, marker),
                };
                return Ok(Outcome::faulted(record, fault));
            }
        };

        /* body */
        match marker {
            Marker::CustomInt => {
                if len <= 0 {
                    return Ok(Outcome::clean(Self::empty_custom(start, marker)));
                }
                if !is_match {
                    return self.skip_payload(start, marker, len as u64);
                }
                self.read_custom_body(start, marker, len as u64)
            }
            _ if len < 0 => {
                let fault = Fault::InvalidLength { len: len as i64 };
                Ok(Outcome::faulted(ValueRecord::invalid(start, marker), fault))
            }
            Marker::Bytes => {
                let len = len as u64;
                if !is_match {
                    return self.skip_payload(start, marker, len);
                }
                let body = self.read_vec(len)?;
                let outcome = if body.len() as u64 == len {
                    Outcome::clean(ValueRecord::decoded(start, marker, Value::RawBytes(body)))
                } else {
                    Outcome::faulted(
                        ValueRecord::invalid(start, marker),
                        Fault::ShortRead {
                            expected: len,
                            obtained: body.len() as u64,
                        },
                    )
                };
                Ok(outcome)
            }
            _ => self.decode_code_units(start, marker, is_match, len as usize),
        }
    }

    /// Chars and strings. A code unit that could not be read stays zero, and the record stays valid.
    fn decode_code_units(
        &mut self,
        start: u64,
        marker: Marker,
        is_match: bool,
        units_ct: usize,
    ) -> io::Result<Outcome> {
        let byte_len = units_ct as u64 * u16::WIDTH as u64;
        if !is_match {
            return self.skip_payload(start, marker, byte_len);
        }

        let body = self.read_vec(byte_len)?;
        let mut units = body
            .chunks(u16::WIDTH)
            .map(u16::from_be_slice_or_sentinel)
            .collect::<Vec<_>>();
        units.resize(units_ct, 0);

        let value = match marker {
            Marker::String => Value::Text(String::from_utf16_lossy(&units)),
            _ => Value::CharSequence(units),
        };
        let record = ValueRecord::decoded(start, marker, value);
        if (body.len() as u64) < byte_len {
            let fault = Fault::ShortRead {
                expected: byte_len,
                obtained: body.len() as u64,
            };
            return Ok(Outcome::faulted(record, fault));
        }
        Ok(Outcome::clean(record))
    }

    fn decode_sized64(&mut self, start: u64, marker: Marker, is_match: bool) -> io::Result<Outcome> {
        /* body_len */
        let mut buf = [0u8; 8];
        let r_len = self.read(&mut buf)?;
        let len = match i64::from_be_slice(&buf[..r_len]) {
            Some(len) => BodyLen64::from(len),
            None => {
                let fault = Fault::ShortRead {
                    expected: buf.len() as u64,
                    obtained: r_len as u64,
                };
                return Ok(Outcome::faulted(Self::empty_custom(start, marker), fault));
            }
        };
        let (capped_len, remainder_len) = len.split_at_cap();
        if capped_len == 0 {
            return Ok(Outcome::clean(Self::empty_custom(start, marker)));
        }

        /* body */
        let mut outcome = if is_match {
            self.read_custom_body(start, marker, capped_len)?
        } else {
            self.skip_payload(start, marker, capped_len)?
        };

        /* the rest of an oversized body, to keep the stream framed */
        if remainder_len > 0 {
            let skipped = self.skip(remainder_len)?;
            if skipped < remainder_len && outcome.fault.is_none() {
                outcome.fault = Some(Fault::SkipShortfall {
                    requested: remainder_len,
                    skipped,
                });
            }
        }
        Ok(outcome)
    }

    /// A custom body that cannot be fully read decodes as empty, yet valid.
    fn read_custom_body(&mut self, start: u64, marker: Marker, len: u64) -> io::Result<Outcome> {
        let body = self.read_vec(len)?;
        let outcome = if body.len() as u64 == len {
            Outcome::clean(ValueRecord::decoded(start, marker, Value::RawBytes(body)))
        } else {
            Outcome::faulted(
                Self::empty_custom(start, marker),
                Fault::ShortRead {
                    expected: len,
                    obtained: body.len() as u64,
                },
            )
        };
        Ok(outcome)
    }

    fn skip_payload(&mut self, start: u64, marker: Marker, len: u64) -> io::Result<Outcome> {
        let skipped = self.skip(len)?;
        let record = ValueRecord::invalid(start, marker);
        if skipped < len {
            let fault = Fault::SkipShortfall {
                requested: len,
                skipped,
            };
            return Ok(Outcome::faulted(record, fault));
        }
        Ok(Outcome::clean(record))
    }

    fn empty_custom(start: u64, marker: Marker) -> ValueRecord {
        ValueRecord::decoded(start, marker, Value::RawBytes(vec![]))
    }
}
