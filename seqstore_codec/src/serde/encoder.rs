use crate::serde::primitives::BigEndian;
use crate::serde::{BodyLen32, BodyLen64, Marker, MarkerByte, Timestamp, WriteLen};
use anyhow::Result;
use std::io::Write;
use tracing::warn;


#[derive(Clone, Copy, Debug)]
pub struct EncoderOptions {
    /// Flush the sink after every record.
    pub auto_flush: bool,
}
impl Default for EncoderOptions {
    fn default() -> Self {
        Self { auto_flush: true }
    }
}

/// Writes records to a sink.
///
/// The `put_*` methods report failures. The `write_*` methods never fail observably and return
/// `&mut Self` for chaining; the outcome of the latest one is kept in [`Self::last_error()`].
/// After a failure, the sink may hold a partial record.
pub struct Encoder<W: Write> {
    w: W,
    opts: EncoderOptions,
    position: u64,
    last_error: Option<anyhow::Error>,
}

impl<W: Write> Encoder<W> {
    pub fn new(w: W) -> Self {
        Self::with_options(w, EncoderOptions::default())
    }

    pub fn with_options(w: W, opts: EncoderOptions) -> Self {
        Self {
            w,
            opts,
            position: 0,
            last_error: None,
        }
    }

    pub fn options(&self) -> EncoderOptions {
        self.opts
    }

    /// Bytes successfully written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &W {
        &self.w
    }

    pub fn into_inner(self) -> W {
        self.w
    }

    pub fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }

    /* Strict API */

    pub fn put_int32(&mut self, i: i32) -> Result<WriteLen> {
        self.put_direct(Marker::Int, i)
    }

    pub fn put_int64(&mut self, i: i64) -> Result<WriteLen> {
        self.put_direct(Marker::Long, i)
    }

    pub fn put_float64(&mut self, f: f64) -> Result<WriteLen> {
        self.put_direct(Marker::Double, f)
    }

    pub fn put_timestamp(&mut self, ts: Option<Timestamp>) -> Result<WriteLen> {
        match ts {
            None => self.put_null(Marker::Date),
            Some(ts) => self.put_direct(Marker::Date, ts.epoch_millis()),
        }
    }

    pub fn put_bytes(&mut self, bytes: Option<&[u8]>) -> Result<WriteLen> {
        match bytes {
            None => self.put_null(Marker::Bytes),
            Some(bytes) => {
                let len = BodyLen32::from_count(bytes.len())?;
                self.emit(Self::head32(Marker::Bytes, len), &[bytes])
            }
        }
    }

    pub fn put_chars(&mut self, units: Option<&[u16]>) -> Result<WriteLen> {
        match units {
            None => self.put_null(Marker::Chars),
            Some(units) => self.put_code_units(Marker::Chars, units),
        }
    }

    /// The text is written as UTF-16 code units, and its length counts code units.
    pub fn put_text(&mut self, s: Option<&str>) -> Result<WriteLen> {
        match s {
            None => self.put_null(Marker::String),
            Some(s) => {
                let units = s.encode_utf16().collect::<Vec<_>>();
                self.put_code_units(Marker::String, &units)
            }
        }
    }

    /// An absent payload is written the same as an empty one.
    pub fn put_custom_sized32(&mut self, data: Option<&[u8]>) -> Result<WriteLen> {
        let data = data.unwrap_or_default();
        let len = BodyLen32::from_count(data.len())?;
        self.emit(Self::head32(Marker::CustomInt, len), &[data])
    }

    /// Writes one record whose payload is the concatenation of the present chunks.
    pub fn put_custom_sized64<C: AsRef<[u8]>>(&mut self, chunks: &[Option<C>]) -> Result<WriteLen> {
        let bodies = chunks
            .iter()
            .flatten()
            .map(AsRef::<[u8]>::as_ref)
            .filter(|chunk| !chunk.is_empty())
            .collect::<Vec<_>>();
        let total = bodies.iter().map(|chunk| chunk.len() as u64).sum::<u64>();
        let len = BodyLen64::from_count(total)?;

        let mut head = vec![*MarkerByte::from(Marker::CustomLong)];
        (*len).put_be(&mut head);
        self.emit(head, &bodies)
    }

    fn put_direct<T: BigEndian>(&mut self, marker: Marker, t: T) -> Result<WriteLen> {
        let mut head = Vec::with_capacity(1 + T::WIDTH);
        head.push(*MarkerByte::from(marker));
        t.put_be(&mut head);
        self.emit(head, &[])
    }

    fn put_null(&mut self, marker: Marker) -> Result<WriteLen> {
        let null = marker.null_variant().unwrap_or(marker);
        self.emit(vec![*MarkerByte::from(null)], &[])
    }

    fn put_code_units(&mut self, marker: Marker, units: &[u16]) -> Result<WriteLen> {
        let len = BodyLen32::from_count(units.len())?;
        let mut body = Vec::with_capacity(units.len() * u16::WIDTH);
        for unit in units {
            unit.put_be(&mut body);
        }
        self.emit(Self::head32(marker, len), &[&body[..]])
    }

    fn head32(marker: Marker, len: BodyLen32) -> Vec<u8> {
        let mut head = Vec::with_capacity(1 + i32::WIDTH);
        head.push(*MarkerByte::from(marker));
        (*len).put_be(&mut head);
        head
    }

    fn emit(&mut self, head: Vec<u8>, bodies: &[&[u8]]) -> Result<WriteLen> {
        let mut w_len = 0;
        self.w.write_all(&head)?;
        w_len += head.len();
        self.position += head.len() as u64;
        for body in bodies {
            self.w.write_all(body)?;
            w_len += body.len();
            self.position += body.len() as u64;
        }
        if self.opts.auto_flush {
            self.w.flush()?;
        }
        Ok(WriteLen::new_manual(w_len))
    }

    /* Fluent API */

    pub fn write_int32(&mut self, i: i32) -> &mut Self {
        let res = self.put_int32(i);
        self.absorb(Marker::Int, res)
    }

    pub fn write_int64(&mut self, i: i64) -> &mut Self {
        let res = self.put_int64(i);
        self.absorb(Marker::Long, res)
    }

    pub fn write_float64(&mut self, f: f64) -> &mut Self {
        let res = self.put_float64(f);
        self.absorb(Marker::Double, res)
    }

    pub fn write_timestamp(&mut self, ts: Option<Timestamp>) -> &mut Self {
        let res = self.put_timestamp(ts);
        self.absorb(Marker::Date, res)
    }

    pub fn write_bytes(&mut self, bytes: Option<&[u8]>) -> &mut Self {
        let res = self.put_bytes(bytes);
        self.absorb(Marker::Bytes, res)
    }

    pub fn write_chars(&mut self, units: Option<&[u16]>) -> &mut Self {
        let res = self.put_chars(units);
        self.absorb(Marker::Chars, res)
    }

    pub fn write_text(&mut self, s: Option<&str>) -> &mut Self {
        let res = self.put_text(s);
        self.absorb(Marker::String, res)
    }

    pub fn write_custom_sized32(&mut self, data: Option<&[u8]>) -> &mut Self {
        let res = self.put_custom_sized32(data);
        self.absorb(Marker::CustomInt, res)
    }

    pub fn write_custom_sized64<C: AsRef<[u8]>>(&mut self, chunks: &[Option<C>]) -> &mut Self {
        let res = self.put_custom_sized64(chunks);
        self.absorb(Marker::CustomLong, res)
    }

    fn absorb(&mut self, marker: Marker, res: Result<WriteLen>) -> &mut Self {
        match res {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!(%marker, position = self.position, "Write failed: {e:#}");
                self.last_error = Some(e);
            }
        }
        self
    }

    /// The failure of the latest `write_*` call, if it failed.
    pub fn last_error(&self) -> Option<&anyhow::Error> {
        self.last_error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.last_error.is_none()
    }

    pub fn take_last_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }
}
