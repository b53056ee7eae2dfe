use anyhow::Result;
use rand::Rng;
use seqstore_codec::serde::{Encoder, EncoderOptions, Marker, Mask, Timestamp, Value, ValueRecord};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct Row {
    pub marker: Marker,
    pub value: Value,
}

impl Row {
    /// What a decoder configured with `mask` should produce for this row.
    pub fn expected(&self, position: u64, mask: &Mask) -> ValueRecord {
        let is_empty_custom =
            self.marker.is_custom() && self.value.as_bytes().map_or(false, |b| b.is_empty());
        if mask.matches(self.marker) || self.marker.is_null_variant() || is_empty_custom {
            ValueRecord::decoded(position, self.marker, self.value.clone())
        } else {
            ValueRecord::invalid(position, self.marker)
        }
    }
}

fn gen_bytes(rng: &mut impl Rng, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen()).collect()
}

fn gen_text(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(0..20);
    (0..len)
        .map(|_| match rng.gen_range(0..4) {
            0 => '\u{1F600}',
            1 => 'é',
            _ => rng.gen_range('a'..='z'),
        })
        .collect()
}

pub fn gen_row(rng: &mut impl Rng) -> Row {
    let (marker, value) = match rng.gen_range(0..13) {
        0 => (Marker::Int, Value::Int32(rng.gen())),
        1 => (Marker::Long, Value::Int64(rng.gen())),
        2 => (Marker::Double, Value::Float64(rng.gen_range(-1e9..1e9))),
        3 => {
            let millis = rng.gen_range(0..4_000_000_000_000i64);
            (Marker::Date, Value::Timestamp(Timestamp::from(millis)))
        }
        4 => (Marker::Bytes, Value::RawBytes(gen_bytes(rng, 64))),
        5 => {
            let units = (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect();
            (Marker::Chars, Value::CharSequence(units))
        }
        6 => (Marker::String, Value::Text(gen_text(rng))),
        7 => (Marker::CustomInt, Value::RawBytes(gen_bytes(rng, 64))),
        8 => (Marker::CustomLong, Value::RawBytes(gen_bytes(rng, 4096))),
        9 => (Marker::DateNull, Value::None),
        10 => (Marker::BytesNull, Value::None),
        11 => (Marker::CharsNull, Value::None),
        _ => (Marker::StringNull, Value::None),
    };
    Row { marker, value }
}

pub fn gen_rows(count: usize) -> Vec<Row> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| gen_row(&mut rng)).collect()
}

/// Writes the rows through a buffered file, flushing once at the end.
/// Returns the position of each row.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<Vec<u64>> {
    let file = File::create(path)?;
    let opts = EncoderOptions { auto_flush: false };
    let mut enc = Encoder::with_options(BufWriter::new(file), opts);

    let mut positions = Vec::with_capacity(rows.len());
    for row in rows {
        positions.push(enc.position());
        let v = &row.value;
        match row.marker {
            Marker::Int => enc.write_int32(v.as_i32().unwrap_or_default()),
            Marker::Long => enc.write_int64(v.as_i64().unwrap_or_default()),
            Marker::Double => enc.write_float64(v.as_f64().unwrap_or_default()),
            Marker::Date | Marker::DateNull => enc.write_timestamp(v.as_timestamp()),
            Marker::Bytes | Marker::BytesNull => enc.write_bytes(v.as_bytes()),
            Marker::Chars | Marker::CharsNull => enc.write_chars(v.as_chars()),
            Marker::String | Marker::StringNull => enc.write_text(v.as_text()),
            Marker::CustomInt => enc.write_custom_sized32(v.as_bytes()),
            Marker::CustomLong => {
                // Split the payload, to exercise chunked writes.
                let bytes = v.as_bytes().unwrap_or_default();
                let (lo, hi) = bytes.split_at(bytes.len() / 2);
                enc.write_custom_sized64(&[Some(lo), None, Some(hi)])
            }
            Marker::Unknown => &mut enc,
        };
        if let Some(e) = enc.take_last_error() {
            return Err(e);
        }
    }
    enc.flush()?;
    Ok(positions)
}
