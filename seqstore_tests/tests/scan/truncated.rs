use super::fixture::{self, Row};
use anyhow::Result;
use seqstore_codec::serde::{Decoder, Marker, Value, MASK_NONE};
use std::fs::{self, File};
use std::path::Path;

/// A file cut in the middle of a record yields the complete records, then one degraded record.
pub fn test_truncated_tail(dir: &Path, rows: &[Row]) -> Result<()> {
    let mut rows = rows.to_vec();
    rows.push(Row {
        marker: Marker::Bytes,
        value: Value::RawBytes(vec![0xab; 100]),
    });

    let path = dir.join("truncated.bin");
    let positions = fixture::write_rows(&path, &rows)?;
    let last_pos = positions.last().copied().unwrap_or_default();
    let cut_len = last_pos + 1 + 4 + 40;
    File::options().write(true).open(&path)?.set_len(cut_len)?;
    assert_eq!(cut_len, fs::metadata(&path)?.len());

    let mut dec = Decoder::from_seekable(File::open(&path)?);
    let records = dec.records().collect::<Vec<_>>();
    assert_eq!(rows.len(), records.len());
    let last = records.last().ok_or(anyhow::anyhow!("No records"))?;
    assert_eq!(last_pos, last.position());
    assert!(!last.is_valid());
    assert_eq!(cut_len, dec.position());

    // Skipping past the end is clamped to the end.
    let mut dec = Decoder::from_seekable(File::open(&path)?).with_mask(MASK_NONE);
    let last = dec
        .records()
        .last()
        .ok_or(anyhow::anyhow!("No records"))?;
    assert_eq!(Marker::Bytes, last.marker());
    assert!(!last.is_valid());
    assert_eq!(cut_len, dec.position());

    // The strict API reports the cut.
    let mut dec = Decoder::from_seekable(File::open(&path)?);
    let first_err = dec.try_records().find_map(|res| res.err());
    let err = first_err.ok_or(anyhow::anyhow!("Expected an error"))?;
    assert_eq!(last_pos, err.position());

    Ok(())
}
