use super::fixture::Row;
use anyhow::Result;
use seqstore_codec::serde::{Decoder, Marker, ReadResult, MASK_NONE, MASK_NUMERIC};
use std::fs::{self, File};
use std::path::Path;

/// Every payload is skipped, yet positions and markers are all reported.
pub fn test_metadata_scan(path: &Path, rows: &[Row], positions: &[u64]) -> Result<()> {
    let file_len = fs::metadata(path)?.len();

    let mut dec = Decoder::from_seekable(File::open(path)?).with_mask(MASK_NONE);
    for (row, pos) in rows.iter().zip(positions.iter()) {
        match dec.try_next()? {
            ReadResult::EOF => panic!("Premature EOF at {pos}"),
            ReadResult::Some(_r_len, record) => {
                assert_eq!(*pos, record.position());
                assert_eq!(row.marker, record.marker());
                assert_eq!(row.expected(*pos, &MASK_NONE), record);
            }
        }
    }
    assert_eq!(ReadResult::EOF, dec.try_next()?);
    assert_eq!(file_len, dec.position());

    Ok(())
}

pub fn test_numeric_scan(path: &Path, rows: &[Row]) -> Result<()> {
    let mut dec = Decoder::from_seekable(File::open(path)?).with_mask(MASK_NUMERIC);

    let act = dec
        .records()
        .filter(|record| record.is_valid() && !record.is_null())
        .filter_map(|record| match record.marker() {
            Marker::Int | Marker::Long | Marker::Double => Some(record.into_value()),
            _ => None,
        })
        .collect::<Vec<_>>();
    let exp = rows
        .iter()
        .filter(|row| matches!(row.marker, Marker::Int | Marker::Long | Marker::Double))
        .map(|row| row.value.clone())
        .collect::<Vec<_>>();
    assert_eq!(exp, act);

    Ok(())
}
