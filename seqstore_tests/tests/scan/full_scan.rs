use super::fixture::Row;
use anyhow::Result;
use seqstore_codec::io::ByteSource;
use seqstore_codec::serde::{Decoder, Mask};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

fn verify_all<S: ByteSource>(dec: &mut Decoder<S>, rows: &[Row], positions: &[u64]) {
    let records = dec.records().collect::<Vec<_>>();
    assert_eq!(rows.len(), records.len());
    for ((row, pos), record) in rows.iter().zip(positions.iter()).zip(records.iter()) {
        assert_eq!(row.expected(*pos, &Mask::All), *record);
    }
}

pub fn test_full_scan_from_reader(path: &Path, rows: &[Row], positions: &[u64]) -> Result<()> {
    let file_len = fs::metadata(path)?.len();

    let mut dec = Decoder::from_reader(BufReader::new(File::open(path)?));
    verify_all(&mut dec, rows, positions);
    assert_eq!(file_len, dec.position());

    Ok(())
}

pub fn test_full_scan_from_seekable(path: &Path, rows: &[Row], positions: &[u64]) -> Result<()> {
    let file_len = fs::metadata(path)?.len();

    let mut dec = Decoder::from_seekable(File::open(path)?);
    let mut results = dec.try_records();
    let mut ct = 0;
    for (row, pos) in rows.iter().zip(positions.iter()) {
        let record = results.next().ok_or(anyhow::anyhow!("Premature EOF"))??;
        assert_eq!(row.expected(*pos, &Mask::All), record);
        ct += 1;
    }
    assert!(results.next().is_none());
    assert_eq!(rows.len(), ct);
    assert_eq!(file_len, dec.position());

    Ok(())
}
