use crate::io::ByteSource;
use crate::serde::{DecodeError, Decoder, ReadResult, ValueRecord};

/// Yields every record, including degraded ones. Stops after the first unknown marker.
pub struct RecordIterator<'d, S> {
    dec: &'d mut Decoder<S>,
    is_done: bool,
}
impl<'d, S> From<&'d mut Decoder<S>> for RecordIterator<'d, S> {
    fn from(dec: &'d mut Decoder<S>) -> Self {
        Self {
            dec,
            is_done: false,
        }
    }
}
impl<'d, S> Iterator for RecordIterator<'d, S>
where
    S: ByteSource,
{
    type Item = ValueRecord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }
        match self.dec.next_record() {
            ReadResult::EOF => {
                self.is_done = true;
                None
            }
            ReadResult::Some(_r_len, record) => {
                self.is_done = record.is_unknown();
                Some(record)
            }
        }
    }
}

/// Yields records until the end of stream, or until the first error, which is yielded too.
pub struct TryRecordIterator<'d, S> {
    dec: &'d mut Decoder<S>,
    is_done: bool,
}
impl<'d, S> From<&'d mut Decoder<S>> for TryRecordIterator<'d, S> {
    fn from(dec: &'d mut Decoder<S>) -> Self {
        Self {
            dec,
            is_done: false,
        }
    }
}
impl<'d, S> Iterator for TryRecordIterator<'d, S>
where
    S: ByteSource,
{
    type Item = Result<ValueRecord, DecodeError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }
        let res_opt_record = self.dec.try_next().map(|read_result| match read_result {
            ReadResult::EOF => None,
            ReadResult::Some(_r_len, record) => Some(record),
        });
        match &res_opt_record {
            Ok(None) | Err(_) => self.is_done = true,
            Ok(Some(_)) => {}
        }
        res_opt_record.transpose()
    }
}
