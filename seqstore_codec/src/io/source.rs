use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

const READ_CHUNK_LEN: usize = 64 * 1024;
const SKIP_SCRATCH_LEN: usize = 8 * 1024;

/// A sequential byte source that can skip.
///
/// Neither operation may report more bytes than the source actually held.
pub trait ByteSource {
    /// Fills `buf` as far as the source allows.
    ///
    /// Returns fewer than `buf.len()` only when the source is exhausted.
    /// A return of 0 for a non-empty `buf` means there is no more data.
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Advances by up to `len` bytes, and returns how many were actually skipped.
    fn skip_up_to(&mut self, len: u64) -> io::Result<u64>;

    /// Reads up to `len` bytes into a new buffer.
    ///
    /// Memory is committed as data arrives, so a bogus `len` does not allocate up front.
    fn read_vec_up_to(&mut self, len: u64) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(READ_CHUNK_LEN as u64) as usize);
        while (out.len() as u64) < len {
            let filled = out.len();
            let want = (len - filled as u64).min(READ_CHUNK_LEN as u64) as usize;
            out.resize(filled + want, 0);
            let got = self.read_up_to(&mut out[filled..])?;
            out.truncate(filled + got);
            if got < want {
                break;
            }
        }
        Ok(out)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_up_to(buf)
    }
    fn skip_up_to(&mut self, len: u64) -> io::Result<u64> {
        (**self).skip_up_to(len)
    }
}

/// Retries interruptions. An error after a partial fill is reported as a short read;
/// a source that keeps failing reports the error again on the next call.
fn fill_from<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) if filled > 0 => break,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Any [`Read`]. Skipping reads and discards.
pub struct ReadSource<R> {
    r: R,
}
impl<R: Read> From<R> for ReadSource<R> {
    fn from(r: R) -> Self {
        Self { r }
    }
}
impl<R> ReadSource<R> {
    pub fn get_ref(&self) -> &R {
        &self.r
    }
    pub fn into_inner(self) -> R {
        self.r
    }
}
impl<R: Read> ByteSource for ReadSource<R> {
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        fill_from(&mut self.r, buf)
    }
    fn skip_up_to(&mut self, len: u64) -> io::Result<u64> {
        let mut scratch = [0u8; SKIP_SCRATCH_LEN];
        let mut skipped = 0u64;
        while skipped < len {
            let want = (len - skipped).min(SKIP_SCRATCH_LEN as u64) as usize;
            let got = match fill_from(&mut self.r, &mut scratch[..want]) {
                Ok(got) => got,
                Err(_) if skipped > 0 => break,
                Err(e) => return Err(e),
            };
            skipped += got as u64;
            if got < want {
                break;
            }
        }
        Ok(skipped)
    }
}

/// A [`Read`] + [`Seek`]. Skipping seeks, and stops at the end of the stream.
pub struct SeekSource<R> {
    r: R,
}
impl<R: Read + Seek> From<R> for SeekSource<R> {
    fn from(r: R) -> Self {
        Self { r }
    }
}
impl<R> SeekSource<R> {
    pub fn get_ref(&self) -> &R {
        &self.r
    }
    pub fn into_inner(self) -> R {
        self.r
    }
}
impl<R: Read + Seek> ByteSource for SeekSource<R> {
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        fill_from(&mut self.r, buf)
    }
    fn skip_up_to(&mut self, len: u64) -> io::Result<u64> {
        let cur = self.r.stream_position()?;
        let end = self.r.seek(SeekFrom::End(0))?;
        let target = cur.saturating_add(len).min(end.max(cur));
        self.r.seek(SeekFrom::Start(target))?;
        Ok(target - cur)
    }
}

/// An in-memory source.
pub struct SliceSource<'a> {
    buf: &'a [u8],
}
impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}
impl<'a> SliceSource<'a> {
    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.buf
    }
}
impl<'a> ByteSource for SliceSource<'a> {
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.buf.len());
        let (head, tail) = self.buf.split_at(n);
        buf[..n].copy_from_slice(head);
        self.buf = tail;
        Ok(n)
    }
    fn skip_up_to(&mut self, len: u64) -> io::Result<u64> {
        let n = usize::try_from(len).unwrap_or(usize::MAX).min(self.buf.len());
        self.buf = &self.buf[n..];
        Ok(n as u64)
    }
}
