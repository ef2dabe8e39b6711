use std::io::{self, Read, Seek, SeekFrom};

/// Receives the cumulative number of bytes read so far.
pub type ProgressCallback = Box<dyn FnMut(u64) + Send>;

/// Wraps a byte stream and reports every read (and every seek) to a callback.
///
/// The count tracks bytes handed to the HTTP client, not bytes acknowledged by
/// the server. A seek resets the count to the new position, so a client that
/// rewinds the body will report a smaller value.
pub struct ProgressReader<R> {
    inner: R,
    read: u64,
    on_progress: ProgressCallback,
}

impl<R> ProgressReader<R> {
    pub fn new(inner: R, on_progress: ProgressCallback) -> Self {
        Self {
            inner,
            read: 0,
            on_progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n as u64;
        (self.on_progress)(self.read);
        Ok(n)
    }
}

impl<R: Seek> Seek for ProgressReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let pos = self.inner.seek(pos)?;
        self.read = pos;
        (self.on_progress)(self.read);
        Ok(pos)
    }
}
