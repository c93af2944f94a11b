//! guard/reader.rs
//! Input side of the ownership guard.

use std::fmt;
use std::io::{self, BufRead, IoSliceMut, Read, Seek, SeekFrom};

use crate::guard::types::CloseableRead;

/// Borrowed view of a caller-owned source whose `close` does nothing.
///
/// Reads, buffered access (`fill_buf`/`consume`) and seeking go straight to
/// the wrapped source, so its position after the call is exactly where the
/// backend stopped consuming.
pub struct NonClosingReader<'a, R: Read + ?Sized> {
    inner: &'a mut R,
}

impl<'a, R: Read + ?Sized> NonClosingReader<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &*self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut *self.inner
    }

    pub fn is_wrapping(&self, other: &R) -> bool {
        std::ptr::eq(&*self.inner as *const R, other as *const R)
    }
}

impl<R: Read + ?Sized> Read for NonClosingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        self.inner.read_vectored(bufs)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }

    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.inner.read_to_end(buf)
    }

    fn read_to_string(&mut self, buf: &mut String) -> io::Result<usize> {
        self.inner.read_to_string(buf)
    }
}

impl<R: BufRead + ?Sized> BufRead for NonClosingReader<'_, R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<R: Read + Seek + ?Sized> Seek for NonClosingReader<'_, R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }
}

impl<R: Read + ?Sized> CloseableRead for NonClosingReader<'_, R> {
    fn close(self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Read + fmt::Debug + ?Sized> fmt::Debug for NonClosingReader<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl<R: Read + fmt::Display + ?Sized> fmt::Display for NonClosingReader<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl<R: Read + PartialEq + ?Sized> PartialEq<R> for NonClosingReader<'_, R> {
    fn eq(&self, other: &R) -> bool {
        *self.inner == *other
    }
}
