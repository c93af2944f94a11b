//! guard/writer.rs
//! Output side of the ownership guard.

use std::fmt;
use std::io::{self, IoSlice, Seek, SeekFrom, Write};

use crate::guard::types::CloseableWrite;

/// Borrowed view of a caller-owned sink whose `close` only flushes.
///
/// Every other operation is forwarded unchanged to the wrapped sink,
/// including `Debug`/`Display` and equality.
pub struct NonClosingWriter<'a, W: Write + ?Sized> {
    inner: &'a mut W,
}

impl<'a, W: Write + ?Sized> NonClosingWriter<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &*self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut *self.inner
    }

    /// True when this guard wraps exactly `other`.
    pub fn is_wrapping(&self, other: &W) -> bool {
        std::ptr::eq(&*self.inner as *const W, other as *const W)
    }
}

impl<W: Write + ?Sized> Write for NonClosingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.inner.write_vectored(bufs)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.inner.write_fmt(args)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Seek + ?Sized> Seek for NonClosingWriter<'_, W> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }
}

impl<W: Write + ?Sized> CloseableWrite for NonClosingWriter<'_, W> {
    fn close(self) -> io::Result<()> {
        // Ignore close: the caller owns the sink.
        self.inner.flush()
    }
}

impl<W: Write + fmt::Debug + ?Sized> fmt::Debug for NonClosingWriter<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl<W: Write + fmt::Display + ?Sized> fmt::Display for NonClosingWriter<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl<W: Write + PartialEq + ?Sized> PartialEq<W> for NonClosingWriter<'_, W> {
    fn eq(&self, other: &W) -> bool {
        *self.inner == *other
    }
}
