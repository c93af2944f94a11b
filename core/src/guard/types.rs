//! guard/types.rs
//! The "I may close what I was given" capability backends are written against.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};

/// A byte sink a backend may close when it has finished a document.
pub trait CloseableWrite: Write {
    /// Finish with the sink. Implementations that own a resource release it.
    fn close(self) -> io::Result<()>;
}

/// A byte source a backend may close when it has finished a document.
pub trait CloseableRead: Read {
    fn close(self) -> io::Result<()>;
}

impl CloseableWrite for File {
    fn close(self) -> io::Result<()> {
        self.sync_all()?;
        drop(self);
        Ok(())
    }
}

impl CloseableRead for File {
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl<W: Write> CloseableWrite for BufWriter<W> {
    fn close(self) -> io::Result<()> {
        // into_inner flushes; the inner writer is then dropped.
        self.into_inner().map_err(|e| e.into_error())?;
        Ok(())
    }
}

impl<R: Read> CloseableRead for BufReader<R> {
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl CloseableWrite for Vec<u8> {
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl<T> CloseableWrite for Cursor<T>
where
    Cursor<T>: Write,
{
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl<T: AsRef<[u8]>> CloseableRead for Cursor<T> {
    fn close(self) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl CloseableRead for &[u8] {
    fn close(self) -> io::Result<()> {
        Ok(())
    }
}
