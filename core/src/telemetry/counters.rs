//! telemetry/counters.rs
//! Mutable document and byte counters.

use std::io::{self, Read};

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct CodecCounters {
    pub documents_written: u64,
    pub documents_read: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub failed_writes: u64,
    pub failed_reads: u64,
}

impl CodecCounters {
    /// Record one complete document written, `len` bytes including framing.
    pub fn add_write(&mut self, len: usize) {
        self.documents_written += 1;
        self.bytes_written += len as u64;
    }

    /// Record one complete document read.
    pub fn add_read(&mut self, len: usize) {
        self.documents_read += 1;
        self.bytes_read += len as u64;
    }

    pub fn add_failed_write(&mut self) {
        self.failed_writes += 1;
    }

    pub fn add_failed_read(&mut self) {
        self.failed_reads += 1;
    }
}

/// Read adapter that counts the bytes pulled through it.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    count: usize,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}
