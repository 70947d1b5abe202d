use std::{
    io::{self, Read},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Where a tracker gets `current` from when the caller does not pass one.
#[derive(Debug, Clone)]
pub enum ProgressSource {
    /// Advance the last reported value by `step`.
    Manual { step: u64 },
    /// Read the byte offset of a file that is being consumed.
    Offset(ByteOffset),
}

impl Default for ProgressSource {
    fn default() -> Self {
        ProgressSource::Manual { step: 1 }
    }
}

/// Shared byte position, advanced by a [`CountingReader`].
#[derive(Debug, Clone, Default)]
pub struct ByteOffset(Arc<AtomicU64>);

impl ByteOffset {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn advance(&self, by: u64) {
        self.0.fetch_add(by, Ordering::Relaxed);
    }
}

/// Counts the bytes pulled out of the inner reader. Wrapping this in a
/// `BufReader` still reports the raw offset of the underlying file.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    offset: ByteOffset,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: ByteOffset::default(),
        }
    }

    pub fn offset(&self) -> ByteOffset {
        self.offset.clone()
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset.advance(n as u64);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};

    #[test]
    fn counts_raw_bytes_through_a_buffer() -> anyhow::Result<()> {
        let data = b"one\ntwo\nthree\n";
        let counting = CountingReader::new(&data[..]);
        let offset = counting.offset();
        let mut reader = BufReader::new(counting);

        let mut line = String::new();
        reader.read_line(&mut line)?;
        assert_eq!(line, "one\n");
        // The buffer pulled everything in one go.
        assert_eq!(offset.get(), data.len() as u64);
        Ok(())
    }
}
