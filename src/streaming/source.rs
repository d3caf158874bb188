//! Byte source served to receivers

use std::io::{self, Read, Seek, SeekFrom};

use bytes::Bytes;

/// Anything the controller can serve bytes from
pub trait MediaSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> MediaSource for T {}

/// One block of source data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Bytes read
    pub data: Bytes,
    /// No data follows this block
    pub eof: bool,
}

impl DataBlock {
    /// An empty block flagged end-of-file
    #[must_use]
    pub fn end() -> Self {
        Self {
            data: Bytes::new(),
            eof: true,
        }
    }
}

/// An open source together with its size and current offset
pub struct OpenSource {
    source: Box<dyn MediaSource>,
    size: u64,
    offset: u64,
}

impl OpenSource {
    /// Wrap a source positioned at its start
    #[must_use]
    pub fn new(source: Box<dyn MediaSource>, size: u64) -> Self {
        Self {
            source,
            size,
            offset: 0,
        }
    }

    /// Total size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current offset from the start
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read up to `len` bytes from the current offset
    ///
    /// The block is flagged end-of-file when fewer than `len` bytes were
    /// available or the read reached the end of the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn read_block(&mut self, len: usize) -> io::Result<DataBlock> {
        let remaining = usize::try_from(self.size.saturating_sub(self.offset)).unwrap_or(usize::MAX);
        let mut buf = Vec::with_capacity(len.min(remaining));
        let count = (&mut self.source).take(len as u64).read_to_end(&mut buf)?;
        self.offset += count as u64;

        Ok(DataBlock {
            data: Bytes::from(buf),
            eof: count < len || self.offset >= self.size,
        })
    }

    /// Reposition to an absolute offset from the start
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying seek fails.
    pub fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.offset = self.source.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}
