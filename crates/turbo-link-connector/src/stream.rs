//! In-memory stream bridge.
//!
//! Transfer APIs want something readable or writable; a [`StreamBridge`] gives them
//! that over a byte buffer so no temporary file is ever created. The buffer is
//! released when the bridge is dropped, which covers every early return.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use turbo_link_core::{CoreError, Result};

/// A rewindable read/write handle over an owned byte buffer.
///
/// Single use and not shared: one operation opens it, moves bytes through it and
/// drops it.
#[derive(Debug, Default)]
pub struct StreamBridge {
    inner: Cursor<Vec<u8>>,
}

impl StreamBridge {
    /// Returns a readable handle positioned at the start of a copy of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Stream`] if the buffer cannot be reserved.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut buffer = Self::reserve(data.len(), "open readable stream")?;
        buffer.extend_from_slice(data);
        Ok(Self {
            inner: Cursor::new(buffer),
        })
    }

    /// Returns an empty handle meant to receive bytes, then be rewound and read back.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Stream`] if the buffer cannot be reserved.
    pub fn new_empty() -> Result<Self> {
        Self::with_capacity(0)
    }

    /// Like [`StreamBridge::new_empty`] with room for `capacity` bytes up front.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let buffer = Self::reserve(capacity, "open writable stream")?;
        Ok(Self {
            inner: Cursor::new(buffer),
        })
    }

    fn reserve(capacity: usize, operation: &str) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|e| CoreError::Stream {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }

    /// Moves the cursor back to the first byte.
    pub fn rewind(&mut self) {
        self.inner.set_position(0);
    }

    /// Reads everything from the current position to the end.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        let remaining = self.remaining();
        let mut out = Self::reserve(remaining, "read stream contents")?;
        self.inner.read_to_end(&mut out)?;
        Ok(out)
    }

    /// Number of bytes held by the buffer.
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remaining(&self) -> usize {
        let position = usize::try_from(self.inner.position()).unwrap_or(usize::MAX);
        self.len().saturating_sub(position)
    }
}

impl Read for StreamBridge {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for StreamBridge {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for StreamBridge {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_reads_back_everything() {
        let mut bridge = StreamBridge::from_bytes(b"hello\0world").unwrap();
        assert_eq!(bridge.len(), 11);
        assert_eq!(bridge.read_to_vec().unwrap(), b"hello\0world");
        // exhausted until rewound
        assert!(bridge.read_to_vec().unwrap().is_empty());
        bridge.rewind();
        assert_eq!(bridge.read_to_vec().unwrap(), b"hello\0world");
    }

    #[test]
    fn test_empty_bridge_receives_then_rewinds() {
        let mut bridge = StreamBridge::new_empty().unwrap();
        assert!(bridge.is_empty());

        bridge.write_all(b"chunk one, ").unwrap();
        bridge.write_all(b"chunk two").unwrap();
        bridge.rewind();

        assert_eq!(bridge.read_to_vec().unwrap(), b"chunk one, chunk two");
    }

    #[test]
    fn test_from_empty_slice() {
        let mut bridge = StreamBridge::from_bytes(&[]).unwrap();
        assert!(bridge.is_empty());
        assert!(bridge.read_to_vec().unwrap().is_empty());
    }

    #[test]
    fn test_unreservable_capacity_is_stream_error() {
        let err = StreamBridge::with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), turbo_link_core::ErrorKind::Stream);
    }
}
