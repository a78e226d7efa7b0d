use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle that serializes writes to one underlying writer.
///
/// Use it when several loggers must share a single file or stream; every
/// clone writes through the same mutex.
#[derive(Debug, Default)]
pub struct SharedSink<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedSink<W> {
    fn clone(&self) -> Self {
        SharedSink {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Write> SharedSink<W> {
    pub fn new(writer: W) -> Self {
        SharedSink {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Lock the underlying writer.
    ///
    /// A lock poisoned by a panicking writer is recovered; the writer itself
    /// decides whether its state is still usable.
    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> Write for SharedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

/// In-memory sink whose clones share one buffer.
///
/// Handy for tests and for capturing output produced by a logger that owns
/// another clone.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: SharedSink<Vec<u8>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
