use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::fp::Item;

/// Shared destination for formatted pattern records.
///
/// The sink is the only resource mutated by more than one thread during
/// mining; every access goes through the mutex, and writers hand over whole
/// buffered chunks to keep the critical section short.
pub struct PatternSink<W: Write> {
    inner: Mutex<W>,
}

impl<W: Write> PatternSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Append one buffered chunk under the sink lock.
    pub fn write_chunk(&self, chunk: &str) -> io::Result<()> {
        let mut writer = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("pattern sink lock poisoned"))?;
        writer.write_all(chunk.as_bytes())
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.inner
            .into_inner()
            .map_err(|_| io::Error::other("pattern sink lock poisoned"))
    }
}

/// Thread-private formatting buffer.
///
/// Records accumulate as `a,b,c:0.XXXX` lines; once the buffer reaches its
/// capacity it is handed to the sink and cleared, so peak memory stays at
/// (threads × capacity) no matter how many patterns are emitted.
pub struct PatternBuffer {
    buf: String,
    capacity: usize,
    total: usize,
}

impl PatternBuffer {
    /// `total` is the transaction count the support fractions are taken over.
    pub fn new(capacity: usize, total: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity + 128),
            capacity,
            total,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Format one pattern record from the two item runs and flush if the
    /// buffer is full. The runs must hold at least one item between them.
    pub fn record<W: Write>(
        &mut self,
        sink: &PatternSink<W>,
        head: &[Item],
        tail: &[Item],
        count: usize,
    ) -> io::Result<()> {
        let mut first = true;
        for &item in head.iter().chain(tail) {
            if first {
                let _ = write!(self.buf, "{item}");
                first = false;
            } else {
                let _ = write!(self.buf, ",{item}");
            }
        }
        let support = count as f64 / self.total as f64;
        let _ = writeln!(self.buf, ":{support:.4}");

        if self.buf.len() >= self.capacity {
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Drain whatever is buffered to the sink.
    pub fn flush<W: Write>(&mut self, sink: &PatternSink<W>) -> io::Result<()> {
        if !self.buf.is_empty() {
            sink.write_chunk(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}
