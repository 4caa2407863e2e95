use std::io::{self, Read};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Progress of a work unit, measured in source bytes.
///
/// Counts the bytes of all finished files plus the bytes read so far from the current file. The
/// fraction never decreases.
#[derive(Debug, Clone)]
pub struct Progress {
    total: u64,
    consumed: Arc<AtomicU64>,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            consumed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the completed fraction between 0 and 1.
    #[allow(clippy::cast_precision_loss, reason = "Informational only")]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.consumed() as f64 / self.total as f64).min(1.0)
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Marks everything up to the byte `offset` of the unit as consumed.
    pub fn complete_through(&self, offset: u64) {
        self.consumed.fetch_max(offset, Ordering::Relaxed);
    }

    /// Wraps `reader` so that reading from it advances this progress.
    pub fn reader<R: Read>(&self, reader: R) -> CountingReader<R> {
        CountingReader {
            inner: reader,
            progress: self.clone(),
        }
    }
}

/// A reader that reports the number of bytes read to a [Progress].
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    progress: Progress,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.progress
            .consumed
            .fetch_add(read as u64, Ordering::Relaxed);
        Ok(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_bytes_across_files() {
        let progress = Progress::new(20);
        let mut first = progress.reader(&[0_u8; 10][..]);
        let mut buffer = [0; 4];
        first.read_exact(&mut buffer).unwrap();
        assert_eq!(progress.consumed(), 4);
        assert!((progress.fraction() - 0.2).abs() < f64::EPSILON);

        progress.complete_through(10);
        assert_eq!(progress.consumed(), 10);

        let mut second = progress.reader(&[0_u8; 10][..]);
        std::io::copy(&mut second, &mut std::io::sink()).unwrap();
        progress.complete_through(20);
        assert!((progress.fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_units_are_complete() {
        assert!((Progress::new(0).fraction() - 1.0).abs() < f64::EPSILON);
    }
}
