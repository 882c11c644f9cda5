//! Progress reporting for page retrieval (pages done, bytes, rate).

use std::time::Instant;

/// Snapshot of retrieval progress for one book (CLI-friendly).
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalProgress {
    /// Pages fully written to the staging directory.
    pub pages_done: usize,
    /// Total number of pages in the book.
    pub page_count: usize,
    /// Bytes written so far across finished pages.
    pub bytes_done: u64,
    /// Elapsed time since retrieval started (seconds).
    pub elapsed_secs: f64,
}

impl RetrievalProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.page_count == 0 {
            return 1.0;
        }
        (self.pages_done as f64 / self.page_count as f64).min(1.0)
    }

    /// Pages per second (0 if elapsed is 0).
    pub fn pages_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.pages_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if nothing finished yet).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.page_count.saturating_sub(self.pages_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.pages_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    pub fn is_complete(&self) -> bool {
        self.pages_done >= self.page_count
    }
}

/// Accumulates finished pages and forwards snapshots to an optional channel.
pub(super) struct ProgressTracker<'a> {
    page_count: usize,
    pages_done: usize,
    bytes_done: u64,
    start: Instant,
    tx: Option<&'a tokio::sync::mpsc::Sender<RetrievalProgress>>,
}

impl<'a> ProgressTracker<'a> {
    pub(super) fn new(
        page_count: usize,
        tx: Option<&'a tokio::sync::mpsc::Sender<RetrievalProgress>>,
    ) -> Self {
        Self {
            page_count,
            pages_done: 0,
            bytes_done: 0,
            start: Instant::now(),
            tx,
        }
    }

    pub(super) fn record(&mut self, bytes: u64) {
        self.pages_done += 1;
        self.bytes_done += bytes;
        if let Some(tx) = self.tx {
            // A full channel only drops an intermediate snapshot.
            let _ = tx.try_send(self.snapshot());
        }
    }

    pub(super) fn snapshot(&self) -> RetrievalProgress {
        RetrievalProgress {
            pages_done: self.pages_done,
            page_count: self.page_count,
            bytes_done: self.bytes_done,
            elapsed_secs: self.start.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pages_done: usize, page_count: usize, elapsed_secs: f64) -> RetrievalProgress {
        RetrievalProgress {
            pages_done,
            page_count,
            bytes_done: 0,
            elapsed_secs,
        }
    }

    #[test]
    fn fraction_and_completion() {
        assert_eq!(stats(0, 4, 0.0).fraction(), 0.0);
        assert_eq!(stats(2, 4, 1.0).fraction(), 0.5);
        assert!(stats(4, 4, 1.0).is_complete());
        assert_eq!(stats(0, 0, 0.0).fraction(), 1.0);
    }

    #[test]
    fn eta_from_page_rate() {
        assert_eq!(stats(2, 4, 0.0).eta_secs(), None);
        let eta = stats(2, 6, 2.0).eta_secs().unwrap();
        assert!((eta - 4.0).abs() < 1e-9);
        assert_eq!(stats(6, 6, 2.0).eta_secs(), Some(0.0));
    }

    #[test]
    fn tracker_sends_snapshots() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        let mut tracker = ProgressTracker::new(2, Some(&tx));
        tracker.record(10);
        tracker.record(5);
        let first = rx.try_recv().unwrap();
        assert_eq!((first.pages_done, first.bytes_done), (1, 10));
        let second = rx.try_recv().unwrap();
        assert_eq!((second.pages_done, second.bytes_done), (2, 15));
        assert!(second.is_complete());
    }
}
