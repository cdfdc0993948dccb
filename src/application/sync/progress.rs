// Progress plumbing for bulk station imports.
//
// Purpose
// - Give the shell a bounded-rate view of a running import: a watch channel
//   holds only the latest snapshot, so a slow consumer never builds a queue.
//
// Responsibilities
// - MonotonicProgress enforces the delivery rule: done never decreases and
//   never exceeds total; stale or out-of-range ticks are dropped, not surfaced.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::core::ports::{ImportProgress, ProgressSink};

/// Guard wrapped around every caller-supplied sink by the station refresh
/// handler. Drops ticks that would move `done` backwards or past `total`.
pub struct MonotonicProgress<TSink: ProgressSink> {
    inner: TSink,
    last_done: AtomicU64,
}

impl<TSink: ProgressSink> MonotonicProgress<TSink> {
    pub fn new(inner: TSink) -> Self {
        Self {
            inner,
            last_done: AtomicU64::new(0),
        }
    }
}

impl<TSink: ProgressSink> ProgressSink for MonotonicProgress<TSink> {
    fn report(&self, progress: ImportProgress) {
        if progress.done > progress.total {
            return;
        }
        let previous = self.last_done.fetch_max(progress.done, Ordering::AcqRel);
        if progress.done < previous {
            return;
        }
        self.inner.report(progress);
    }
}

/// Watch-backed sink: the sending half implements ProgressSink, the receiving
/// half is handed to whoever renders progress.
pub struct ProgressChannel {
    tx: watch::Sender<ImportProgress>,
}

impl ProgressChannel {
    pub fn new() -> (Self, watch::Receiver<ImportProgress>) {
        let (tx, rx) = watch::channel(ImportProgress::default());
        (Self { tx }, rx)
    }
}

impl ProgressSink for ProgressChannel {
    fn report(&self, progress: ImportProgress) {
        self.tx.send_replace(progress);
    }
}

#[cfg(test)]
mod sync_progress_tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        ticks: Mutex<Vec<ImportProgress>>,
    }

    impl RecordingSink {
        fn done_values(&self) -> Vec<u64> {
            self.ticks.lock().unwrap().iter().map(|p| p.done).collect()
        }
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, progress: ImportProgress) {
            self.ticks.lock().unwrap().push(progress);
        }
    }

    fn tick(done: u64, total: u64) -> ImportProgress {
        ImportProgress { done, total }
    }

    #[rstest]
    fn it_should_pass_a_non_decreasing_sequence_through() {
        let guard = MonotonicProgress::new(RecordingSink::default());
        for done in [1, 2, 2, 3] {
            guard.report(tick(done, 3));
        }
        assert_eq!(guard.inner.done_values(), vec![1, 2, 2, 3]);
    }

    #[rstest]
    fn it_should_drop_ticks_that_move_backwards() {
        let guard = MonotonicProgress::new(RecordingSink::default());
        for done in [1, 3, 2, 3] {
            guard.report(tick(done, 3));
        }
        assert_eq!(guard.inner.done_values(), vec![1, 3, 3]);
    }

    #[rstest]
    fn it_should_drop_ticks_past_the_total() {
        let guard = MonotonicProgress::new(RecordingSink::default());
        guard.report(tick(5, 3));
        guard.report(tick(2, 3));
        assert_eq!(guard.inner.done_values(), vec![2]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_expose_only_the_latest_snapshot() {
        let (sink, rx) = ProgressChannel::new();
        sink.report(tick(1, 10));
        sink.report(tick(7, 10));
        assert_eq!(*rx.borrow(), tick(7, 10));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_reporting_after_the_receiver_is_gone() {
        let (sink, rx) = ProgressChannel::new();
        drop(rx);
        sink.report(tick(1, 10));
    }
}
