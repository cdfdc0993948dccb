// Single-flight gate: at most one refresh of a kind runs at a time.
//
// Purpose
// - A refresh request arriving while one is already in flight must not queue a
//   second fetch. It waits for the in-flight one to finish and reports that it
//   was coalesced.
//
// How it works
// - acquire() snapshots the completion counter, then takes the lock. If the
//   counter moved while we waited, a refresh completed in between and the
//   caller coalesces onto it. The permit bumps the counter on drop, so failed
//   refreshes release coalesced waiters the same way successful ones do.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct RefreshGate {
    lock: Mutex<()>,
    completions: AtomicU64,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Some(permit) when this caller should perform the refresh, None when an
    /// in-flight refresh completed while we waited for the lock.
    pub async fn acquire(&self) -> Option<RefreshPermit<'_>> {
        let seen = self.completions.load(Ordering::Acquire);
        let guard = self.lock.lock().await;
        if self.completions.load(Ordering::Acquire) != seen {
            return None;
        }
        Some(RefreshPermit {
            gate: self,
            _guard: guard,
        })
    }
}

pub struct RefreshPermit<'a> {
    gate: &'a RefreshGate,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        // Runs before the guard releases, so waiters always observe the bump.
        self.gate.completions.fetch_add(1, Ordering::Release);
    }
}

#[cfg(test)]
mod sync_gate_tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;

    #[rstest]
    #[tokio::test]
    async fn it_should_grant_sequential_acquires() {
        let gate = RefreshGate::new();
        let first = gate.acquire().await;
        assert!(first.is_some());
        drop(first);
        let second = gate.acquire().await;
        assert!(second.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_coalesce_a_waiter_onto_the_refresh_in_flight() {
        let gate = Arc::new(RefreshGate::new());
        let permit = gate.acquire().await;
        assert!(permit.is_some());

        let waiter = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.acquire().await.is_none() }
        });
        // Let the waiter block on the lock before the holder finishes.
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(permit);

        assert!(waiter.await.expect("RefreshGate > waiter task failed"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_release_waiters_even_when_the_holder_fails() {
        let gate = Arc::new(RefreshGate::new());
        let permit = gate.acquire().await;

        let waiter = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.acquire().await.is_none() }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        // Dropping without a success signal stands in for a failed refresh.
        drop(permit);

        assert!(waiter.await.expect("RefreshGate > waiter task failed"));
        // The gate is usable again afterwards.
        assert!(gate.acquire().await.is_some());
    }
}
