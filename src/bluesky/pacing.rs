// Fixed-delay pacing between API calls.
//
// The collector is strictly sequential and makes no retries, so the only
// rate-limit courtesy it owes the API is a fixed pause between consecutive
// requests. The pacer tracks the last request time with interior
// mutability so callers only need a &self reference.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Enforces a minimum delay between consecutive requests.
pub struct Pacer {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer with the given inter-request delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the configured delay has elapsed since the previous call,
    /// then record this call.
    ///
    /// The wait is computed while holding the lock and slept on after
    /// dropping it, so the guard is never held across an await point.
    pub async fn wait(&self) {
        let pending = {
            let mut last = self.last_request.lock().unwrap();
            let wait = match *last {
                Some(prev) => {
                    let elapsed = prev.elapsed();
                    if elapsed < self.delay {
                        Some(self.delay - elapsed)
                    } else {
                        None
                    }
                }
                None => None,
            };
            if wait.is_none() {
                *last = Some(Instant::now());
            }
            wait
        };

        if let Some(wait) = pending {
            tokio::time::sleep(wait).await;
            let mut last = self.last_request.lock().unwrap();
            *last = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_wait_is_immediate() {
        let pacer = Pacer::new(Duration::from_millis(100));

        let start = Instant::now();
        pacer.wait().await;
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(50),
            "First wait should be near-instant, got {:?}",
            elapsed
        );
        assert!(pacer.last_request.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn consecutive_waits_enforce_delay() {
        let pacer = Pacer::new(Duration::from_millis(50));

        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        let elapsed = start.elapsed();

        assert!(
            elapsed >= Duration::from_millis(45),
            "Expected at least ~50ms between calls, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn delay_accumulates_over_multiple_calls() {
        let pacer = Pacer::new(Duration::from_millis(20));

        let start = Instant::now();
        for _ in 0..4 {
            pacer.wait().await;
        }
        let elapsed = start.elapsed();

        // 3 inter-request gaps of at least ~20ms each
        assert!(
            elapsed >= Duration::from_millis(50),
            "Expected at least ~60ms for 4 calls with 20ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn zero_delay_allows_rapid_fire() {
        let pacer = Pacer::new(Duration::ZERO);

        let start = Instant::now();
        for _ in 0..50 {
            pacer.wait().await;
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(50),
            "Zero-delay waits should be near-instant, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn idle_gap_counts_toward_delay() {
        let pacer = Pacer::new(Duration::from_millis(30));

        pacer.wait().await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        // The delay already elapsed while idle, so no further wait is due.
        let start = Instant::now();
        pacer.wait().await;
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(20),
            "Wait after a long idle gap should be immediate, got {:?}",
            elapsed
        );
    }
}
