//! Randomised inter-request pacing.
//!
//! Every request to the catalog is preceded by a sleep drawn uniformly
//! from `[min_delay, max_delay]`. There is one pacer per client.

use rand::Rng;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Jittered delay applied before each catalog request.
#[derive(Debug, Clone)]
pub struct Pacer {
    min_delay: Duration,
    max_delay: Duration,
}

impl Pacer {
    /// Create a pacer. Bounds given in the wrong order are swapped.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        if min_delay <= max_delay {
            Self {
                min_delay,
                max_delay,
            }
        } else {
            Self {
                min_delay: max_delay,
                max_delay: min_delay,
            }
        }
    }

    /// Build from millisecond bounds.
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// A pacer that never sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw the next delay.
    pub fn next_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Sleep for the next delay.
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("Catalog pacing: waiting {:?}", delay);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_within_bounds() {
        let pacer = Pacer::from_millis(200, 800);
        for _ in 0..200 {
            let d = pacer.next_delay();
            assert!(d >= Duration::from_millis(200));
            assert!(d <= Duration::from_millis(800));
        }
    }

    #[test]
    fn test_swapped_bounds() {
        let pacer = Pacer::from_millis(500, 100);
        let d = pacer.next_delay();
        assert!(d >= Duration::from_millis(100));
        assert!(d <= Duration::from_millis(500));
    }

    #[test]
    fn test_fixed_delay() {
        let pacer = Pacer::from_millis(300, 300);
        assert_eq!(pacer.next_delay(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_disabled_does_not_sleep() {
        let pacer = Pacer::disabled();
        let start = std::time::Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_wait_sleeps_at_least_min() {
        let pacer = Pacer::from_millis(30, 40);
        let start = std::time::Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
