//! Request spacing for the TMDB API.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum spacing between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Spaces consecutive requests at least `min_interval` apart.
///
/// Holds the earliest instant at which the next request may start.
/// Only delays; never retries or drops a request.
#[derive(Debug)]
pub struct RequestThrottle {
    /// Minimum spacing between request starts.
    min_interval: Duration,
    /// Earliest start of the next request (`None` before the first one).
    next_slot: Option<Instant>,
}

impl RequestThrottle {
    /// Creates a throttle with the given minimum spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a throttle with the default spacing (25ms).
    pub(crate) const fn with_default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits for the next slot and reserves the one after it.
    pub async fn acquire(&mut self) {
        if let Some(slot) = self.next_slot
            && slot > Instant::now()
        {
            tokio::time::sleep_until(slot).await;
        }
        self.next_slot = Instant::now().checked_add(self.min_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_does_not_wait() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_secs(1));
        let start = Instant::now();

        // Act
        throttle.acquire().await;

        // Assert
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_acquire_waits_for_interval() {
        // Arrange
        let mut throttle = RequestThrottle::new(Duration::from_millis(50));
        let start = Instant::now();

        // Act
        throttle.acquire().await;
        throttle.acquire().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let throttle = RequestThrottle::with_default_interval();

        // Assert
        assert_eq!(throttle.min_interval, Duration::from_millis(25));
        assert!(throttle.next_slot.is_none());
    }
}
