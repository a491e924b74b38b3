//! Throttled navigation readout

use starfield_core::Readout;
use std::time::{Duration, Instant};

/// Coalesces readout updates into at most one per period
///
/// The first request opens a window; when the window closes the most recent
/// readout is released and the next request opens a new window.
#[derive(Debug, Clone)]
pub struct ReadoutThrottle {
    period: Duration,
    pending: Option<Readout>,
    window_start: Option<Instant>,
}

impl ReadoutThrottle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            pending: None,
            window_start: None,
        }
    }

    /// Queue a readout, replacing any not yet released
    pub fn request(&mut self, readout: Readout, now: Instant) {
        self.pending = Some(readout);
        if self.window_start.is_none() {
            self.window_start = Some(now);
        }
    }

    /// Release the latest readout once the window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Readout> {
        let start = self.window_start?;
        if now.saturating_duration_since(start) < self.period {
            return None;
        }
        self.window_start = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_core::Point3f;

    fn readout(distance: f64) -> Readout {
        Readout {
            distance,
            orbit_center: Point3f::origin(),
            grid_scale: None,
        }
    }

    #[test]
    fn test_coalesces_to_latest() {
        let t0 = Instant::now();
        let mut throttle = ReadoutThrottle::new(Duration::from_millis(500));

        throttle.request(readout(60.0), t0);
        throttle.request(readout(50.0), t0 + Duration::from_millis(100));
        throttle.request(readout(40.0), t0 + Duration::from_millis(400));
        assert!(throttle.poll(t0 + Duration::from_millis(499)).is_none());

        let released = throttle.poll(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(released.distance, 40.0);
        assert!(throttle.poll(t0 + Duration::from_millis(2000)).is_none());
    }

    #[test]
    fn test_new_window_after_release() {
        let t0 = Instant::now();
        let mut throttle = ReadoutThrottle::new(Duration::from_millis(500));

        throttle.request(readout(1.0), t0);
        assert!(throttle.poll(t0 + Duration::from_millis(600)).is_some());

        let t1 = t0 + Duration::from_millis(700);
        throttle.request(readout(2.0), t1);
        assert!(throttle.poll(t1 + Duration::from_millis(100)).is_none());
        assert_eq!(throttle.poll(t1 + Duration::from_millis(500)).unwrap().distance, 2.0);
    }

    #[test]
    fn test_idle_throttle_releases_nothing() {
        let mut throttle = ReadoutThrottle::new(Duration::from_millis(500));
        assert!(!throttle.is_pending());
        assert!(throttle.poll(Instant::now()).is_none());
    }
}
