//! A monotonic logical clock with a time-warp factor, so effects can be
//! played back faster, slower, or paused without touching the wall clock.

/// `logical = origin_logical + (now - origin_real) * scale`.
///
/// `set_scale` rebases `origin_real`/`origin_logical` to the current
/// instant so the logical clock stays continuous across a speed change.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    origin_real: u32,
    origin_logical: u32,
    scale: f32,
}

impl TimeScale {
    pub fn new(now: u32) -> Self {
        Self {
            origin_real: now,
            origin_logical: now,
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rebase so the logical clock is continuous at `now`, then apply the
    /// new scale going forward.
    pub fn set_scale(&mut self, now: u32, scale: f32) {
        self.origin_logical = self.logical(now);
        self.origin_real = now;
        self.scale = scale;
    }

    /// The warped logical time for real time `now`.
    pub fn logical(&self, now: u32) -> u32 {
        let delta = now as i64 - self.origin_real as i64;
        let warped = delta as f64 * self.scale as f64;
        (self.origin_logical as i64 + warped as i64).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_at_scale_one() {
        let ts = TimeScale::new(0);
        assert_eq!(ts.logical(0), 0);
        assert_eq!(ts.logical(1000), 1000);
    }

    #[test]
    fn set_scale_preserves_continuity() {
        let mut ts = TimeScale::new(0);
        assert_eq!(ts.logical(100), 100);
        ts.set_scale(100, 2.0);
        // logical(100) was 100 just before the rescale; after rescaling,
        // advancing real time by 50 should advance logical time by 100.
        assert_eq!(ts.logical(100), 100);
        assert_eq!(ts.logical(150), 200);
    }

    #[test]
    fn zero_scale_freezes_logical_time() {
        let mut ts = TimeScale::new(0);
        ts.set_scale(0, 0.0);
        assert_eq!(ts.logical(0), 0);
        assert_eq!(ts.logical(10_000), 0);
    }
}
