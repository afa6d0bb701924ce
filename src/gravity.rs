//! Gravity timing
//!
//! Accumulates frame time and says when the piece is due to fall one
//! row, using a faster interval while soft drop is held. At most one row
//! per check: when a step fires the accumulator goes back to zero and any
//! surplus from a long frame is dropped.

/// Base gravity interval (1 second per row)
pub const GRAVITY_MS: u32 = 1000;
/// Soft drop is this many times faster than gravity
pub const SOFT_DROP_MULTIPLIER: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gravity {
    interval_ms: u32,
    soft_drop_ms: u32,
    /// Time since the last automatic step
    elapsed_ms: u32,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(GRAVITY_MS, SOFT_DROP_MULTIPLIER)
    }
}

impl Gravity {
    pub fn new(interval_ms: u32, soft_drop_multiplier: u32) -> Self {
        Self {
            interval_ms,
            soft_drop_ms: (interval_ms / soft_drop_multiplier.max(1)).max(1),
            elapsed_ms: 0,
        }
    }

    /// Active interval for the current soft drop state
    pub fn interval(&self, soft_drop: bool) -> u32 {
        if soft_drop {
            self.soft_drop_ms
        } else {
            self.interval_ms
        }
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn advance(&mut self, delta_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
    }

    /// True when a one-row step is due; restarts the accumulator if so
    pub fn fire(&mut self, soft_drop: bool) -> bool {
        if self.elapsed_ms >= self.interval(soft_drop) {
            self.elapsed_ms = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_drop_interval() {
        let gravity = Gravity::new(1000, 10);
        assert_eq!(gravity.interval(false), 1000);
        assert_eq!(gravity.interval(true), 100);
        // Never below one millisecond
        assert_eq!(Gravity::new(5, 10).interval(true), 1);
    }

    #[test]
    fn test_fires_on_interval() {
        let mut gravity = Gravity::new(100, 10);
        gravity.advance(99);
        assert!(!gravity.fire(false));
        gravity.advance(1);
        assert!(gravity.fire(false));
        assert_eq!(gravity.elapsed_ms(), 0);
    }

    #[test]
    fn test_long_frame_fires_once() {
        let mut gravity = Gravity::new(100, 10);
        gravity.advance(1_000);
        assert!(gravity.fire(false));
        assert!(!gravity.fire(false));
    }

    #[test]
    fn test_soft_drop_fires_sooner() {
        let mut gravity = Gravity::new(100, 10);
        gravity.advance(10);
        assert!(!gravity.fire(false));
        assert!(gravity.fire(true));
    }
}
