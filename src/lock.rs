//! Lock delay
//!
//! A piece touching the stack or floor is `resting` and counts towards
//! its lock. Moving or rotating a resting piece resets the countdown, but
//! only `max_resets` times per piece; after that it locks on schedule.

/// Lock delay settings
pub const LOCK_DELAY_MS: u32 = 500;
pub const MAX_LOCK_RESETS: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockDelay {
    resting: bool,
    /// Time spent resting since the countdown (re)started
    elapsed_ms: u32,
    resets: u8,
    max_resets: u8,
    delay_ms: u32,
}

impl Default for LockDelay {
    fn default() -> Self {
        Self::new(LOCK_DELAY_MS, MAX_LOCK_RESETS)
    }
}

impl LockDelay {
    pub fn new(delay_ms: u32, max_resets: u8) -> Self {
        Self {
            resting: false,
            elapsed_ms: 0,
            resets: 0,
            max_resets,
            delay_ms,
        }
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn resets(&self) -> u8 {
        self.resets
    }

    pub fn can_reset(&self) -> bool {
        self.resets < self.max_resets
    }

    /// Resting with every reset spent: the lock can no longer be postponed
    pub fn is_frozen(&self) -> bool {
        self.resting && !self.can_reset()
    }

    /// The piece touched down. Already resting pieces keep their countdown
    pub fn start_resting(&mut self) {
        if !self.resting {
            self.resting = true;
            self.elapsed_ms = 0;
        }
    }

    /// Postpone the lock; returns false when not resting or out of resets
    pub fn reset(&mut self) -> bool {
        if !self.resting || !self.can_reset() {
            return false;
        }
        self.resting = false;
        self.elapsed_ms = 0;
        self.resets += 1;
        true
    }

    /// Count `delta_ms` towards the lock if resting
    pub fn advance(&mut self, delta_ms: u32) {
        if self.resting {
            self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        }
    }

    /// Resting long enough to lock
    pub fn is_expired(&self) -> bool {
        self.resting && self.elapsed_ms >= self.delay_ms
    }

    /// Fresh state for the next piece
    pub fn clear(&mut self) {
        self.resting = false;
        self.elapsed_ms = 0;
        self.resets = 0;
    }
}
