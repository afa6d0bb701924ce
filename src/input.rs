//! Input latching with DAS (Delayed Auto Shift) and ARR (Auto Repeat Rate)
//!
//! The host reports key presses and releases whenever they happen; the
//! simulation polls the latched state once per tick. Directional moves
//! fire on press, again after the DAS delay, then every ARR interval.
//! Rotations, hold and hard drop fire once per press.

use crate::tetromino::RotationDirection;

/// DAS/ARR timing (milliseconds)
pub const DEFAULT_DAS_MS: u32 = 170;
pub const DEFAULT_ARR_MS: u32 = 50;

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCW,
    RotateCCW,
    Hold,
}

/// Horizontal move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    pub fn dx(&self) -> i32 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// What one tick should apply, at most one of each kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub hard_drop: bool,
    pub hold: bool,
    pub soft_drop: bool,
    pub shift: Option<Shift>,
    pub rotate: Option<RotationDirection>,
}

#[derive(Debug, Clone, Default)]
struct KeyPressState {
    /// Press not yet consumed by a tick
    pending: bool,
    held_ms: u32,
    das_triggered: bool,
    since_repeat_ms: u32,
}

impl KeyPressState {
    fn pressed() -> Self {
        Self {
            pending: true,
            ..Self::default()
        }
    }
}

/// Fire-once-per-press key
#[derive(Debug, Clone, Copy, Default)]
struct OneShot {
    held: bool,
    latched: bool,
}

impl OneShot {
    fn press(&mut self) {
        if !self.held {
            self.held = true;
            self.latched = true;
        }
    }

    fn release(&mut self) {
        self.held = false;
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.latched)
    }
}

/// Latched key state with DAS/ARR support
#[derive(Debug, Clone)]
pub struct Controls {
    left_state: Option<KeyPressState>,
    right_state: Option<KeyPressState>,
    soft_drop: bool,
    hard_drop: OneShot,
    rotate_cw: OneShot,
    rotate_ccw: OneShot,
    hold: OneShot,
    das_ms: u32,
    arr_ms: u32,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }
}

impl Controls {
    pub fn new(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            left_state: None,
            right_state: None,
            soft_drop: false,
            hard_drop: OneShot::default(),
            rotate_cw: OneShot::default(),
            rotate_ccw: OneShot::default(),
            hold: OneShot::default(),
            das_ms,
            arr_ms,
        }
    }

    /// Handle a key press
    pub fn press(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                if self.left_state.is_none() {
                    self.left_state = Some(KeyPressState::pressed());
                }
                // Cancel opposite direction
                self.right_state = None;
            }
            Action::MoveRight => {
                if self.right_state.is_none() {
                    self.right_state = Some(KeyPressState::pressed());
                }
                self.left_state = None;
            }
            Action::SoftDrop => self.soft_drop = true,
            Action::HardDrop => self.hard_drop.press(),
            Action::RotateCW => self.rotate_cw.press(),
            Action::RotateCCW => self.rotate_ccw.press(),
            Action::Hold => self.hold.press(),
        }
    }

    /// Handle a key release
    pub fn release(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.left_state = None,
            Action::MoveRight => self.right_state = None,
            Action::SoftDrop => self.soft_drop = false,
            Action::HardDrop => self.hard_drop.release(),
            Action::RotateCW => self.rotate_cw.release(),
            Action::RotateCCW => self.rotate_ccw.release(),
            Action::Hold => self.hold.release(),
        }
    }

    /// Consume this tick's input after `delta_ms` of held time
    pub fn poll(&mut self, delta_ms: u32) -> TickInput {
        let (das, arr) = (self.das_ms, self.arr_ms);

        let mut shift = None;
        if let Some(state) = &mut self.left_state {
            if process_das_arr(state, delta_ms, das, arr) {
                shift = Some(Shift::Left);
            }
        }
        if let Some(state) = &mut self.right_state {
            if process_das_arr(state, delta_ms, das, arr) {
                shift = Some(Shift::Right);
            }
        }

        // One rotation per tick; a latched CCW waits for the next one
        let rotate = if self.rotate_cw.take() {
            Some(RotationDirection::Clockwise)
        } else if self.rotate_ccw.take() {
            Some(RotationDirection::CounterClockwise)
        } else {
            None
        };

        TickInput {
            hard_drop: self.hard_drop.take(),
            hold: self.hold.take(),
            soft_drop: self.soft_drop,
            shift,
            rotate,
        }
    }

    /// Put back the move and rotation of a polled tick that did not use them
    pub fn defer(&mut self, input: &TickInput) {
        let state = match input.shift {
            Some(Shift::Left) => self.left_state.as_mut(),
            Some(Shift::Right) => self.right_state.as_mut(),
            None => None,
        };
        if let Some(state) = state {
            state.pending = true;
        }
        match input.rotate {
            Some(RotationDirection::Clockwise) => self.rotate_cw.latched = true,
            Some(RotationDirection::CounterClockwise) => self.rotate_ccw.latched = true,
            None => {}
        }
    }

    /// Forget everything held or latched (pause, restart)
    pub fn clear(&mut self) {
        *self = Self::new(self.das_ms, self.arr_ms);
    }
}

/// Process DAS/ARR logic for a key state, returns true if should trigger action
fn process_das_arr(state: &mut KeyPressState, delta_ms: u32, das: u32, arr: u32) -> bool {
    if state.pending {
        state.pending = false;
        return true;
    }

    state.held_ms = state.held_ms.saturating_add(delta_ms);
    if state.held_ms < das {
        return false;
    }

    if !state.das_triggered {
        // First trigger after DAS
        state.das_triggered = true;
        state.since_repeat_ms = 0;
        return true;
    }

    // Subsequent ARR triggers
    state.since_repeat_ms = state.since_repeat_ms.saturating_add(delta_ms);
    if state.since_repeat_ms >= arr {
        state.since_repeat_ms = 0;
        return true;
    }

    false
}
