//! Core game state and logic
//!
//! [`Game`] owns the board, the bag, the active/next/held pieces and the
//! timers. The host calls [`Game::tick`] with the elapsed milliseconds and
//! reports key presses in between; everything observable comes back as
//! [`GameEvent`]s.

use crate::bag::Bag;
use crate::board::{Board, Offsets};
use crate::config::{ConfigError, GameConfig, HoldMode};
use crate::event::GameEvent;
use crate::gravity::Gravity;
use crate::input::{Action, Controls};
use crate::lock::LockDelay;
use crate::piece::Piece;
use crate::srs::{rotate_with_kicks, Kick};
use crate::tetromino::{RotationDirection, TetrominoType};
use tracing::debug;

const NO_PIECE: &str = "no active piece while playing";

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// Current falling piece; `None` only after game over
    current_piece: Option<Piece>,
    next_piece: Piece,
    /// Held piece (can swap once per piece unless unlimited)
    hold_piece: Option<Piece>,
    /// Whether hold has been used this piece
    hold_used: bool,
    bag: Bag,
    lock: LockDelay,
    gravity: Gravity,
    controls: Controls,
    state: GameState,
    config: GameConfig,
    /// Bag seed, reused by `restart`
    seed: u64,
}

impl Game {
    /// Create a new game; seeded from `config.seed`, or randomly when unset
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Create a new game with an explicit bag seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// `config` must already be valid
    fn build(config: GameConfig, seed: u64) -> Self {
        let mut bag = Bag::with_seed(seed);
        let first = bag.next();
        let next_piece = bag.next();
        let timing = &config.timing;

        let mut game = Self {
            board: Board::new(
                config.board.width,
                config.board.height,
                config.board.hidden_rows,
            ),
            current_piece: None,
            next_piece,
            hold_piece: None,
            hold_used: false,
            bag,
            lock: LockDelay::new(timing.lock_delay_ms, timing.max_lock_resets),
            gravity: Gravity::new(timing.gravity_ms, timing.soft_drop_multiplier),
            controls: Controls::new(config.controls.das_ms, config.controls.arr_ms),
            state: GameState::Playing,
            config,
            seed,
        };
        // A valid board is at least 4x4, so an empty one always has room
        let spawned = game.spawn(first, &mut Vec::new());
        debug_assert!(spawned, "first piece must fit on an empty board");
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    /// Piece that spawns after the current one
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    /// Upcoming kinds: the next piece, then the rest of the current bag
    pub fn preview(&self) -> impl Iterator<Item = TetrominoType> + '_ {
        std::iter::once(self.next_piece.kind).chain(self.bag.preview().iter().copied())
    }

    pub fn hold_piece(&self) -> Option<TetrominoType> {
        self.hold_piece.as_ref().map(|piece| piece.kind)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn lock_delay(&self) -> &LockDelay {
        &self.lock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Key went down; ignored unless playing
    pub fn press(&mut self, action: Action) {
        if self.state == GameState::Playing {
            self.controls.press(action);
        }
    }

    /// Key went up
    pub fn release(&mut self, action: Action) {
        self.controls.release(action);
    }

    /// Advance the simulation by `delta_ms`
    ///
    /// Order within a tick: hard drop, hold, gravity (soft drop when held),
    /// horizontal move, rotation, then the lock check. A hard drop or a
    /// successful hold ends the tick's input handling.
    pub fn tick(&mut self, delta_ms: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }

        let input = self.controls.poll(delta_ms);
        self.gravity.advance(delta_ms);
        self.lock.advance(delta_ms);

        if input.hard_drop {
            self.drop_and_lock(&mut events);
            return events;
        }
        if input.hold && self.swap_hold(&mut events) {
            // The new piece gets this tick's move and rotation next tick
            self.controls.defer(&input);
            return events;
        }

        self.apply_gravity(input.soft_drop);
        if let Some(shift) = input.shift {
            self.shift(shift.dx());
        }
        if let Some(direction) = input.rotate {
            self.rotate(direction);
        }

        if self.lock.is_expired() {
            self.lock_piece(&mut events);
        }
        events
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    /// Move one row down outside of gravity; false when grounded
    pub fn soft_drop(&mut self) -> bool {
        if self.state != GameState::Playing || self.is_grounded() {
            return false;
        }
        self.current_piece.as_mut().expect(NO_PIECE).y += 1;
        self.gravity.reset();
        if self.is_grounded() {
            self.lock.start_resting();
        }
        true
    }

    /// Drop to the floor and lock immediately
    pub fn hard_drop(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state == GameState::Playing {
            self.drop_and_lock(&mut events);
        }
        events
    }

    /// Rotate with wall kicks; returns the kick used
    pub fn rotate(&mut self, direction: RotationDirection) -> Option<Kick> {
        if !self.can_manipulate() {
            return None;
        }
        let piece = self.current_piece.as_mut().expect(NO_PIECE);
        let kick = rotate_with_kicks(piece, &self.board, direction, self.config.kicks)?;
        self.after_manipulation();
        Some(kick)
    }

    /// Swap with the hold slot
    pub fn hold(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state == GameState::Playing {
            self.swap_hold(&mut events);
        }
        events
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self) -> Option<i32> {
        let piece = self.current_piece.as_ref()?;
        let mut y = piece.y;
        while !self.board.is_colliding_down((piece.x, y), piece.shape(), 1) {
            y += 1;
        }
        Some(y)
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            self.controls.clear();
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
        }
    }

    /// Fresh board with the same configuration and bag seed
    pub fn restart(&mut self) {
        *self = Self::build(self.config.clone(), self.seed);
    }

    fn can_manipulate(&self) -> bool {
        self.state == GameState::Playing && !self.lock.is_frozen()
    }

    fn is_grounded(&self) -> bool {
        let piece = self.current_piece.as_ref().expect(NO_PIECE);
        self.board
            .is_colliding_down(piece.position(), piece.shape(), 1)
    }

    fn shift(&mut self, dx: i32) -> bool {
        if !self.can_manipulate() {
            return false;
        }
        let piece = self.current_piece.as_mut().expect(NO_PIECE);
        let blocked = if dx < 0 {
            self.board
                .is_colliding_left(piece.position(), piece.shape(), -dx)
        } else {
            self.board
                .is_colliding_right(piece.position(), piece.shape(), dx)
        };
        if blocked {
            return false;
        }
        piece.x += dx;
        self.after_manipulation();
        true
    }

    /// Lock reset after a successful move or rotation, then re-check the floor
    fn after_manipulation(&mut self) {
        if self.lock.reset() {
            self.gravity.reset();
        }
        if self.is_grounded() {
            self.lock.start_resting();
        }
    }

    /// One row per firing at most; a grounded piece starts resting instead
    fn apply_gravity(&mut self, soft_drop: bool) {
        if !self.gravity.fire(soft_drop) {
            return;
        }
        if !self.is_grounded() {
            self.current_piece.as_mut().expect(NO_PIECE).y += 1;
        }
        if self.is_grounded() {
            self.lock.start_resting();
        }
    }

    fn drop_and_lock(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(y) = self.ghost_y() {
            self.current_piece.as_mut().expect(NO_PIECE).y = y;
        }
        self.lock_piece(events);
    }

    /// Returns false when holding is not allowed right now
    fn swap_hold(&mut self, events: &mut Vec<GameEvent>) -> bool {
        match self.config.hold {
            HoldMode::Disabled => return false,
            HoldMode::Once if self.hold_used => return false,
            HoldMode::Once | HoldMode::Unlimited => {}
        }

        let mut current = self.current_piece.take().expect(NO_PIECE);
        current.reset();
        let kind = current.kind;
        let incoming = match self.hold_piece.replace(current) {
            Some(held) => held,
            None => self.take_next(),
        };
        self.hold_used = true;

        debug!(held = ?kind, incoming = ?incoming.kind, "hold");
        events.push(GameEvent::Hold { kind });
        self.spawn(incoming, events);
        true
    }

    fn take_next(&mut self) -> Piece {
        std::mem::replace(&mut self.next_piece, self.bag.next())
    }

    /// Commit the active piece, clear rows and bring in the next one
    fn lock_piece(&mut self, events: &mut Vec<GameEvent>) {
        let piece = self.current_piece.take().expect(NO_PIECE);
        self.board.occupy_grid(&piece);
        events.push(GameEvent::Lock { kind: piece.kind });

        let lines = self.board.clear_completed_rows();
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, lines, "piece locked");
        if lines > 0 {
            events.push(GameEvent::Clear { lines });
        }

        // Lock out: part of the piece never left the hidden rows
        if piece.cells().any(|(_, y)| y < 0) {
            self.game_over(events);
            return;
        }

        self.hold_used = false;
        let next = self.take_next();
        self.spawn(next, events);
    }

    /// Place `piece` at the spawn slot, nudging sideways when it is blocked
    ///
    /// Columns are tried at offsets 0, +1, -1, +2, -2, ... across the board
    /// width. Returns false (and ends the game) when none is free.
    fn spawn(&mut self, mut piece: Piece, events: &mut Vec<GameEvent>) -> bool {
        let width = self.board.width() as i32;
        let base = piece.spawn_column(self.board.width());
        let nudges = std::iter::once(0).chain((1..width).flat_map(|n| [n, -n]));

        self.lock.clear();
        self.gravity.reset();

        for dx in nudges {
            let position = (base + dx, 0);
            if self
                .board
                .is_colliding(position, piece.shape(), Offsets::NONE)
            {
                continue;
            }
            piece.x = position.0;
            piece.y = position.1;
            self.current_piece = Some(piece);
            if self.is_grounded() {
                self.lock.start_resting();
            }
            return true;
        }

        debug!(kind = ?piece.kind, "no room to spawn");
        self.game_over(events);
        false
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.state = GameState::GameOver;
        self.current_piece = None;
        self.controls.clear();
        debug!("game over");
        events.push(GameEvent::GameOver);
    }
}
