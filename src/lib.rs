//! TETRS engine - the falling-block simulation without a screen
//!
//! Spawning, gravity, SRS rotation with wall kicks, lock delay, holding and
//! row clears, driven by [`Game::tick`]. Rendering, audio and persistence
//! are left to the host, which reads the state and the returned
//! [`GameEvent`]s.

pub mod bag;
pub mod board;
pub mod config;
pub mod event;
pub mod game;
pub mod gravity;
pub mod input;
pub mod lock;
pub mod matrix;
pub mod piece;
pub mod srs;
pub mod tetromino;

pub use board::{Board, Cell};
pub use config::{ConfigError, GameConfig, HoldMode};
pub use event::GameEvent;
pub use game::{Game, GameState};
pub use input::Action;
pub use piece::Piece;
pub use srs::{Kick, KickTable};
pub use tetromino::{Rotation, RotationDirection, TetrominoType};
