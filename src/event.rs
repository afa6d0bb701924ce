//! Events the engine reports to renderers, audio and scoring

use crate::tetromino::TetrominoType;
use serde::{Deserialize, Serialize};

/// Something observable happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum GameEvent {
    /// The active piece was committed to the board
    Lock { kind: TetrominoType },
    /// Rows were removed after a lock (never sent with zero lines)
    Clear { lines: usize },
    /// The hold slot now contains `kind`
    Hold { kind: TetrominoType },
    /// Terminal; every later tick is a no-op
    GameOver,
}
