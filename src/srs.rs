//! Super Rotation System (SRS) wall kick data
//!
//! SRS defines the wall kicks attempted when rotating a piece.
//! If a rotation would cause collision, these offsets are tried in order.

use crate::board::{Board, Offsets};
use crate::piece::Piece;
use crate::tetromino::{Rotation, RotationDirection, TetrominoType};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Rows of clearance below a kicked piece that a candidate must have
pub const KICK_FLOOR_CLEARANCE: i32 = 1;

/// Which kick table rotations use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KickTable {
    /// Five SRS candidates per rotation
    #[default]
    Srs,
    /// Rotate in place or not at all
    None,
}

/// Kicks are (dx, dy) where x+ is right and y+ is UP
///
/// Rows 0..4: clockwise from North, East, South, West.
/// Rows 4..8: counter-clockwise from the same states.
/// Rows 8..16 repeat the layout for the I piece.
const SRS_KICKS: [[(i32, i32); 5]; 16] = [
    // J, L, S, T, Z
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // 0 -> R
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // R -> 2
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // 2 -> L
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // L -> 0
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // 0 -> L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // R -> 0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // 2 -> R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // L -> 2
    // I
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // 0 -> R
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // R -> 2
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // 2 -> L
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // L -> 0
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // 0 -> L
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // R -> 0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // 2 -> R
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // L -> 2
];

/// Table row for a rotation attempt starting from `from`
pub fn kick_row(piece_type: TetrominoType, from: Rotation, direction: RotationDirection) -> usize {
    let base = if piece_type == TetrominoType::I { 8 } else { 0 };
    let reverse = match direction {
        RotationDirection::Clockwise => 0,
        RotationDirection::CounterClockwise => 4,
    };
    base + from.index() % 4 + reverse
}

/// Get wall kick offsets for a rotation attempt, zero offset first
pub fn get_wall_kicks(
    piece_type: TetrominoType,
    from: Rotation,
    direction: RotationDirection,
    table: KickTable,
) -> &'static [(i32, i32)] {
    let row = &SRS_KICKS[kick_row(piece_type, from, direction)];
    match table {
        KickTable::Srs => row,
        KickTable::None => &row[..1],
    }
}

/// The accepted kick of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kick {
    /// Position in the kick row; 0 means no kick was needed
    pub index: usize,
    /// Table offset, y+ up
    pub offset: (i32, i32),
}

/// Try to rotate, using wall kicks
///
/// Validates each candidate against a rotated copy of the shape and only
/// touches `piece` once one fits. Returns the kick used, or `None` when
/// every candidate collides (or the piece is an O, which never rotates).
pub fn rotate_with_kicks(
    piece: &mut Piece,
    board: &Board,
    direction: RotationDirection,
    table: KickTable,
) -> Option<Kick> {
    if piece.is_o_piece() {
        return None;
    }

    let rotated = piece.shape().rotated(direction);
    let kicks = get_wall_kicks(piece.kind, piece.rotation(), direction, table);

    for (index, &(dx, dy)) in kicks.iter().enumerate() {
        // Board y grows downward
        let candidate = (piece.x + dx, piece.y - dy);
        let clearance = Offsets::down(KICK_FLOOR_CLEARANCE);
        if board.is_colliding(candidate, &rotated, clearance) {
            continue;
        }

        trace!(kind = ?piece.kind, index, dx, dy, "rotation kick accepted");
        piece.x = candidate.0;
        piece.y = candidate.1;
        piece.rotate(direction);
        return Some(Kick {
            index,
            offset: (dx, dy),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HIDDEN_ROWS;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];
    const DIRECTIONS: [RotationDirection; 2] = [
        RotationDirection::Clockwise,
        RotationDirection::CounterClockwise,
    ];

    fn piece_at(kind: TetrominoType, x: i32, y: i32) -> Piece {
        let mut piece = Piece::new(kind);
        piece.x = x;
        piece.y = y;
        piece
    }

    #[test]
    fn test_kick_count() {
        for piece in TetrominoType::all() {
            for from in ROTATIONS {
                for dir in DIRECTIONS {
                    assert_eq!(get_wall_kicks(piece, from, dir, KickTable::Srs).len(), 5);
                    assert_eq!(get_wall_kicks(piece, from, dir, KickTable::None).len(), 1);
                }
            }
        }
    }

    #[test]
    fn test_first_kick_is_identity() {
        // First kick attempt should always be (0, 0) - no offset
        for row in SRS_KICKS {
            assert_eq!(row[0], (0, 0));
        }
    }

    #[test]
    fn test_kick_row_index() {
        use RotationDirection::*;
        assert_eq!(kick_row(TetrominoType::T, Rotation::North, Clockwise), 0);
        assert_eq!(kick_row(TetrominoType::T, Rotation::West, Clockwise), 3);
        assert_eq!(kick_row(TetrominoType::S, Rotation::North, CounterClockwise), 4);
        assert_eq!(kick_row(TetrominoType::I, Rotation::East, Clockwise), 9);
        assert_eq!(kick_row(TetrominoType::I, Rotation::South, CounterClockwise), 14);
    }

    #[test]
    fn test_opposite_transitions_are_negated() {
        // r -> r+1 clockwise undoes r+1 -> r counter-clockwise
        for base in [0, 8] {
            for r in 0..4 {
                let cw = SRS_KICKS[base + r];
                let back = SRS_KICKS[base + 4 + (r + 1) % 4];
                for (a, b) in cw.iter().zip(back.iter()) {
                    assert_eq!((a.0, a.1), (-b.0, -b.1));
                }
            }
        }
    }

    #[test]
    fn test_free_rotation_uses_no_kick() {
        let board = Board::default();
        for kind in TetrominoType::all() {
            if kind == TetrominoType::O {
                continue;
            }
            for dir in DIRECTIONS {
                let mut piece = piece_at(kind, 3, 5);
                let kick = rotate_with_kicks(&mut piece, &board, dir, KickTable::Srs).unwrap();
                assert_eq!(kick.index, 0);
                assert_eq!(piece.position(), (3, 5));
                assert_eq!(piece.shape(), &kind.template().rotated(dir));
            }
        }
    }

    #[test]
    fn test_zero_offset_always_preferred() {
        // Whenever the unkicked placement fits, it is the one chosen
        let board = Board::from_ascii(
            10,
            20,
            &["..........", "..Z.......", ".ZZ....OO.", "IIII.J.OO.", "TTT..JJ..."],
        );
        for kind in TetrominoType::all() {
            for y in 8..19 {
                for x in -1..9 {
                    for dir in DIRECTIONS {
                        let mut piece = piece_at(kind, x, y);
                        if board.is_colliding(piece.position(), piece.shape(), Offsets::NONE) {
                            continue;
                        }
                        let rotated = piece.shape().rotated(dir);
                        let fits = !board.is_colliding((x, y), &rotated, Offsets::down(1));
                        let kick = rotate_with_kicks(&mut piece, &board, dir, KickTable::Srs);
                        if fits && kind != TetrominoType::O {
                            assert_eq!(kick.map(|k| k.index), Some(0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let board = Board::default();
        // I standing vertically in column 0 (West state puts cells in matrix column 1)
        let mut piece = piece_at(TetrominoType::I, 0, 5);
        piece.rotate(RotationDirection::CounterClockwise);
        piece.x = -1;
        assert_eq!(piece.rotation(), Rotation::West);

        let kick = rotate_with_kicks(
            &mut piece,
            &board,
            RotationDirection::Clockwise,
            KickTable::Srs,
        )
        .unwrap();
        // L -> 0: (0,0) leaves a cell at x = -1, (1,0) fits
        assert_eq!(kick.index, 1);
        assert_eq!(kick.offset, (1, 0));
        assert_eq!(piece.rotation(), Rotation::North);
        assert!(piece.cells().all(|(x, _)| x >= 0));
    }

    #[test]
    fn test_no_kick_table_refuses_blocked_rotation() {
        let board = Board::default();
        let mut piece = piece_at(TetrominoType::I, 0, 5);
        piece.rotate(RotationDirection::CounterClockwise);
        piece.x = -1;
        let before = piece.clone();
        assert_eq!(
            rotate_with_kicks(&mut piece, &board, RotationDirection::Clockwise, KickTable::None),
            None
        );
        assert_eq!(piece, before);
    }

    #[test]
    fn test_blocked_rotation_leaves_piece_unchanged() {
        // Vertical I in a one-wide well of a 3-wide board: a flat I never fits
        let board = Board::from_ascii(
            3,
            4,
            &["T.T", "T.T", "T.T", "T.T"],
        );
        let mut piece = piece_at(TetrominoType::I, -1, -(HIDDEN_ROWS as i32));
        piece.rotate(RotationDirection::Clockwise);
        let before = piece.clone();
        for dir in DIRECTIONS {
            assert_eq!(rotate_with_kicks(&mut piece, &board, dir, KickTable::Srs), None);
            assert_eq!(piece, before);
        }
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let board = Board::default();
        let mut piece = piece_at(TetrominoType::O, 4, 4);
        let before = piece.clone();
        assert_eq!(
            rotate_with_kicks(&mut piece, &board, RotationDirection::Clockwise, KickTable::Srs),
            None
        );
        assert_eq!(piece, before);
    }
}
