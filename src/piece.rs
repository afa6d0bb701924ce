//! Active falling piece

use crate::tetromino::{Rotation, RotationDirection, Shape, TetrominoType};

/// A falling piece: kind, its own shape matrix, position and rotation state
///
/// `x`/`y` are board coordinates of the top-left corner of the shape
/// matrix. `y` grows downward; negative rows are the hidden overflow area.
/// Cloning deep-copies the shape, so no two pieces ever share cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    shape: Shape,
    pub x: i32,
    pub y: i32,
    rotation: Rotation,
}

impl Piece {
    /// Create a piece in spawn orientation at the idle slot (0, 0)
    pub fn new(kind: TetrominoType) -> Self {
        Self {
            kind,
            shape: kind.template(),
            x: 0,
            y: 0,
            rotation: Rotation::North,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Column that centres this piece on a board of `width` columns
    pub fn spawn_column(&self, width: usize) -> i32 {
        (width.saturating_sub(self.shape.size()) / 2) as i32
    }

    /// Rotate the shape in place and advance the rotation state
    ///
    /// No collision checks; callers validate against a rotated copy first.
    pub fn rotate(&mut self, direction: RotationDirection) {
        self.shape.rotate(direction);
        self.rotation = self.rotation.turn(direction);
    }

    /// Back to spawn orientation at the idle slot
    pub fn reset(&mut self) {
        self.shape = self.kind.template();
        self.rotation = Rotation::North;
        self.x = 0;
        self.y = 0;
    }

    /// Absolute board positions (x, y) of the 4 blocks
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if this is the square piece (never rotates)
    pub fn is_o_piece(&self) -> bool {
        matches!(self.kind, TetrominoType::O)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_is_idle() {
        let piece = Piece::new(TetrominoType::T);
        assert_eq!(piece.position(), (0, 0));
        assert_eq!(piece.rotation(), Rotation::North);
        assert_eq!(piece.shape(), &TetrominoType::T.template());
    }

    #[test]
    fn test_spawn_column_centres() {
        assert_eq!(Piece::new(TetrominoType::I).spawn_column(10), 3);
        assert_eq!(Piece::new(TetrominoType::O).spawn_column(10), 4);
        assert_eq!(Piece::new(TetrominoType::T).spawn_column(10), 3);
    }

    #[test]
    fn test_clone_does_not_share_shape() {
        let original = Piece::new(TetrominoType::L);
        let mut copy = original.clone();
        copy.rotate(RotationDirection::Clockwise);
        assert_eq!(original.shape(), &TetrominoType::L.template());
        assert_ne!(copy.shape(), original.shape());
        assert_eq!(copy.rotation(), Rotation::East);
    }

    #[test]
    fn test_cells_follow_position() {
        let mut piece = Piece::new(TetrominoType::I);
        piece.x = 3;
        piece.y = 5;
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(3, 6), (4, 6), (5, 6), (6, 6)]);
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let mut piece = Piece::new(TetrominoType::S);
        piece.rotate(RotationDirection::CounterClockwise);
        piece.x = 7;
        piece.y = 12;
        piece.reset();
        assert_eq!(piece, Piece::new(TetrominoType::S));
    }
}
