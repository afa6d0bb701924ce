//! Game board representation and collision detection
//!
//! Coordinates are `(x, y)` with `x` growing rightward and `y` growing
//! downward. Visible rows are `0..height`; the hidden overflow rows sit
//! above them at `-hidden_rows..0`. The grid only changes through
//! [`Board::occupy_grid`] and [`Board::clear_completed_rows`].

use crate::piece::Piece;
use crate::tetromino::{Shape, TetrominoType};

/// Standard Tetris board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Hidden rows above the visible board for spawning and kicks
pub const HIDDEN_ROWS: usize = 2;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Per-side test distances for [`Board::is_colliding`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Offsets {
    /// Test the shape where it stands
    pub const NONE: Offsets = Offsets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn left(n: i32) -> Self {
        Self { left: n, ..Self::NONE }
    }

    pub fn right(n: i32) -> Self {
        Self { right: n, ..Self::NONE }
    }

    pub fn up(n: i32) -> Self {
        Self { top: n, ..Self::NONE }
    }

    pub fn down(n: i32) -> Self {
        Self { bottom: n, ..Self::NONE }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    hidden_rows: usize,
    /// Grid stored as [row][col]; index 0 is the topmost hidden row
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT, HIDDEN_ROWS)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize, hidden_rows: usize) -> Self {
        Self {
            width,
            height,
            hidden_rows,
            cells: vec![vec![Cell::Empty; width]; height + hidden_rows],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of visible rows
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    /// Storage row for board row `y`, if inside the grid
    fn row_index(&self, y: i32) -> Option<usize> {
        let idx = y + self.hidden_rows as i32;
        if idx < 0 || idx as usize >= self.cells.len() {
            None
        } else {
            Some(idx as usize)
        }
    }

    /// Get the cell at (x, y). Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || x as usize >= self.width {
            return None;
        }
        let row = self.row_index(y)?;
        Some(self.cells[row][x as usize])
    }

    /// Out of bounds on any side, or already occupied
    fn blocked(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none_or(|cell| cell.is_filled())
    }

    /// Test `shape` at `position` against the grid, shifted by each side's offset
    ///
    /// Every filled cell is checked shifted `left` cells left, `right` cells
    /// right, `bottom` cells down and `top` cells up. A zero offset tests
    /// the cell itself.
    pub fn is_colliding(&self, position: (i32, i32), shape: &Shape, offsets: Offsets) -> bool {
        let (px, py) = position;
        shape.filled().any(|(dx, dy)| {
            let (x, y) = (px + dx, py + dy);
            self.blocked(x - offsets.left, y)
                || self.blocked(x + offsets.right, y)
                || self.blocked(x, y + offsets.bottom)
                || self.blocked(x, y - offsets.top)
        })
    }

    /// Would `shape` collide after moving `offset` cells down
    pub fn is_colliding_down(&self, position: (i32, i32), shape: &Shape, offset: i32) -> bool {
        self.collides_shifted(position, shape, 0, offset)
    }

    pub fn is_colliding_up(&self, position: (i32, i32), shape: &Shape, offset: i32) -> bool {
        self.collides_shifted(position, shape, 0, -offset)
    }

    pub fn is_colliding_left(&self, position: (i32, i32), shape: &Shape, offset: i32) -> bool {
        self.collides_shifted(position, shape, -offset, 0)
    }

    pub fn is_colliding_right(&self, position: (i32, i32), shape: &Shape, offset: i32) -> bool {
        self.collides_shifted(position, shape, offset, 0)
    }

    fn collides_shifted(&self, (px, py): (i32, i32), shape: &Shape, dx: i32, dy: i32) -> bool {
        shape
            .filled()
            .any(|(cx, cy)| self.blocked(px + cx + dx, py + cy + dy))
    }

    /// Copy the piece's cells into the grid
    ///
    /// # Panics
    ///
    /// If any target cell is outside the grid or already filled. The driver
    /// never locks a piece that overlaps the stack.
    pub fn occupy_grid(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            let row = match (self.row_index(y), x >= 0 && (x as usize) < self.width) {
                (Some(row), true) => row,
                _ => panic!("occupy_grid: {:?} cell ({}, {}) is off the board", piece.kind, x, y),
            };
            let cell = &mut self.cells[row][x as usize];
            assert!(
                cell.is_empty(),
                "occupy_grid: {:?} cell ({}, {}) is already filled",
                piece.kind,
                x,
                y
            );
            *cell = Cell::Filled(piece.kind);
        }
    }

    /// Remove full rows, shift everything above down, return how many went
    pub fn clear_completed_rows(&mut self) -> usize {
        let total = self.cells.len();
        let mut write_row = total;

        for read_row in (0..total).rev() {
            if !Self::is_full(&self.cells[read_row]) {
                // Keep this line
                write_row -= 1;
                if write_row != read_row {
                    self.cells.swap(write_row, read_row);
                }
            }
        }

        // Fill the top with empty rows
        for row in &mut self.cells[..write_row] {
            row.fill(Cell::Empty);
        }

        write_row
    }

    fn is_full(row: &[Cell]) -> bool {
        row.iter().all(|cell| cell.is_filled())
    }

    /// Check if board row `y` is completely filled
    pub fn is_row_full(&self, y: i32) -> bool {
        self.row_index(y)
            .is_some_and(|row| Self::is_full(&self.cells[row]))
    }

    /// Check if the board is completely empty (for all-clear detection)
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Visible rows, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells[self.hidden_rows..].iter().map(|row| row.as_slice())
    }

    /// Build a board from text, one string per row, bottom-aligned to the
    /// visible area. `.` is empty, a piece letter is a filled cell.
    #[cfg(test)]
    pub(crate) fn from_ascii(width: usize, height: usize, rows: &[&str]) -> Self {
        let mut board = Self::new(width, height, HIDDEN_ROWS);
        let top = board.cells.len() - rows.len();
        for (i, text) in rows.iter().enumerate() {
            for (x, c) in text.chars().enumerate() {
                if c != '.' {
                    let kind = TetrominoType::from_char(c).expect("piece letter");
                    board.cells[top + i][x] = Cell::Filled(kind);
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::RotationDirection;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn piece_at(kind: TetrominoType, x: i32, y: i32) -> Piece {
        let mut piece = Piece::new(kind);
        piece.x = x;
        piece.y = y;
        piece
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.visible_rows().count(), BOARD_HEIGHT);
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, BOARD_HEIGHT as i32), None);
        assert_eq!(board.get(BOARD_WIDTH as i32, 0), None);
        assert_eq!(board.get(0, -(HIDDEN_ROWS as i32) - 1), None);
        // Hidden rows are part of the grid
        assert_eq!(board.get(0, -1), Some(Cell::Empty));
    }

    #[test]
    fn test_walls_and_floor() {
        let board = Board::default();
        let i = TetrominoType::I.template();
        // I occupies row 1 of its matrix
        assert!(!board.is_colliding_down((3, 17), &i, 1));
        assert!(board.is_colliding_down((3, 18), &i, 1));
        assert!(board.is_colliding_left((0, 5), &i, 1));
        assert!(!board.is_colliding_left((1, 5), &i, 1));
        assert!(board.is_colliding_right((6, 5), &i, 1));
        assert!(!board.is_colliding_right((5, 5), &i, 1));
        // Row 1 of the matrix at y = -3 is the topmost hidden row
        assert!(!board.is_colliding_up((3, -2), &i, 1));
        assert!(board.is_colliding_up((3, -3), &i, 1));
    }

    #[test]
    fn test_stack_collision() {
        let board = Board::from_ascii(10, 20, &["....T....."]);
        let o = TetrominoType::O.template();
        assert!(board.is_colliding_down((3, 17), &o, 1));
        assert!(!board.is_colliding_down((5, 17), &o, 1));
        assert!(board.is_colliding((3, 18), &o, Offsets::NONE));
    }

    #[test]
    fn test_directional_checks_match_general_check() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut board = Board::default();
        for y in 10..20 {
            for x in 0..10 {
                if rng.gen_bool(0.4) {
                    board.cells[y + HIDDEN_ROWS][x] = Cell::Filled(TetrominoType::Z);
                }
            }
        }

        for kind in TetrominoType::all() {
            let mut shape = kind.template();
            for _ in 0..4 {
                shape.rotate(RotationDirection::Clockwise);
                for y in -3..21 {
                    for x in -3..11 {
                        let pos = (x, y);
                        if board.is_colliding(pos, &shape, Offsets::NONE) {
                            continue;
                        }
                        for n in 1..3 {
                            let down = board.is_colliding_down(pos, &shape, n);
                            assert_eq!(down, board.is_colliding(pos, &shape, Offsets::down(n)));
                            assert_eq!(down, board.is_colliding((x, y + n), &shape, Offsets::NONE));

                            let up = board.is_colliding_up(pos, &shape, n);
                            assert_eq!(up, board.is_colliding(pos, &shape, Offsets::up(n)));
                            assert_eq!(up, board.is_colliding((x, y - n), &shape, Offsets::NONE));

                            let left = board.is_colliding_left(pos, &shape, n);
                            assert_eq!(left, board.is_colliding(pos, &shape, Offsets::left(n)));
                            assert_eq!(left, board.is_colliding((x - n, y), &shape, Offsets::NONE));

                            let right = board.is_colliding_right(pos, &shape, n);
                            assert_eq!(right, board.is_colliding(pos, &shape, Offsets::right(n)));
                            assert_eq!(right, board.is_colliding((x + n, y), &shape, Offsets::NONE));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_occupy_grid() {
        let mut board = Board::default();
        board.occupy_grid(&piece_at(TetrominoType::T, 0, 18));
        assert_eq!(board.get(1, 18), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(0, 19), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(2, 19), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.get(0, 18), Some(Cell::Empty));
    }

    #[test]
    #[should_panic(expected = "already filled")]
    fn test_occupy_grid_overlap_panics() {
        let mut board = Board::default();
        board.occupy_grid(&piece_at(TetrominoType::O, 0, 18));
        board.occupy_grid(&piece_at(TetrominoType::O, 1, 18));
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::from_ascii(10, 20, &["J.........", "IIIIIIIIII"]);

        let cleared = board.clear_completed_rows();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(0, 19), Some(Cell::Filled(TetrominoType::J)));
        assert_eq!(board.get(0, 18), Some(Cell::Empty));
    }

    #[test]
    fn test_clear_split_rows() {
        let mut board = Board::from_ascii(
            4,
            6,
            &["S...", "OOOO", ".T..", "LLLL", "..Z."],
        );
        assert_eq!(board.clear_completed_rows(), 2);
        let expected = Board::from_ascii(4, 6, &["S...", ".T..", "..Z."]);
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_without_full_rows_is_identity() {
        let mut board = Board::from_ascii(10, 20, &["IIIII.IIII", "..TT..Z..."]);
        let before = board.clone();
        assert_eq!(board.clear_completed_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_reaches_hidden_rows() {
        let mut board = Board::new(4, 4, 2);
        board.cells[0][1] = Cell::Filled(TetrominoType::I);
        board.cells[5] = vec![Cell::Filled(TetrominoType::O); 4];
        assert!(board.is_row_full(3));
        assert_eq!(board.clear_completed_rows(), 1);
        assert_eq!(board.get(1, -1), Some(Cell::Filled(TetrominoType::I)));
        assert_eq!(board.get(1, -2), Some(Cell::Empty));
    }
}
