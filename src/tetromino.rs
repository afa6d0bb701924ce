//! Tetromino definitions and shape matrices
//!
//! All 7 standard tetrominoes in their SRS spawn orientation. Shapes are
//! square 0/1 matrices (2x2 for O, 4x4 for I, 3x3 for the rest); rotation
//! permutes cells inside the matrix and never changes its size.

use crate::matrix::{rotate_matrix, MatrixError};
use serde::{Deserialize, Serialize};

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // long bar
    O, // square
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    /// Get all tetromino types for bag randomization
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Single-letter name
    pub fn as_char(&self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::O => 'O',
            TetrominoType::T => 'T',
            TetrominoType::S => 'S',
            TetrominoType::Z => 'Z',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
        }
    }

    /// Parse a single-letter name (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(TetrominoType::I),
            'O' => Some(TetrominoType::O),
            'T' => Some(TetrominoType::T),
            'S' => Some(TetrominoType::S),
            'Z' => Some(TetrominoType::Z),
            'J' => Some(TetrominoType::J),
            'L' => Some(TetrominoType::L),
            _ => None,
        }
    }

    /// A fresh copy of the spawn-orientation matrix
    pub fn template(&self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        };
        Shape {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }
}

/// Rotation states (using SRS naming convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    pub fn turn(&self, direction: RotationDirection) -> Rotation {
        match direction {
            RotationDirection::Clockwise => self.cw(),
            RotationDirection::CounterClockwise => self.ccw(),
        }
    }

    /// Orientation index in 0..=3
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Square occupancy matrix of a piece, indexed `[row][col]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from rows; rejects non-square input
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Result<Self, MatrixError> {
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != cells.len()) {
            return Err(MatrixError::NotSquare {
                size: cells.len(),
                row,
                len: r.len(),
            });
        }
        Ok(Self { cells })
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Local (col, row) offsets of every filled cell, row-major
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (col as i32, row as i32))
        })
    }

    /// Rotate in place
    pub fn rotate(&mut self, direction: RotationDirection) {
        // Square by construction
        if let Err(e) = rotate_matrix(&mut self.cells, direction) {
            panic!("shape invariant broken: {}", e);
        }
    }

    /// A rotated copy, leaving `self` untouched
    pub fn rotated(&self, direction: RotationDirection) -> Shape {
        let mut shape = self.clone();
        shape.rotate(direction);
        shape
    }
}
