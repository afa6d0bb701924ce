//! In-place rotation of square matrices
//!
//! Works ring by ring from the outside in, cycling the four symmetric
//! cells of each ring. No allocation, no external state.

use crate::tetromino::RotationDirection;
use std::fmt;

/// Rejected rotation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Row `row` has `len` cells but the matrix has `size` rows
    NotSquare { size: usize, row: usize, len: usize },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::NotSquare { size, row, len } => write!(
                f,
                "matrix must be square: {} rows but row {} has {} cells",
                size, row, len
            ),
        }
    }
}

impl std::error::Error for MatrixError {}

/// Rotate `m` a quarter turn in place
pub fn rotate_matrix<T: Copy>(
    m: &mut [Vec<T>],
    direction: RotationDirection,
) -> Result<(), MatrixError> {
    let size = m.len();
    if let Some((row, cells)) = m.iter().enumerate().find(|(_, r)| r.len() != size) {
        return Err(MatrixError::NotSquare {
            size,
            row,
            len: cells.len(),
        });
    }
    if size < 2 {
        return Ok(());
    }

    for ring in 0..size / 2 {
        let last = size - 1 - ring;
        for i in ring..last {
            let mirror = last - (i - ring);
            match direction {
                RotationDirection::Clockwise => {
                    let tmp = m[mirror][ring];
                    m[mirror][ring] = m[last][mirror];
                    m[last][mirror] = m[i][last];
                    m[i][last] = m[ring][i];
                    m[ring][i] = tmp;
                }
                RotationDirection::CounterClockwise => {
                    let tmp = m[ring][i];
                    m[ring][i] = m[i][last];
                    m[i][last] = m[last][mirror];
                    m[last][mirror] = m[mirror][ring];
                    m[mirror][ring] = tmp;
                }
            }
        }
    }

    Ok(())
}
