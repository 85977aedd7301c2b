//! Win detection.
//!
//! A win is a full-length uniform line: an entire row, an entire column,
//! or one of the two corner-to-corner diagonals. Shorter runs never count,
//! whatever the board size.

use serde::{Deserialize, Serialize};

use crate::{Board, Cell};

/// A full-length line on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

/// Returns the first uniform, non-empty line.
///
/// Checked in order rows, columns, main diagonal, anti-diagonal; stops at
/// the first hit.
pub fn winning_line(board: &Board) -> Option<(Line, Cell)> {
    let n = board.size();

    for row in 0..n {
        if let Some(mark) = uniform((0..n).map(|col| board.get(row, col))) {
            return Some((Line::Row(row), mark));
        }
    }
    for col in 0..n {
        if let Some(mark) = uniform((0..n).map(|row| board.get(row, col))) {
            return Some((Line::Column(col), mark));
        }
    }
    if let Some(mark) = uniform((0..n).map(|i| board.get(i, i))) {
        return Some((Line::MainDiagonal, mark));
    }
    if let Some(mark) = uniform((0..n).map(|i| board.get(i, n - 1 - i))) {
        return Some((Line::AntiDiagonal, mark));
    }
    None
}

/// `Some(mark)` if every cell equals the first and the first isn't empty.
fn uniform(mut cells: impl Iterator<Item = Cell>) -> Option<Cell> {
    let first = cells.next()?;
    if first.is_empty() {
        return None;
    }
    cells.all(|c| c == first).then_some(first)
}
