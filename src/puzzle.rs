use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;
use tracing::debug;

use crate::error::PuzzleError;

/// Smallest board the engine accepts.
pub const MIN_SIZE: usize = 2;

/// A numbered tile, or `None` for the empty space.
pub type Cell = Option<u32>;

/// Direction a run of tiles travels when it slides into the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// Row/column step taken by the empty cell when tiles travel this way.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Unit vector of tile travel in screen space, where y grows downward.
    pub fn screen_vector(&self) -> (f32, f32) {
        match self {
            Move::Up => (0.0, -1.0),
            Move::Left => (-1.0, 0.0),
            Move::Down => (0.0, 1.0),
            Move::Right => (1.0, 0.0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An N×N board stored row-major.
///
/// Every value of this type holds exactly one empty cell and the labels
/// `1..N*N` once each. Constructors check this and transitions preserve it,
/// so the cached empty position is always the only one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    empty: usize,
}

impl Grid {
    /// Returns the solved board: `1..N*N` in order, empty cell last.
    pub fn solved(size: usize) -> Self {
        debug_assert!(size >= MIN_SIZE, "grid size must be at least {MIN_SIZE}");
        let last = size * size - 1;
        let cells = (0..size * size)
            .map(|i| if i == last { None } else { Some(i as u32 + 1) })
            .collect();

        Self {
            size,
            cells,
            empty: last,
        }
    }

    /// Builds a board from externally supplied cells, checking the invariant.
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, PuzzleError> {
        let len = cells.len();
        let size = (len as f64).sqrt().round() as usize;
        if size < MIN_SIZE || size * size != len {
            return Err(corrupt(format!("{len} cells do not form a square board")));
        }

        let mut seen = vec![false; len];
        let mut empty = None;

        for (index, cell) in cells.iter().enumerate() {
            match *cell {
                None => {
                    if empty.replace(index).is_some() {
                        return Err(corrupt("more than one empty cell".to_string()));
                    }
                }
                Some(label) => {
                    let slot = label as usize;
                    if slot == 0 || slot >= len {
                        return Err(corrupt(format!("tile {label} is out of range")));
                    }
                    if seen[slot] {
                        return Err(corrupt(format!("tile {label} appears twice")));
                    }
                    seen[slot] = true;
                }
            }
        }

        let empty = empty.ok_or_else(|| corrupt("no empty cell".to_string()))?;
        Ok(Self { size, cells, empty })
    }

    /// Shuffles every cell of the solved board, empty one included.
    ///
    /// Half of the results cannot be solved by sliding; see [`Grid::is_solvable`].
    pub fn shuffled_with<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut cells = Self::solved(size).cells;
        cells.shuffle(rng);

        let empty = cells
            .iter()
            .position(Option::is_none)
            .expect("shuffling keeps the empty cell");

        Self { size, cells, empty }
    }

    pub fn shuffled(size: usize) -> Self {
        Self::shuffled_with(size, &mut thread_rng())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Converts a cell index to `(row, column)`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn index_at(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// True when `index` shares a row or column with the empty cell.
    ///
    /// The empty cell trivially qualifies; sliding it is still rejected by
    /// [`Grid::apply_move`].
    pub fn can_move(&self, index: usize) -> bool {
        if index >= self.cells.len() {
            return false;
        }
        let (row, col) = self.position(index);
        let (empty_row, empty_col) = self.position(self.empty);
        row == empty_row || col == empty_col
    }

    /// Direction the run ending at `index` would travel, if it can slide at all.
    pub fn slide_direction(&self, index: usize) -> Option<Move> {
        if index == self.empty || !self.can_move(index) {
            return None;
        }

        let (row, col) = self.position(index);
        let (empty_row, empty_col) = self.position(self.empty);

        if row == empty_row {
            Some(if col > empty_col { Move::Left } else { Move::Right })
        } else if row > empty_row {
            Some(Move::Up)
        } else {
            Some(Move::Down)
        }
    }

    /// Number of tiles in the run ending at `index`.
    pub fn distance(&self, index: usize) -> Option<usize> {
        self.slide_direction(index)?;
        let (row, col) = self.position(index);
        let (empty_row, empty_col) = self.position(self.empty);
        Some(row.abs_diff(empty_row) + col.abs_diff(empty_col))
    }

    /// Slides the run between the empty cell and `index` one step toward the
    /// empty cell, leaving `index` empty.
    pub fn apply_move(&self, index: usize) -> Result<Self, PuzzleError> {
        let direction = self
            .slide_direction(index)
            .ok_or(PuzzleError::InvalidMove { index })?;
        let (row_step, col_step) = direction.as_offset();

        let mut next = self.clone();
        let mut current = self.empty;

        // walk from the old empty cell to the target, pulling each tile one step
        while current != index {
            let (row, col) = self.position(current);
            let source = self.index_at(
                row.wrapping_add_signed(row_step),
                col.wrapping_add_signed(col_step),
            );
            next.cells[current] = self.cells[source];
            current = source;
        }

        next.cells[index] = None;
        next.empty = index;

        debug!(index, %direction, from = self.empty, "slid run");

        Ok(next)
    }

    /// Index of the tile that would travel one step in `movement` into the
    /// empty cell.
    pub fn neighbour(&self, movement: Move) -> Option<usize> {
        let (row_step, col_step) = movement.as_offset();
        let (row, col) = self.position(self.empty);

        let row = row.checked_add_signed(row_step)?;
        let col = col.checked_add_signed(col_step)?;

        if row < self.size && col < self.size {
            Some(self.index_at(row, col))
        } else {
            None
        }
    }

    pub fn is_solved(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells.iter().enumerate().all(|(index, &cell)| {
            if index == last {
                cell.is_none()
            } else {
                cell == Some(index as u32 + 1)
            }
        })
    }

    /// Inversion parity test for reachability of the solved board.
    ///
    /// Informational only: shuffles are never filtered by it.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.count_inversions();
        let (empty_row, _) = self.position(self.empty);

        if self.size % 2 == 1 {
            // Odd-sized puzzle: solvable if inversions count is even
            inversions % 2 == 0
        } else {
            // Even-sized puzzle: solvable if (inversions + empty row index) is odd
            (inversions + empty_row) % 2 == 1
        }
    }

    fn count_inversions(&self) -> usize {
        let labels: Vec<u32> = self.cells.iter().flatten().copied().collect();

        labels
            .iter()
            .enumerate()
            .map(|(i, &label)| labels[i + 1..].iter().filter(|&&next| next < label).count())
            .sum()
    }
}

fn corrupt(reason: String) -> PuzzleError {
    PuzzleError::CorruptState { reason }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();

        for row in self.cells.chunks(self.size) {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(label) => write!(f, "{:>width$}", label)?,
                    None => write!(f, "{:>width$}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
