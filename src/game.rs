//! Caller-side state: the current board, its move counter and the lock that
//! holds input back while a move is on screen.

use rand::{thread_rng, Rng};
use tracing::{debug, info, warn};

use crate::error::PuzzleError;
use crate::gesture::Decision;
use crate::persistence::SavedGame;
use crate::puzzle::{Grid, Move};

/// One game in progress.
///
/// Clicks, keyboard slides and committed drags all end up in [`Game::play`],
/// so the slide itself lives in exactly one place.
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    moves: u64,
    animating: bool,
}

impl Game {
    /// Starts from the solved board.
    pub fn new(size: usize) -> Self {
        Self {
            grid: Grid::solved(size),
            moves: 0,
            animating: false,
        }
    }

    /// Resumes a saved game, or starts fresh when it is absent or unusable.
    pub fn restore(size: usize, saved: Option<SavedGame>) -> Self {
        let Some(saved) = saved else {
            return Self::new(size);
        };

        match Grid::from_cells(saved.tiles) {
            Ok(grid) if grid.size() == size => {
                debug!(moves = saved.moves, "restored saved game");
                Self {
                    grid,
                    moves: saved.moves,
                    animating: false,
                }
            }
            Ok(grid) => {
                warn!(
                    saved = grid.size(),
                    expected = size,
                    "saved board has the wrong size, starting fresh"
                );
                Self::new(size)
            }
            Err(e) => {
                warn!(error = %e, "discarding saved game");
                Self::new(size)
            }
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// True between an accepted move and [`Game::animation_finished`].
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Slides the run ending at `index` and counts the move.
    ///
    /// Rejected moves leave the board and counter unchanged.
    pub fn play(&mut self, index: usize) -> Result<&Grid, PuzzleError> {
        if self.animating {
            return Err(PuzzleError::Animating);
        }

        self.grid = self.grid.apply_move(index)?;
        self.moves += 1;
        self.animating = true;

        if self.grid.is_solved() {
            info!(moves = self.moves, "puzzle solved");
        }
        Ok(&self.grid)
    }

    /// Slides the neighbouring tile that travels in `movement`.
    pub fn slide(&mut self, movement: Move) -> Result<&Grid, PuzzleError> {
        let index = self
            .grid
            .neighbour(movement)
            .ok_or(PuzzleError::InvalidMove {
                index: self.grid.empty_index(),
            })?;
        self.play(index)
    }

    /// Applies the outcome of a drag. Returns whether the board changed.
    pub fn apply_decision(&mut self, decision: Decision) -> Result<bool, PuzzleError> {
        match decision {
            Decision::Commit(index) => self.play(index).map(|_| true),
            Decision::Cancel => Ok(false),
        }
    }

    /// Releases the lock taken by the last accepted move.
    pub fn animation_finished(&mut self) {
        self.animating = false;
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Grid {
        self.grid = Grid::shuffled_with(self.grid.size(), rng);
        self.moves = 0;
        self.animating = false;

        info!(solvable = self.grid.is_solvable(), "shuffled board");
        &self.grid
    }

    pub fn shuffle(&mut self) -> &Grid {
        self.shuffle_with(&mut thread_rng())
    }

    /// Back to the solved board with a fresh counter.
    pub fn reset(&mut self) {
        *self = Self::new(self.grid.size());
        info!("reset board");
    }

    /// State to hand to the persistence layer.
    pub fn snapshot(&self) -> SavedGame {
        SavedGame {
            tiles: self.grid.cells().to_vec(),
            moves: self.moves,
        }
    }
}
