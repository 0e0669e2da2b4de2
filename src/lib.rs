//! Row/column sliding puzzle engine.
//!
//! A 15-style puzzle where any tile sharing a row or column with the empty
//! cell can be clicked or dragged, sliding the whole run between them. The
//! engine works on immutable [`Grid`] snapshots; [`Game`] is the container a
//! front end keeps, and [`GestureInterpreter`] turns drags into moves.

pub mod config;
pub mod error;
pub mod game;
pub mod gesture;
pub mod logging;
pub mod persistence;
pub mod puzzle;

pub use error::PuzzleError;
pub use game::Game;
pub use gesture::{Decision, GestureConfig, GestureInterpreter, Offset, Point};
pub use puzzle::{Cell, Grid, Move};
