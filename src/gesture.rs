//! Drag gesture interpretation.
//!
//! Turns a pointer drag on one tile into an axis-locked preview offset and,
//! on release, a decision to commit or cancel the slide. The grid itself is
//! never touched here; a `Commit` is handed back to the caller.

use tracing::{debug, trace};

use crate::puzzle::{Grid, Move};

/// Default tile span in pointer units.
pub const DEFAULT_TILE_SIZE: f32 = 105.0;

/// Default share of one tile span a drag must cover to commit.
pub const DEFAULT_COMMIT_RATIO: f32 = 0.5;

/// A pointer position, already normalized by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Preview displacement of the dragged tile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    /// Length along the locked axis; the other component is always zero.
    pub fn magnitude(&self) -> f32 {
        self.dx.abs().max(self.dy.abs())
    }
}

/// Outcome of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The caller should play the move at this index.
    Commit(usize),
    /// The grid stays as it is.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub tile_size: f32,
    pub commit_ratio: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            commit_ratio: DEFAULT_COMMIT_RATIO,
        }
    }
}

impl GestureConfig {
    /// Travel needed before a release commits.
    pub fn threshold(&self) -> f32 {
        self.tile_size * self.commit_ratio
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    index: usize,
    origin: Point,
    direction: Move,
    max_travel: f32,
    offset: Offset,
}

impl DragSession {
    fn track(&mut self, point: Point) -> Offset {
        let (ux, uy) = self.direction.screen_vector();
        let along = (point.x - self.origin.x) * ux + (point.y - self.origin.y) * uy;
        let travel = along.clamp(0.0, self.max_travel);

        // `+ 0.0` folds the -0.0 produced by a negative unit component
        self.offset = Offset {
            dx: ux * travel + 0.0,
            dy: uy * travel + 0.0,
        };
        self.offset
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum State {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// `Idle -> Dragging -> Idle` state machine for one pointer.
///
/// Out-of-order events (an update with no drag, a second begin) are ignored
/// rather than reported, since the input layer cannot always avoid them.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    state: State,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Starts dragging the tile at `index`. Returns `false` when the input
    /// is ignored: a drag is already running, or the tile cannot slide.
    pub fn begin(&mut self, grid: &Grid, index: usize, origin: Point) -> bool {
        if let State::Dragging(session) = &self.state {
            trace!(index, active = session.index, "begin ignored, drag in progress");
            return false;
        }

        let (Some(direction), Some(distance)) = (grid.slide_direction(index), grid.distance(index))
        else {
            trace!(index, "begin ignored, tile cannot slide");
            return false;
        };

        debug!(index, %direction, distance, "drag started");
        self.state = State::Dragging(DragSession {
            index,
            origin,
            direction,
            max_travel: distance as f32 * self.config.tile_size,
            offset: Offset::ZERO,
        });
        true
    }

    /// Moves the pointer; returns the clamped preview offset, or `None` when
    /// no drag is active.
    pub fn update(&mut self, point: Point) -> Option<Offset> {
        match &mut self.state {
            State::Dragging(session) => Some(session.track(point)),
            State::Idle => None,
        }
    }

    /// Releases the pointer and decides whether the drag commits.
    pub fn end(&mut self, point: Point) -> Option<Decision> {
        let State::Dragging(mut session) = std::mem::take(&mut self.state) else {
            trace!("end ignored, no drag in progress");
            return None;
        };

        let travel = session.track(point).magnitude();
        let decision = if travel >= self.config.threshold() {
            Decision::Commit(session.index)
        } else {
            Decision::Cancel
        };

        debug!(index = session.index, travel, ?decision, "drag ended");
        Some(decision)
    }

    /// Aborts the drag without a decision, e.g. when pointer capture is lost.
    pub fn cancel(&mut self) {
        if let State::Dragging(session) = std::mem::take(&mut self.state) {
            debug!(index = session.index, "drag cancelled");
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    pub fn dragged_index(&self) -> Option<usize> {
        match &self.state {
            State::Dragging(session) => Some(session.index),
            State::Idle => None,
        }
    }

    /// Current preview offset; zero while idle.
    pub fn offset(&self) -> Offset {
        match &self.state {
            State::Dragging(session) => session.offset,
            State::Idle => Offset::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Cell;

    fn scenario_grid() -> Grid {
        let mut cells: Vec<Cell> = (1..=14).map(Some).collect();
        cells.extend([None, Some(15)]);
        Grid::from_cells(cells).unwrap()
    }

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(GestureConfig::default())
    }

    #[test]
    fn test_short_drag_cancels() {
        let grid = scenario_grid();
        let mut gestures = interpreter();

        assert!(gestures.begin(&grid, 12, Point::new(50.0, 350.0)));
        let offset = gestures.update(Point::new(90.0, 350.0)).unwrap();
        assert_eq!(offset, Offset { dx: 40.0, dy: 0.0 });

        assert_eq!(gestures.end(Point::new(90.0, 350.0)), Some(Decision::Cancel));
        assert!(!gestures.is_dragging());
        assert_eq!(gestures.offset(), Offset::ZERO);
    }

    #[test]
    fn test_long_drag_clamps_and_commits() {
        let grid = scenario_grid();
        let mut gestures = interpreter();

        assert!(gestures.begin(&grid, 12, Point::new(50.0, 350.0)));
        let offset = gestures.update(Point::new(300.0, 350.0)).unwrap();
        assert_eq!(offset, Offset { dx: 210.0, dy: 0.0 });
        assert_eq!(gestures.dragged_index(), Some(12));

        assert_eq!(
            gestures.end(Point::new(300.0, 350.0)),
            Some(Decision::Commit(12))
        );
    }

    #[test]
    fn test_wrong_direction_and_perpendicular_clamp_to_zero() {
        let grid = scenario_grid();
        let mut gestures = interpreter();
        gestures.begin(&grid, 12, Point::new(50.0, 350.0));

        let backwards = gestures.update(Point::new(0.0, 350.0)).unwrap();
        assert_eq!(backwards, Offset::ZERO);

        let sideways = gestures.update(Point::new(80.0, 500.0)).unwrap();
        assert_eq!(sideways, Offset { dx: 30.0, dy: 0.0 });
    }

    #[test]
    fn test_vertical_drag_moves_down() {
        let grid = Grid::solved(4);
        let mut gestures = interpreter();

        // empty at the bottom right, tile 4 sits three rows above it
        assert!(gestures.begin(&grid, 3, Point::new(0.0, 0.0)));
        let offset = gestures.update(Point::new(0.0, 120.0)).unwrap();
        assert_eq!(offset, Offset { dx: 0.0, dy: 120.0 });

        let offset = gestures.update(Point::new(0.0, -50.0)).unwrap();
        assert_eq!(offset, Offset::ZERO);
    }

    #[test]
    fn test_leftward_offsets_are_negative() {
        let grid = Grid::solved(4);
        let mut gestures = interpreter();

        // open the bottom-left corner so the row slides left
        let grid = grid.apply_move(12).unwrap();
        assert!(gestures.begin(&grid, 15, Point::new(400.0, 0.0)));
        let offset = gestures.update(Point::new(300.0, 0.0)).unwrap();
        assert_eq!(offset, Offset { dx: -100.0, dy: 0.0 });
        assert_eq!(gestures.end(Point::new(300.0, 0.0)), Some(Decision::Commit(15)));
    }

    #[test]
    fn test_begin_rejects_empty_and_unaligned_tiles() {
        let grid = Grid::solved(4);
        let mut gestures = interpreter();

        assert!(!gestures.begin(&grid, 15, Point::default()));
        assert!(!gestures.begin(&grid, 0, Point::default()));
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let grid = Grid::solved(4);
        let mut gestures = interpreter();

        assert_eq!(gestures.update(Point::new(10.0, 10.0)), None);
        assert_eq!(gestures.end(Point::new(10.0, 10.0)), None);
        gestures.cancel();

        assert!(gestures.begin(&grid, 14, Point::default()));
        assert!(!gestures.begin(&grid, 11, Point::default()), "second begin ignored");
        assert_eq!(gestures.dragged_index(), Some(14));
    }

    #[test]
    fn test_cancel_resets_offset() {
        let grid = Grid::solved(4);
        let mut gestures = interpreter();

        gestures.begin(&grid, 14, Point::default());
        gestures.update(Point::new(80.0, 0.0));
        assert_eq!(gestures.offset(), Offset { dx: 80.0, dy: 0.0 });

        gestures.cancel();
        assert!(!gestures.is_dragging());
        assert_eq!(gestures.offset(), Offset::ZERO);
        assert_eq!(gestures.end(Point::new(80.0, 0.0)), None);
    }
}
