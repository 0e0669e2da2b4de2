use rand::rngs::StdRng;
use rand::SeedableRng;

use slide_puzzle::persistence::SavedGame;
use slide_puzzle::{Cell, Decision, Game, GestureConfig, GestureInterpreter, Grid, Offset, Point};

const TILE: f32 = 105.0;

/// `[1..14, empty, 15]`: empty cell at row 3, column 2.
fn near_solved() -> Game {
    let mut tiles: Vec<Cell> = (1..=14).map(Some).collect();
    tiles.extend([None, Some(15)]);
    Game::restore(4, Some(SavedGame { tiles, moves: 0 }))
}

fn after_row_slide() -> Vec<Cell> {
    let mut expected: Vec<Cell> = (1..=12).map(Some).collect();
    expected.extend([None, Some(13), Some(14), Some(15)]);
    expected
}

/// Centre of the tile at `index` on a 4×4 board drawn with `TILE` spans.
fn centre(index: usize) -> Point {
    let (row, col) = (index / 4, index % 4);
    Point::new((col as f32 + 0.5) * TILE, (row as f32 + 0.5) * TILE)
}

#[test]
fn click_slides_the_whole_run() {
    let mut game = near_solved();
    game.play(12).unwrap();

    assert_eq!(game.grid().cells(), after_row_slide().as_slice());
    assert_eq!(game.moves(), 1);
}

#[test]
fn short_drag_leaves_board_alone() {
    let mut game = near_solved();
    let mut gestures = GestureInterpreter::new(GestureConfig::default());
    let start = centre(12);

    assert!(gestures.begin(game.grid(), 12, start));
    let release = Point::new(start.x + 40.0, start.y);
    assert_eq!(gestures.update(release), Some(Offset { dx: 40.0, dy: 0.0 }));

    let decision = gestures.end(release).unwrap();
    assert_eq!(decision, Decision::Cancel);
    assert_eq!(game.apply_decision(decision), Ok(false));
    assert_eq!(game.moves(), 0);
    assert_eq!(game.grid().empty_index(), 14);
}

#[test]
fn long_drag_clamps_then_commits() {
    let mut game = near_solved();
    let mut gestures = GestureInterpreter::new(GestureConfig::default());
    let start = centre(12);

    assert!(gestures.begin(game.grid(), 12, start));
    let release = Point::new(start.x + 250.0, start.y);
    assert_eq!(gestures.update(release), Some(Offset { dx: 210.0, dy: 0.0 }));

    let decision = gestures.end(release).unwrap();
    assert_eq!(decision, Decision::Commit(12));
    assert_eq!(game.apply_decision(decision), Ok(true));
    assert_eq!(game.grid().cells(), after_row_slide().as_slice());
    assert_eq!(game.moves(), 1);
}

#[test]
fn drag_and_click_reach_the_same_board() {
    let mut clicked = near_solved();
    clicked.play(13).unwrap();

    let mut dragged = near_solved();
    let mut gestures = GestureInterpreter::new(GestureConfig::default());
    let start = centre(13);
    gestures.begin(dragged.grid(), 13, start);
    let decision = gestures.end(Point::new(start.x + TILE, start.y)).unwrap();
    dragged.apply_decision(decision).unwrap();

    assert_eq!(clicked.grid(), dragged.grid());
    assert_eq!(clicked.moves(), dragged.moves());
}

#[test]
fn shuffle_then_play_keeps_invariant() {
    let mut game = Game::new(4);
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..50 {
        game.shuffle_with(&mut rng);
        assert_eq!(game.moves(), 0);

        for index in (0..16).rev() {
            if game.play(index).is_ok() {
                game.animation_finished();
            }
        }

        let rebuilt = Grid::from_cells(game.grid().cells().to_vec());
        assert!(rebuilt.is_ok(), "round {round} broke the board:\n{}", game.grid());
    }
}

#[test]
fn corrupt_save_is_replaced() {
    let game = Game::restore(
        4,
        Some(SavedGame {
            tiles: vec![None; 16],
            moves: 30,
        }),
    );

    assert!(game.is_solved());
    assert_eq!(game.moves(), 0);
}
