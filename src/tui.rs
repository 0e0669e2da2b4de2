//! Terminal front end.
//!
//! Maps crossterm mouse and key events onto the engine and redraws the board
//! after each one. Terminal cells are scaled so one tile spans
//! `tile_size` pointer units on both axes, whatever its width in columns.

use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::warn;

use slide_puzzle::gesture::{Decision, GestureConfig, GestureInterpreter, Offset, Point};
use slide_puzzle::persistence;
use slide_puzzle::puzzle::{Grid, Move};
use slide_puzzle::{Game, PuzzleError};

const TILE_WIDTH: u16 = 6;
const TILE_HEIGHT: u16 = 3;
const BOARD_LEFT: u16 = 2;
const BOARD_TOP: u16 = 2;

const HELP: &str = "click or drag tiles, arrows slide, s shuffle, r reset, q quit";

/// Conversion between terminal cells and pointer units.
#[derive(Debug, Clone, Copy)]
struct Layout {
    tile_size: f32,
}

impl Layout {
    fn point(&self, column: u16, row: u16) -> Point {
        let x = (f32::from(column) - f32::from(BOARD_LEFT)) / f32::from(TILE_WIDTH);
        let y = (f32::from(row) - f32::from(BOARD_TOP)) / f32::from(TILE_HEIGHT);
        Point::new(x * self.tile_size, y * self.tile_size)
    }

    fn hit(&self, grid: &Grid, column: u16, row: u16) -> Option<usize> {
        let col = usize::from(column.checked_sub(BOARD_LEFT)? / TILE_WIDTH);
        let row = usize::from(row.checked_sub(BOARD_TOP)? / TILE_HEIGHT);
        (col < grid.size() && row < grid.size()).then(|| grid.index_at(row, col))
    }

    /// Preview offset in whole terminal cells.
    fn shift(&self, offset: Offset) -> (i32, i32) {
        let dx = offset.dx / self.tile_size * f32::from(TILE_WIDTH);
        let dy = offset.dy / self.tile_size * f32::from(TILE_HEIGHT);
        (dx.round() as i32, dy.round() as i32)
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    index: usize,
    dragged: bool,
}

/// Interactive session state.
pub struct App {
    game: Game,
    gestures: GestureInterpreter,
    layout: Layout,
    save_path: PathBuf,
    press: Option<Press>,
    status: String,
    quit: bool,
}

impl App {
    pub fn new(game: Game, gesture: GestureConfig, save_path: PathBuf) -> Self {
        Self {
            game,
            gestures: GestureInterpreter::new(gesture),
            layout: Layout {
                tile_size: gesture.tile_size,
            },
            save_path,
            press: None,
            status: String::new(),
            quit: false,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // geometry changed under the pointer
            Event::Resize(..) => {
                self.gestures.cancel();
                self.press = None;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let movement = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                return;
            }
            KeyCode::Char('s') => {
                self.gestures.cancel();
                self.game.shuffle();
                self.status = if self.game.grid().is_solvable() {
                    "Shuffled".to_string()
                } else {
                    "Shuffled (this board cannot be solved by sliding)".to_string()
                };
                self.persist();
                return;
            }
            KeyCode::Char('r') => {
                self.gestures.cancel();
                self.game.reset();
                self.status = "Reset".to_string();
                self.persist();
                return;
            }
            KeyCode::Up => Move::Up,
            KeyCode::Down => Move::Down,
            KeyCode::Left => Move::Left,
            KeyCode::Right => Move::Right,
            _ => return,
        };

        let result = self.game.slide(movement).map(|_| true);
        self.after_move(result);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = self.layout.point(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.layout.hit(self.game.grid(), mouse.column, mouse.row)
                else {
                    return;
                };
                if self.gestures.begin(self.game.grid(), index, point) {
                    self.press = Some(Press {
                        index,
                        dragged: false,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.gestures.update(point).is_some() {
                    if let Some(press) = self.press.as_mut() {
                        press.dragged = true;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(decision) = self.gestures.end(point) else {
                    return;
                };
                let press = self.press.take();

                let result = match (decision, press) {
                    // press and release without motion is a click
                    (Decision::Cancel, Some(press)) if !press.dragged => {
                        self.game.play(press.index).map(|_| true)
                    }
                    (decision, _) => self.game.apply_decision(decision),
                };
                self.after_move(result);
            }
            _ => {}
        }
    }

    fn after_move(&mut self, result: Result<bool, PuzzleError>) {
        match result {
            Ok(false) => {}
            Ok(true) => {
                self.status = if self.game.is_solved() {
                    format!("Solved in {} moves!", self.game.moves())
                } else {
                    String::new()
                };
                self.persist();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = persistence::save(&self.save_path, &self.game.snapshot()) {
            warn!(error = %e, "failed to save game");
            self.status = e.to_string();
        }
    }

    fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        let grid = self.game.grid();
        queue!(
            out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(format!("Moves: {}  {}", self.game.moves(), self.status))
        )?;

        let dragged = self.gestures.dragged_index();
        for (index, cell) in grid.cells().iter().enumerate() {
            if let Some(label) = cell {
                if Some(index) != dragged {
                    self.draw_tile(out, grid, index, *label, (0, 0))?;
                }
            }
        }

        // dragged tile last so it stays on top
        if let Some(index) = dragged {
            if let Some(Some(label)) = grid.cell(index) {
                let shift = self.layout.shift(self.gestures.offset());
                self.draw_tile(out, grid, index, label, shift)?;
            }
        }

        let footer = BOARD_TOP + grid.size() as u16 * TILE_HEIGHT + 1;
        queue!(out, ResetColor, MoveTo(0, footer), Print(HELP))?;
        out.flush()
    }

    fn draw_tile(
        &self,
        out: &mut impl Write,
        grid: &Grid,
        index: usize,
        label: u32,
        shift: (i32, i32),
    ) -> io::Result<()> {
        let (row, col) = grid.position(index);
        let x = i32::from(BOARD_LEFT) + col as i32 * i32::from(TILE_WIDTH) + shift.0;
        let y = i32::from(BOARD_TOP) + row as i32 * i32::from(TILE_HEIGHT) + shift.1;
        let (x, y) = (x.max(0) as u16, y.max(0) as u16);

        let inner = usize::from(TILE_WIDTH) - 2;
        let color = if home_is_light(label, grid.size()) {
            Color::White
        } else {
            Color::DarkGrey
        };
        let weight = if grid.can_move(index) {
            Attribute::Bold
        } else {
            Attribute::NormalIntensity
        };

        queue!(
            out,
            SetForegroundColor(color),
            SetAttribute(weight),
            MoveTo(x, y),
            Print(format!("┌{}┐", "─".repeat(inner))),
            MoveTo(x, y + 1),
            Print(format!("│{:^inner$}│", label)),
            MoveTo(x, y + 2),
            Print(format!("└{}┘", "─".repeat(inner))),
            SetAttribute(Attribute::Reset)
        )
    }
}

/// Checkerboard shade of the tile's solved position.
fn home_is_light(label: u32, size: usize) -> bool {
    let home = label as usize - 1;
    (home / size + home % size) % 2 == 1
}

/// Restores the terminal however the session ends.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Runs the interactive loop until the player quits.
pub fn run(mut app: App) -> io::Result<()> {
    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;

    while !app.quit {
        app.draw(&mut stdout)?;
        // the frame for the last move is on screen
        app.game.animation_finished();
        let event = event::read()?;
        app.handle_event(event);
    }

    Ok(())
}
