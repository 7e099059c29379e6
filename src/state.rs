use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::snake::{Direction, Position, Snake};

/// Interior bounds of the arena: the terminal size minus the border ring.
///
/// Playable cells are `1..=height - 2` by `1..=width - 2`; rows and columns at
/// or beyond `height - 1` / `width - 1` count as wall.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    pub height: i32,
    pub width: i32,
}

impl Arena {
    pub const fn new(height: i32, width: i32) -> Self {
        Arena { height, width }
    }

    /// Arena for a terminal of `rows` x `cols`, or `None` when the terminal is
    /// below the configured minimum.
    pub fn from_terminal(rows: u16, cols: u16, config: &GameConfig) -> Option<Self> {
        if rows < config.min_rows || cols < config.min_cols {
            return None;
        }
        let arena = Arena::new(i32::from(rows) - 2, i32::from(cols) - 2);
        if arena.cell_count() < 2 {
            return None;
        }
        Some(arena)
    }

    /// Terminal (rows, cols) this arena was derived from.
    pub fn terminal_size(&self) -> (i32, i32) {
        (self.height + 2, self.width + 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 1 && pos.row <= self.height - 2 && pos.col >= 1 && pos.col <= self.width - 2
    }

    /// True when `pos` is on or past the wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        pos.row <= 0 || pos.row >= self.height - 1 || pos.col <= 0 || pos.col >= self.width - 1
    }

    /// Nearest playable cell to `pos`.
    pub fn clamp(&self, pos: Position) -> Position {
        Position::new(
            pos.row.clamp(1, (self.height - 2).max(1)),
            pos.col.clamp(1, (self.width - 2).max(1)),
        )
    }

    pub fn cell_count(&self) -> usize {
        let rows = (self.height - 2).max(0) as usize;
        let cols = (self.width - 2).max(0) as usize;
        rows * cols
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (height, width) = (self.height, self.width);
        (1..height - 1).flat_map(move |row| (1..width - 1).map(move |col| Position::new(row, col)))
    }
}

/// Everything that changes during one round.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub speed_factor: f64,
    /// Set once the round has ended.
    pub over: bool,
}

impl GameState {
    /// Fresh round: one segment at (height / 2, width / 4) heading right, food
    /// placed at random. `None` if the arena has no room for food.
    pub fn new<R: Rng + ?Sized>(arena: Arena, config: &GameConfig, rng: &mut R) -> Option<Self> {
        let head = arena.clamp(Position::new(arena.height / 2, arena.width / 4));
        let snake = Snake::new(head, Direction::Right);
        let food = place_food(arena, &snake, config.food_attempts, rng)?;
        Some(GameState::from_parts(snake, food))
    }

    pub fn from_parts(snake: Snake, food: Position) -> Self {
        GameState { snake, food, score: 0, speed_factor: 1.0, over: false }
    }

    /// Input timeout of one tick: the base tick divided by the speed factor,
    /// rounded to whole milliseconds.
    pub fn tick_timeout(&self, base: Duration) -> Duration {
        let millis = (base.as_millis() as f64 / self.speed_factor).round();
        Duration::from_millis(millis.max(1.0) as u64)
    }

    /// Best-effort recovery after a resize: every segment moves to its nearest
    /// cell inside `arena`, segments that collapse onto an earlier one are
    /// dropped, and food is relocated if it is no longer reachable.
    pub fn fit_to<R: Rng + ?Sized>(&mut self, arena: Arena, config: &GameConfig, rng: &mut R) {
        self.snake.remap(|p| arena.clamp(p));

        if !arena.contains(self.food) || self.snake.contains(self.food) {
            match place_food(arena, &self.snake, config.food_attempts, rng) {
                Some(food) => self.food = food,
                None => log::warn!("no free cell left for food after resize"),
            }
        }
    }
}

/// Picks a uniformly random playable cell not covered by `snake`.
///
/// Draws at random up to `attempts` times, then falls back to choosing among
/// the enumerated free cells. `None` means the arena is full.
pub fn place_food<R: Rng + ?Sized>(
    arena: Arena,
    snake: &Snake,
    attempts: u32,
    rng: &mut R,
) -> Option<Position> {
    if arena.cell_count() == 0 {
        return None;
    }

    for _ in 0..attempts {
        let pos = Position::new(
            rng.gen_range(1..=arena.height - 2),
            rng.gen_range(1..=arena.width - 2),
        );
        if !snake.contains(pos) {
            return Some(pos);
        }
    }

    log::debug!("food sampling gave up after {} attempts, scanning free cells", attempts);
    let free: Vec<Position> = arena.cells().filter(|p| !snake.contains(*p)).collect();
    free.choose(rng).copied()
}
