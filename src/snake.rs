use std::collections::VecDeque;

use Direction::*;

/// A cell in border-relative coordinates: row 0 and column 0 are the border.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) delta of one step.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// The snake body, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Position, direction: Direction) -> Self {
        Snake { body: VecDeque::from(vec![head]), direction }
    }

    /// Builds a snake from explicit segments, head first. Returns `None` for an
    /// empty body.
    pub fn from_segments<I>(segments: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Snake { body, direction })
    }

    pub fn head(&self) -> Position {
        // Never empty: every constructor and mutation keeps at least one segment.
        self.body[0]
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turns towards `new_direction` unless it would reverse the snake onto
    /// itself. Returns whether the heading changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn next_head(&self) -> Position {
        self.head().step(self.direction)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    /// Rewrites every segment with `f`, then drops segments that landed on a
    /// cell already claimed by a segment closer to the head.
    pub fn remap<F>(&mut self, mut f: F)
    where
        F: FnMut(Position) -> Position,
    {
        let mut seen = std::collections::HashSet::with_capacity(self.body.len());
        self.body = self.body.iter().map(|&p| f(p)).filter(|p| seen.insert(*p)).collect();
    }
}
