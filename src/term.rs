use std::ffi::OsString;
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, ContentStyle, Print, PrintStyledContent, StyledContent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::snake::Direction;

/// A key press, reduced to what the game reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    /// Ctrl+C, which raw mode delivers as a key instead of a signal.
    Interrupt,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn is_quit(self) -> bool {
        matches!(self, Key::Char('q') | Key::Interrupt)
    }
}

impl From<KeyEvent> for Key {
    fn from(ev: KeyEvent) -> Self {
        match ev.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Visual role of a cell. Screens map roles to colours, or ignore them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    Plain,
    Border,
    SnakeHead,
    SnakeBody,
    Food,
    Score,
    Hint,
    Title,
    Highlight,
}

/// The display and input surface the game draws on.
///
/// Coordinates are zero-based `(row, col)` screen cells.
pub trait Screen {
    /// Draws one cell. Fails for cells the backend refuses, which callers are
    /// expected to tolerate.
    fn set_cell(&mut self, row: u16, col: u16, glyph: char, style: Style) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;

    /// Makes everything drawn since the last call visible.
    fn present(&mut self) -> io::Result<()>;

    /// Waits up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;

    /// Current (rows, cols).
    fn size(&mut self) -> io::Result<(u16, u16)>;
}

/// Screen on the real terminal. Owns raw mode and the alternate screen until
/// dropped, including when dropped during a panic.
pub struct CrosstermScreen {
    stdout: Stdout,
    rows: u16,
    cols: u16,
    color: bool,
}

impl CrosstermScreen {
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let color = color_allowed(std::env::var_os("NO_COLOR"), std::env::var("TERM").ok());
        if !color {
            log::warn!("colour disabled, using plain styling");
        }

        // Built before touching the terminal so Drop undoes a partial setup.
        let mut screen = CrosstermScreen { stdout: stdout(), rows, cols, color };
        terminal::enable_raw_mode()?;
        execute!(screen.stdout, EnterAlternateScreen)?;
        screen.set_cursor_visibility(false);
        Ok(screen)
    }

    fn restore(&mut self) {
        let _ = terminal::disable_raw_mode();
        self.set_cursor_visibility(true);
        let _ = execute!(self.stdout, LeaveAlternateScreen);
    }

    fn set_cursor_visibility(&mut self, visible: bool) {
        let res = if visible {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        if let Err(err) = res {
            log::debug!("cursor visibility not supported: {}", err);
        }
    }

    fn content_style(&self, style: Style) -> Option<ContentStyle> {
        if !self.color {
            return None;
        }

        let (fg, bg, attr) = match style {
            Style::Plain => return None,
            Style::Border => (Color::White, Some(Color::Blue), None),
            Style::SnakeHead => (Color::Green, None, Some(Attribute::Bold)),
            Style::SnakeBody => (Color::Green, None, None),
            Style::Food => (Color::Red, None, Some(Attribute::Bold)),
            Style::Score => (Color::Yellow, None, Some(Attribute::Bold)),
            Style::Hint => (Color::Grey, None, Some(Attribute::Dim)),
            Style::Title => (Color::Green, None, Some(Attribute::Bold)),
            Style::Highlight => (Color::Red, None, Some(Attribute::Bold)),
        };

        let mut content = ContentStyle::new();
        content.foreground_color = Some(fg);
        content.background_color = bg;
        if let Some(attr) = attr {
            content.attributes.set(attr);
        }
        Some(content)
    }
}

impl Screen for CrosstermScreen {
    fn set_cell(&mut self, row: u16, col: u16, glyph: char, style: Style) -> io::Result<()> {
        // Writing the bottom-right cell scrolls some terminals, so it is refused.
        if row >= self.rows || col >= self.cols || (row + 1 == self.rows && col + 1 == self.cols) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cell ({}, {}) outside drawable area", row, col),
            ));
        }

        queue!(self.stdout, cursor::MoveTo(col, row))?;
        match self.content_style(style) {
            Some(content) => queue!(self.stdout, PrintStyledContent(StyledContent::new(content, glyph))),
            None => queue!(self.stdout, Print(glyph)),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn present(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(None);
            }

            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(Some(Key::from(ev)));
                }
            }
        }
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        let (cols, rows) = terminal::size()?;
        self.rows = rows;
        self.cols = cols;
        Ok((rows, cols))
    }
}

impl Drop for CrosstermScreen {
    fn drop(&mut self) {
        self.restore();
    }
}

fn color_allowed(no_color: Option<OsString>, term: Option<String>) -> bool {
    let no_color = no_color.map_or(false, |v| !v.is_empty());
    let dumb = term.map_or(false, |t| t == "dumb");
    !no_color && !dumb
}
