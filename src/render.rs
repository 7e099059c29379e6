//! Translation of game state and static screens into cell draws.

use crate::snake::Position;
use crate::state::{Arena, GameState};
use crate::term::{Screen, Style};

/// Glyph set for one kind of terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub head: char,
    pub body: char,
    pub food: char,
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub hint: &'static str,
}

pub const UNICODE: Glyphs = Glyphs {
    head: '█',
    body: '▒',
    food: '◆',
    horizontal: '─',
    vertical: '│',
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    hint: "← ↑ → ↓: Move | q: Quit",
};

pub const ASCII: Glyphs = Glyphs {
    head: 'O',
    body: 'o',
    food: '*',
    horizontal: '-',
    vertical: '|',
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    hint: "Arrows: Move | q: Quit",
};

impl Glyphs {
    /// Unicode when the locale says UTF-8, ASCII otherwise.
    pub fn detect() -> Glyphs {
        let vars = ["LC_ALL", "LC_CTYPE", "LANG"].iter().map(|v| std::env::var(v).ok());
        Self::for_locale(vars)
    }

    fn for_locale<I: IntoIterator<Item = Option<String>>>(vars: I) -> Glyphs {
        let locale = vars.into_iter().flatten().find(|v| !v.is_empty()).unwrap_or_default();
        let locale = locale.to_ascii_lowercase();
        if locale.contains("utf-8") || locale.contains("utf8") {
            UNICODE
        } else {
            ASCII
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    Cell { row: u16, col: u16, glyph: char, style: Style },
    Text { row: u16, col: u16, text: String, style: Style },
}

/// Applies `commands` to `screen`. Cells the screen refuses are skipped; the
/// number skipped is returned.
pub fn render<S: Screen + ?Sized>(screen: &mut S, commands: &[DrawCommand]) -> usize {
    let mut refused = 0;

    for command in commands {
        match command {
            DrawCommand::Cell { row, col, glyph, style } => {
                refused += put(screen, *row, *col, *glyph, *style);
            }
            DrawCommand::Text { row, col, text, style } => {
                for (i, glyph) in text.chars().enumerate() {
                    match u16::try_from(i).ok().and_then(|i| col.checked_add(i)) {
                        Some(c) => refused += put(screen, *row, c, glyph, *style),
                        None => break,
                    }
                }
            }
        }
    }

    refused
}

fn put<S: Screen + ?Sized>(screen: &mut S, row: u16, col: u16, glyph: char, style: Style) -> usize {
    match screen.set_cell(row, col, glyph, style) {
        Ok(()) => 0,
        Err(err) => {
            log::trace!("skipped cell ({}, {}): {}", row, col, err);
            1
        }
    }
}

/// One frame of play: border, control hint, snake, food and score.
pub fn frame(state: &GameState, arena: Arena, glyphs: &Glyphs) -> Vec<DrawCommand> {
    let (rows, cols) = arena.terminal_size();
    let mut out = Vec::new();

    border(&mut out, rows, cols, glyphs);
    push_text(&mut out, rows - 1, 2, glyphs.hint, Style::Hint);

    for (i, pos) in state.snake.segments().enumerate() {
        let (glyph, style) =
            if i == 0 { (glyphs.head, Style::SnakeHead) } else { (glyphs.body, Style::SnakeBody) };
        push_cell(&mut out, pos, glyph, style);
    }
    push_cell(&mut out, state.food, glyphs.food, Style::Food);

    let score = format!("Score: {}", state.score);
    let len = score.chars().count() as i32;
    let col = (cols - len - 1).min(cols - 2).max(0);
    push_text(&mut out, 0, col, &score, Style::Score);

    out
}

pub fn instructions(rows: u16, cols: u16, glyphs: &Glyphs) -> Vec<DrawCommand> {
    let (rows, cols) = (i32::from(rows), i32::from(cols));
    let food_line = format!("Eat food ({}) to grow and increase your score", glyphs.food);
    let lines = [
        "Use arrow keys to move the snake",
        food_line.as_str(),
        "Avoid hitting the walls or yourself",
        "Press 'q' to quit anytime",
        "The snake speeds up as your score increases",
        "",
        "Press any key to start",
    ];
    let mut out = Vec::new();

    push_centered(&mut out, rows / 4, cols, "SNAKE GAME", Style::Title);
    for (i, line) in lines.iter().enumerate() {
        let style = if i == lines.len() - 1 { Style::Highlight } else { Style::Plain };
        push_centered(&mut out, rows / 4 + 3 + i as i32, cols, line, style);
    }

    let box_height = lines.len() as i32 + 4;
    let box_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32 + 4;
    let top = rows / 4 + 1;
    let left = (cols - box_width) / 2;
    for y in 0..box_height {
        for x in 0..box_width {
            let on_row_edge = y == 0 || y == box_height - 1;
            let on_col_edge = x == 0 || x == box_width - 1;
            let glyph = match (on_row_edge, on_col_edge) {
                (true, true) => '+',
                (true, false) => '-',
                (false, true) => '|',
                (false, false) => continue,
            };
            push_cell(&mut out, Position::new(top + y, left + x), glyph, Style::Border);
        }
    }

    out
}

pub fn countdown(rows: u16, cols: u16, remaining: u32) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    let text = format!("Starting in {}...", remaining);
    push_centered(&mut out, i32::from(rows) / 2, i32::from(cols), &text, Style::Highlight);
    out
}

pub fn game_over(rows: u16, cols: u16, score: u32) -> Vec<DrawCommand> {
    let (rows, cols) = (i32::from(rows), i32::from(cols));
    let mut out = Vec::new();
    push_centered(&mut out, rows / 2 - 2, cols, "GAME OVER!", Style::Highlight);
    push_centered(&mut out, rows / 2, cols, &format!("Final Score: {}", score), Style::Score);
    push_centered(
        &mut out,
        rows / 2 + 2,
        cols,
        "Press 'r' to play again or 'q' to quit",
        Style::Title,
    );
    out
}

/// The notice from the top-left corner, wrapped at word boundaries to `cols`.
pub fn too_small(notice: &str, cols: u16) -> Vec<DrawCommand> {
    let width = usize::from(cols.max(1));
    let mut lines: Vec<String> = Vec::new();

    for word in notice.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }

    lines
        .into_iter()
        .enumerate()
        .filter_map(|(row, text)| {
            let row = u16::try_from(row).ok()?;
            Some(DrawCommand::Text { row, col: 0, text, style: Style::Plain })
        })
        .collect()
}

fn border(out: &mut Vec<DrawCommand>, rows: i32, cols: i32, glyphs: &Glyphs) {
    let (bottom, right) = (rows - 1, cols - 1);
    for col in 1..right {
        push_cell(out, Position::new(0, col), glyphs.horizontal, Style::Border);
        push_cell(out, Position::new(bottom, col), glyphs.horizontal, Style::Border);
    }
    for row in 1..bottom {
        push_cell(out, Position::new(row, 0), glyphs.vertical, Style::Border);
        push_cell(out, Position::new(row, right), glyphs.vertical, Style::Border);
    }
    push_cell(out, Position::new(0, 0), glyphs.top_left, Style::Border);
    push_cell(out, Position::new(0, right), glyphs.top_right, Style::Border);
    push_cell(out, Position::new(bottom, 0), glyphs.bottom_left, Style::Border);
    push_cell(out, Position::new(bottom, right), glyphs.bottom_right, Style::Border);
}

fn push_cell(out: &mut Vec<DrawCommand>, pos: Position, glyph: char, style: Style) {
    if let (Ok(row), Ok(col)) = (u16::try_from(pos.row), u16::try_from(pos.col)) {
        out.push(DrawCommand::Cell { row, col, glyph, style });
    }
}

fn push_text(out: &mut Vec<DrawCommand>, row: i32, col: i32, text: &str, style: Style) {
    if let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col.max(0))) {
        out.push(DrawCommand::Text { row, col, text: text.to_string(), style });
    }
}

fn push_centered(out: &mut Vec<DrawCommand>, row: i32, cols: i32, text: &str, style: Style) {
    if text.is_empty() {
        return;
    }
    let col = (cols - text.chars().count() as i32) / 2;
    push_text(out, row, col, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::{Direction, Snake};
    use crate::term::fake::FakeScreen;

    fn sample_state() -> GameState {
        let snake = Snake::from_segments(
            vec![(4, 6).into(), (4, 5).into(), (4, 4).into()],
            Direction::Right,
        )
        .unwrap();
        let mut state = GameState::from_parts(snake, (6, 20).into());
        state.score = 120;
        state
    }

    #[test]
    fn frame_draws_snake_food_and_border() {
        let arena = Arena::new(8, 28);
        let mut screen = FakeScreen::new(10, 30);
        render(&mut screen, &frame(&sample_state(), arena, &ASCII));

        assert_eq!(screen.glyph_at(4, 6), Some('O'));
        assert_eq!(screen.cells[&(4, 6)].1, Style::SnakeHead);
        assert_eq!(screen.glyph_at(4, 5), Some('o'));
        assert_eq!(screen.glyph_at(4, 4), Some('o'));
        assert_eq!(screen.glyph_at(6, 20), Some('*'));
        assert_eq!(screen.glyph_at(0, 0), Some('+'));
        assert_eq!(screen.glyph_at(5, 0), Some('|'));
        assert_eq!(screen.glyph_at(5, 29), Some('|'));
    }

    #[test]
    fn score_and_hint_sit_on_the_border() {
        let arena = Arena::new(8, 28);
        let mut screen = FakeScreen::new(10, 30);
        render(&mut screen, &frame(&sample_state(), arena, &ASCII));
        let text = screen.text();
        let lines: Vec<&str> = text.lines().collect();

        // "Score: 120" is 10 wide: column 30 - 10 - 1 = 19.
        assert_eq!(&lines[0][19..29], "Score: 120");
        assert_eq!(&lines[9][2..24], "Arrows: Move | q: Quit");
    }

    #[test]
    fn refused_corner_does_not_abort_frame() {
        let arena = Arena::new(8, 28);
        let mut screen = FakeScreen::new(10, 30);
        let refused = render(&mut screen, &frame(&sample_state(), arena, &UNICODE));

        assert_eq!(refused, 1);
        assert_eq!(screen.glyph_at(9, 29), None);
        // Commands after the refused corner still landed.
        assert_eq!(screen.glyph_at(6, 20), Some('◆'));
        assert_eq!(screen.glyph_at(0, 29), Some('┐'));
    }

    #[test]
    fn drawing_past_the_screen_is_swallowed() {
        // The screen shrank but the state still targets the old arena.
        let arena = Arena::new(20, 40);
        let mut screen = FakeScreen::new(10, 30);
        let refused = render(&mut screen, &frame(&sample_state(), arena, &ASCII));
        assert!(refused > 0);
        assert_eq!(screen.glyph_at(4, 6), Some('O'));
    }

    #[test]
    fn game_over_screen_text() {
        let mut screen = FakeScreen::new(24, 80);
        render(&mut screen, &game_over(24, 80, 70));
        let text = screen.text();
        assert!(text.contains("GAME OVER!"));
        assert!(text.contains("Final Score: 70"));
        assert!(text.contains("Press 'r' to play again or 'q' to quit"));
    }

    #[test]
    fn instructions_fit_minimum_terminal() {
        let mut screen = FakeScreen::new(10, 30);
        let refused = render(&mut screen, &instructions(10, 30, &ASCII));
        // Lines wider than 30 columns spill off the edge; that is tolerated.
        assert!(refused > 0);
        assert!(screen.text().contains("SNAKE GAME"));
    }

    #[test]
    fn instructions_on_roomy_terminal() {
        let mut screen = FakeScreen::new(40, 100);
        let refused = render(&mut screen, &instructions(40, 100, &UNICODE));
        assert_eq!(refused, 0);
        let text = screen.text();
        assert!(text.contains("Eat food (◆) to grow and increase your score"));
        assert!(text.contains("Press any key to start"));
    }

    #[test]
    fn countdown_is_centred() {
        let commands = countdown(10, 30, 3);
        assert_eq!(
            commands,
            vec![DrawCommand::Text {
                row: 5,
                col: 7,
                text: "Starting in 3...".to_string(),
                style: Style::Highlight,
            }]
        );
    }

    #[test]
    fn too_small_notice_wraps() {
        let notice = "Terminal too small. Please resize to at least 30x10.";
        let wide = too_small(notice, 80);
        assert_eq!(wide.len(), 1);

        let mut screen = FakeScreen::new(8, 20);
        let refused = render(&mut screen, &too_small(notice, 20));
        assert_eq!(refused, 0);
        let text = screen.text();
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        assert_eq!(lines[0], "Terminal too small.");
        assert_eq!(lines[1], "Please resize to at");
        assert_eq!(lines[2], "least 30x10.");
    }

    #[test]
    fn locale_picks_glyphs() {
        assert_eq!(Glyphs::for_locale(vec![None, None, Some("en_US.UTF-8".into())]), UNICODE);
        assert_eq!(Glyphs::for_locale(vec![Some("C".into()), None, Some("en_US.UTF-8".into())]), ASCII);
        assert_eq!(Glyphs::for_locale(vec![Some(String::new()), Some("de_DE.utf8".into())]), UNICODE);
        assert_eq!(Glyphs::for_locale(Vec::new()), ASCII);
    }
}
