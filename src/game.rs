use std::thread::sleep;
use std::time::Duration;

use rand::Rng;

use crate::config::GameConfig;
use crate::engine::{self, Outcome};
use crate::error::SnakeError;
use crate::render::{self, DrawCommand, Glyphs};
use crate::state::{Arena, GameState};
use crate::term::{Key, Screen};

/// Poll interval on screens that just wait for a key.
const IDLE_POLL: Duration = Duration::from_millis(500);
const RESTART_KEY: Key = Key::Char('r');

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Instructions,
    Countdown,
    Playing,
    GameOver,
    Exit,
}

/// Session controller: owns the screen, the random source and the state of
/// the current round, and drives them through the phases of a session.
pub struct SnakeGame<S: Screen, R: Rng> {
    screen: S,
    rng: R,
    config: GameConfig,
    glyphs: Glyphs,
    last_score: u32,
    rounds: u32,
}

impl<S: Screen, R: Rng> SnakeGame<S, R> {
    pub fn new(screen: S, rng: R, config: GameConfig, glyphs: Glyphs) -> Result<Self, SnakeError> {
        config.validate()?;
        Ok(SnakeGame { screen, rng, config, glyphs, last_score: 0, rounds: 0 })
    }

    /// Runs from the instructions screen until the player quits.
    pub fn run(&mut self) -> Result<(), SnakeError> {
        let mut phase = Phase::Instructions;
        while phase != Phase::Exit {
            log::debug!("entering {:?}", phase);
            phase = self.step(phase)?;
        }
        log::info!("session over after {} round(s)", self.rounds);
        Ok(())
    }

    /// Runs one phase and returns the next one.
    pub fn step(&mut self, phase: Phase) -> Result<Phase, SnakeError> {
        match phase {
            Phase::Instructions => self.show_intro(),
            Phase::Countdown => self.show_countdown(),
            Phase::Playing => self.play(),
            Phase::GameOver => self.game_over(),
            Phase::Exit => Ok(Phase::Exit),
        }
    }

    pub fn last_score(&self) -> u32 {
        self.last_score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_intro(&mut self) -> Result<Phase, SnakeError> {
        let arena = match self.wait_for_room()? {
            Some(arena) => arena,
            None => return Ok(Phase::Exit),
        };
        let (rows, cols) = terminal_size(arena);
        let commands = render::instructions(rows, cols, &self.glyphs);
        self.draw(&commands)?;

        loop {
            match self.screen.poll_key(IDLE_POLL)? {
                Some(key) if key.is_quit() => return Ok(Phase::Exit),
                Some(_) => return Ok(Phase::Countdown),
                None => {}
            }
        }
    }

    fn show_countdown(&mut self) -> Result<Phase, SnakeError> {
        for remaining in (1..=self.config.countdown_frames).rev() {
            let (rows, cols) = self.screen.size()?;
            self.draw(&render::countdown(rows, cols, remaining))?;
            sleep(self.config.countdown_frame);
        }
        Ok(Phase::Playing)
    }

    fn play(&mut self) -> Result<Phase, SnakeError> {
        let mut arena = match self.wait_for_room()? {
            Some(arena) => arena,
            None => return Ok(Phase::Exit),
        };
        let mut state = match GameState::new(arena, &self.config, &mut self.rng) {
            Some(state) => state,
            None => {
                log::error!("no room for food in a {}x{} arena", arena.height, arena.width);
                return Ok(Phase::Exit);
            }
        };

        self.rounds += 1;
        self.last_score = 0;
        log::info!("round {} started in a {}x{} arena", self.rounds, arena.height, arena.width);

        let commands = render::frame(&state, arena, &self.glyphs);
        self.draw(&commands)?;

        loop {
            let (rows, cols) = self.screen.size()?;
            if (i32::from(rows), i32::from(cols)) != arena.terminal_size() {
                arena = match self.wait_for_room()? {
                    Some(arena) => arena,
                    None => return Ok(Phase::Exit),
                };
                log::info!("terminal resized, arena now {}x{}", arena.height, arena.width);
                state.fit_to(arena, &self.config, &mut self.rng);
                self.screen.clear()?;
            }

            let timeout = state.tick_timeout(self.config.base_tick);
            let key = self.screen.poll_key(timeout)?;
            if key.map_or(false, Key::is_quit) {
                return Ok(Phase::Exit);
            }

            let outcome = engine::tick(&mut state, key, arena, &self.config, &mut self.rng);
            self.last_score = state.score;
            if outcome == Outcome::GameOver {
                log::info!("round {} over with score {}", self.rounds, state.score);
                return Ok(Phase::GameOver);
            }

            let commands = render::frame(&state, arena, &self.glyphs);
            self.draw(&commands)?;
        }
    }

    fn game_over(&mut self) -> Result<Phase, SnakeError> {
        let (rows, cols) = self.screen.size()?;
        self.draw(&render::game_over(rows, cols, self.last_score))?;

        loop {
            match self.screen.poll_key(IDLE_POLL)? {
                Some(key) if key.is_quit() => return Ok(Phase::Exit),
                Some(RESTART_KEY) => return Ok(Phase::Playing),
                _ => {}
            }
        }
    }

    /// Blocks until the terminal is at least the configured minimum, showing a
    /// notice meanwhile. `None` means the player quit while waiting.
    fn wait_for_room(&mut self) -> Result<Option<Arena>, SnakeError> {
        let mut warned = false;

        loop {
            let (rows, cols) = self.screen.size()?;
            if let Some(arena) = Arena::from_terminal(rows, cols, &self.config) {
                return Ok(Some(arena));
            }

            if !warned {
                log::warn!("terminal is {}x{}, waiting for it to grow", cols, rows);
                warned = true;
            }
            let notice = self.config.too_small_notice();
            self.draw(&render::too_small(&notice, cols))?;

            if let Some(key) = self.screen.poll_key(self.config.resize_retry)? {
                if key.is_quit() {
                    return Ok(None);
                }
            }
        }
    }

    fn draw(&mut self, commands: &[DrawCommand]) -> Result<(), SnakeError> {
        self.screen.clear()?;
        render::render(&mut self.screen, commands);
        self.screen.present()?;
        Ok(())
    }
}

fn terminal_size(arena: Arena) -> (u16, u16) {
    let (rows, cols) = arena.terminal_size();
    (rows.clamp(0, i32::from(u16::MAX)) as u16, cols.clamp(0, i32::from(u16::MAX)) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ASCII;
    use crate::term::fake::FakeScreen;
    use crate::term::Style;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> GameConfig {
        GameConfig {
            countdown_frame: Duration::ZERO,
            resize_retry: Duration::from_millis(10),
            ..GameConfig::default()
        }
    }

    fn game(screen: FakeScreen) -> SnakeGame<FakeScreen, StdRng> {
        SnakeGame::new(screen, StdRng::seed_from_u64(3), config(), ASCII).unwrap()
    }

    fn head_cell(screen: &FakeScreen) -> Option<(u16, u16)> {
        screen.cells.iter().find(|(_, (_, style))| *style == Style::SnakeHead).map(|(pos, _)| *pos)
    }

    #[test]
    fn full_session_with_restart() {
        // 10x30 terminal: the snake starts at (4, 7) heading right and hits
        // the wall at column 27 on the 20th tick.
        let mut keys = vec![Some(Key::Char(' '))];
        keys.extend(std::iter::repeat(None).take(20));
        keys.push(Some(Key::Other));
        keys.push(Some(RESTART_KEY));
        let screen = FakeScreen::new(10, 30).with_keys(keys);
        let mut game = game(screen);

        game.run().unwrap();

        assert_eq!(game.rounds_played(), 2);
        assert_eq!(game.last_score(), 0);
        let screen = &game.screen;
        assert!(screen.any_frame_contains("SNAKE GAME"));
        assert!(screen.any_frame_contains("Starting in 3..."));
        assert!(screen.any_frame_contains("Starting in 1..."));
        assert!(screen.any_frame_contains("GAME OVER!"));
        assert!(screen.any_frame_contains("Final Score: "));
        assert_eq!(screen.polls[1], Duration::from_millis(100));
    }

    #[test]
    fn quit_from_instructions() {
        let screen = FakeScreen::new(24, 80).with_keys(vec![Some(Key::Char('q'))]);
        let mut game = game(screen);
        game.run().unwrap();

        assert_eq!(game.rounds_played(), 0);
        assert!(!game.screen.any_frame_contains("Starting in"));
    }

    #[test]
    fn interrupt_while_playing() {
        let keys = vec![Some(Key::Char('x')), None, Some(Key::Interrupt)];
        let mut game = game(FakeScreen::new(24, 80).with_keys(keys));
        game.run().unwrap();

        assert_eq!(game.rounds_played(), 1);
        assert!(!game.screen.any_frame_contains("GAME OVER!"));
    }

    #[test]
    fn restart_resets_round() {
        let mut game = game(FakeScreen::new(24, 80).with_keys(vec![Some(RESTART_KEY)]));
        game.last_score = 90;
        assert_eq!(game.step(Phase::GameOver).unwrap(), Phase::Playing);

        // The new round starts from scratch and quits on the exhausted script.
        assert_eq!(game.step(Phase::Playing).unwrap(), Phase::Exit);
        assert_eq!(game.last_score(), 0);
        assert_eq!(game.rounds_played(), 1);
        assert_eq!(game.screen.polls.last(), Some(&Duration::from_millis(100)));
        // Fresh single segment at (22 / 2, 78 / 4).
        assert_eq!(head_cell(&game.screen), Some((11, 19)));
    }

    #[test]
    fn too_small_terminal_waits_for_resize() {
        let mut screen = FakeScreen::new(8, 20).with_keys(vec![None, None, Some(Key::Char(' '))]);
        screen.sizes.extend(vec![(8, 20), (8, 20), (10, 30)]);
        let mut game = game(screen);
        game.run().unwrap();

        let screen = &game.screen;
        assert!(screen.any_frame_contains("Terminal too small."));
        assert!(screen.any_frame_contains("least 30x10."));
        assert!(screen.any_frame_contains("SNAKE GAME"));
        assert_eq!(game.rounds_played(), 1);
    }

    #[test]
    fn too_small_terminal_can_quit() {
        let screen = FakeScreen::new(5, 10).with_keys(vec![None, None, Some(Key::Char('q'))]);
        let mut game = game(screen);
        game.run().unwrap();

        assert_eq!(game.rounds_played(), 0);
        assert!(!game.screen.any_frame_contains("SNAKE GAME"));
        assert_eq!(game.screen.polls.len(), 3);
    }

    #[test]
    fn shrinking_terminal_clamps_snake() {
        let mut screen = FakeScreen::new(24, 80).with_keys(vec![None, None]);
        // Start of round and first tick see 24x80, then the terminal shrinks.
        screen.sizes.extend(vec![(24, 80), (24, 80), (12, 32)]);
        let mut game = game(screen);

        assert_eq!(game.step(Phase::Playing).unwrap(), Phase::Exit);

        let (row, col) = head_cell(&game.screen).unwrap();
        let arena = Arena::new(10, 30);
        assert!(arena.contains(crate::snake::Position::new(i32::from(row), i32::from(col))));
        assert!(game.screen.cells.keys().all(|&(r, c)| r < 12 && c < 32));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = GameConfig { points_per_food: 0, ..GameConfig::default() };
        let result = SnakeGame::new(FakeScreen::new(24, 80), StdRng::seed_from_u64(1), bad, ASCII);
        assert!(matches!(result, Err(SnakeError::Config(_))));
    }
}
