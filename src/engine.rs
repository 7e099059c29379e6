//! One simulation step.

use rand::Rng;

use crate::config::GameConfig;
use crate::state::{place_food, Arena, GameState};
use crate::term::Key;

/// Result of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    FoodEaten,
    GameOver,
}

/// Advances `state` by one tick.
///
/// A movement key turns the snake unless it would reverse it; any other key is
/// ignored. On `GameOver` the snake and food are left as they were and the
/// state is marked over.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    key: Option<Key>,
    arena: Arena,
    config: &GameConfig,
    rng: &mut R,
) -> Outcome {
    if state.over {
        return Outcome::GameOver;
    }

    if let Some(direction) = key.and_then(Key::direction) {
        state.snake.set_direction(direction);
    }

    let new_head = state.snake.next_head();

    if arena.is_wall(new_head) {
        log::info!("hit the wall at {:?}, score {}", new_head, state.score);
        state.over = true;
        return Outcome::GameOver;
    }

    if state.snake.contains(new_head) {
        log::info!("ran into itself at {:?}, score {}", new_head, state.score);
        state.over = true;
        return Outcome::GameOver;
    }

    if new_head != state.food {
        state.snake.push_head(new_head);
        state.snake.pop_tail();
        return Outcome::Continue;
    }

    let mut grown = state.snake.clone();
    grown.push_head(new_head);
    let food = match place_food(arena, &grown, config.food_attempts, rng) {
        Some(food) => food,
        None => {
            log::info!("arena full at score {}", state.score);
            state.over = true;
            return Outcome::GameOver;
        }
    };

    let old_score = state.score;
    state.snake = grown;
    state.food = food;
    state.score += config.points_per_food;

    let crossed = state.score / config.speed_threshold - old_score / config.speed_threshold;
    if crossed > 0 {
        state.speed_factor += config.speed_step * f64::from(crossed);
        log::debug!("score {} -> speed factor {:.1}", state.score, state.speed_factor);
    }

    log::debug!("food eaten, next food at {:?}", food);
    Outcome::FoodEaten
}
