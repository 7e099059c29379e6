//! # Snake
//!
//! Single-player snake in the terminal: steer a growing snake around a
//! bordered arena, eat food, avoid the walls and your own tail. The game
//! speeds up as the score rises.
//!
//! ## Modules
//!
//! - [`snake`]: positions, directions and the snake body
//! - [`state`]: arena bounds, round state, food placement
//! - [`engine`]: the per-tick update and collision rules
//! - [`render`]: state and static screens as cell draws
//! - [`game`]: session phases and the tick loop
//! - [`term`]: the screen contract and its crossterm implementation
//! - [`config`], [`error`], [`logging`]: tuning constants, error types, file logging

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logging;
pub mod render;
pub mod snake;
pub mod state;
pub mod term;
