//! Sky Runner: fly a small airplane through a procedurally generated
//! forest, collect coins and reach the goal flag to advance a level.
//!
//! The simulation (`world`, `flight`, `collision`, `radar`, `session`) is
//! independent of the window; `game` and `render` drive it with macroquad.

pub mod collision;
pub mod config;
pub mod error;
pub mod flight;
pub mod game;
pub mod input;
pub mod logging;
pub mod radar;
pub mod render;
pub mod scene;
pub mod session;
pub mod types;
pub mod utils;
pub mod world;
