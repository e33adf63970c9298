//! Classic Snake: a grid simulation with regular and bonus apples and a
//! persisted high score.
//!
//! - `grid`: coordinates, headings, bounds
//! - `snake`: segment shift register and collision checks
//! - `spawn`: item placement
//! - `session`: game lifecycle and tick timer
//! - `score_store`: high-score file
//! - `config`: difficulty and game settings
//!
//! Nothing here depends on the window; the binary draws whatever `Session` exposes.

pub mod config;
pub mod grid;
pub mod score_store;
pub mod session;
pub mod snake;
pub mod spawn;

pub use config::{Difficulty, GameConfig};
pub use grid::{Cell, Direction, Grid};
pub use score_store::{HighScore, ScoreStore};
pub use session::{GameOverReason, Item, Phase, Session, TickReport};
pub use snake::Snake;
pub use spawn::Spawner;
