use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::grid::{BONUS_SPAN, GRID_SIZE, Grid, TILE_SIZE};
use crate::score_store::DEFAULT_HIGH_SCORE_FILE;
use crate::snake::INITIAL_LENGTH;

/// Difficulty levels; each fixes the tick interval for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn tick_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(200),
            Difficulty::Medium => Duration::from_millis(150),
            Difficulty::Hard => Duration::from_millis(100),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per side of the board
    pub grid_size: i32,
    /// Tile side length in distance units
    pub tile_size: i32,
    /// Segments the snake starts with
    pub initial_length: usize,
    /// A bonus item appears after a regular spawn with probability 1 / bonus_one_in
    pub bonus_one_in: u32,
    /// Where the high score is persisted
    pub high_score_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            tile_size: TILE_SIZE,
            initial_length: INITIAL_LENGTH,
            bonus_one_in: 5,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size <= 0 {
            bail!("tile_size must be positive, got {}", self.tile_size);
        }
        if self.grid_size < BONUS_SPAN {
            bail!("grid_size must be at least {BONUS_SPAN}, got {}", self.grid_size);
        }
        // The head may step one tile past the far edge before the wall check.
        let reach = self
            .grid_size
            .checked_mul(self.tile_size)
            .and_then(|extent| extent.checked_add(self.tile_size));
        if reach.is_none() || self.grid_size.checked_mul(self.grid_size).is_none() {
            bail!(
                "grid_size {} with tile_size {} is too large",
                self.grid_size,
                self.tile_size
            );
        }
        if self.bonus_one_in == 0 {
            bail!("bonus_one_in must be at least 1");
        }
        // The body extends left from the center column.
        let room = (self.grid_size / 2 + 1) as usize;
        if self.initial_length == 0 || self.initial_length > room {
            bail!(
                "initial_length must be between 1 and {} on a {}-cell grid, got {}",
                room,
                self.grid_size,
                self.initial_length
            );
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size, self.tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.tile_size, 25);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.bonus_one_in, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_difficulty_intervals() {
        assert_eq!(Difficulty::Easy.tick_interval(), Duration::from_millis(200));
        assert_eq!(Difficulty::Medium.tick_interval(), Duration::from_millis(150));
        assert_eq!(Difficulty::Hard.tick_interval(), Duration::from_millis(100));
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_load_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        fs::write(&path, r#"{ "grid_size": 30, "high_score_file": "best.txt" }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.grid_size, 30);
        assert_eq!(config.tile_size, 25);
        assert_eq!(config.high_score_file, PathBuf::from("best.txt"));
    }

    #[test]
    fn test_rejects_snake_that_does_not_fit() {
        let config = GameConfig {
            grid_size: 4,
            initial_length: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let huge_grid = GameConfig {
            grid_size: 100_000_000,
            ..Default::default()
        };
        assert!(huge_grid.validate().is_err());

        let huge_tile = GameConfig {
            tile_size: i32::MAX / 20,
            ..Default::default()
        };
        assert!(huge_tile.validate().is_err());

        // 46_340^2 still fits in i32; one more cell per side does not.
        let widest = GameConfig {
            grid_size: 46_340,
            tile_size: 1,
            ..Default::default()
        };
        assert!(widest.validate().is_ok());
        let too_wide = GameConfig {
            grid_size: 46_341,
            tile_size: 1,
            ..Default::default()
        };
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_load_rejects_oversized_grid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        fs::write(&path, r#"{ "grid_size": 100000000 }"#).unwrap();
        assert!(GameConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        fs::write(&path, "{ grid_size: ").unwrap();
        assert!(GameConfig::load(&path).is_err());
    }
}
