//! High-score persistence: one ASCII decimal integer in a plain text file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_HIGH_SCORE_FILE: &str = "highest_score.txt";

#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value, or 0 if the file is missing, empty, or not a number.
    pub fn load(&self) -> u32 {
        match self.read() {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no high score file yet");
                0
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable high score: {e:#}");
                0
            }
        }
    }

    /// Overwrite the stored value. Failures are logged and otherwise ignored.
    pub fn save(&self, value: u32) {
        if let Err(e) = self.write(value) {
            tracing::warn!(path = %self.path.display(), "failed to save high score: {e:#}");
        }
    }

    fn read(&self) -> Result<Option<u32>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        let value = text
            .trim()
            .parse::<u32>()
            .with_context(|| format!("parsing {:?}", text.trim()))?;
        Ok(Some(value))
    }

    fn write(&self, value: u32) -> Result<()> {
        fs::write(&self.path, value.to_string())
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// The best score seen by this process, backed by a [`ScoreStore`].
#[derive(Debug, Clone)]
pub struct HighScore {
    best: u32,
    store: ScoreStore,
}

impl HighScore {
    pub fn load(store: ScoreStore) -> Self {
        let best = store.load();
        tracing::info!(best, path = %store.path().display(), "high score loaded");
        Self { best, store }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished session's score. Persists and returns true only for a new record.
    pub fn submit(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        tracing::info!(previous = self.best, score, "new high score");
        self.best = score;
        self.store.save(score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ScoreStore {
        ScoreStore::new(dir.path().join(DEFAULT_HIGH_SCORE_FILE))
    }

    #[test]
    fn missing_file_loads_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), 0);
    }

    #[test]
    fn corrupt_file_loads_zero() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "twelve").unwrap();
        assert_eq!(store.load(), 0);

        fs::write(store.path(), "").unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(340);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "340");
        assert_eq!(store.load(), 340);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "90\n").unwrap();
        assert_eq!(store.load(), 90);
    }

    #[test]
    fn save_to_missing_directory_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::new(dir.path().join("missing").join("score.txt"));
        store.save(10);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn high_score_only_moves_up() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(50);

        let mut high = HighScore::load(store.clone());
        assert_eq!(high.best(), 50);

        assert!(!high.submit(50));
        assert!(!high.submit(20));
        assert_eq!(store.load(), 50);

        assert!(high.submit(70));
        assert_eq!(high.best(), 70);
        assert_eq!(store.load(), 70);
    }
}
