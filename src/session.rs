use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

use crate::config::GameConfig;
use crate::grid::{BONUS_SPAN, Cell, Direction, Grid};
use crate::score_store::HighScore;
use crate::snake::Snake;
use crate::spawn::Spawner;

pub const REGULAR_POINTS: u32 = 10;
pub const BONUS_POINTS: u32 = 20;
/// Most ticks a single `update` will run; older backlog is dropped.
pub const MAX_TICKS_PER_UPDATE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Regular,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    HitWall,
    HitSelf,
    /// No free cell left for a regular item.
    BoardFull,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub consumed: Option<Item>,
    pub game_over: Option<GameOverReason>,
}

/// Fixed-interval timer fed with frame time.
#[derive(Debug, Clone, Default)]
struct Ticker {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl Ticker {
    fn start(&mut self, interval: Duration) {
        self.interval = interval;
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    fn accumulate(&mut self, dt: Duration) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Consume one interval's worth of accumulated time, if available.
    fn take_tick(&mut self) -> bool {
        if !self.running || self.interval.is_zero() || self.elapsed < self.interval {
            return false;
        }
        self.elapsed -= self.interval;
        true
    }

    /// Forget whole intervals still owed, keeping the partial one.
    fn drop_backlog(&mut self) {
        while self.take_tick() {}
    }
}

/// One game of Snake: lifecycle, scoring, and the state a renderer needs.
pub struct Session<R> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    spawner: Spawner<R>,
    regular: Option<Cell>,
    bonus: Option<Cell>,
    score: u32,
    high_score: HighScore,
    phase: Phase,
    last_reason: Option<GameOverReason>,
    tick_interval: Duration,
    ticker: Ticker,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, high_score: HighScore, rng: R) -> Self {
        let grid = config.grid();
        Self {
            snake: Snake::new(grid, config.initial_length),
            spawner: Spawner::new(rng, grid, config.bonus_one_in),
            grid,
            regular: None,
            bonus: None,
            score: 0,
            high_score,
            phase: Phase::Idle,
            last_reason: None,
            tick_interval: Duration::ZERO,
            ticker: Ticker::default(),
            config,
        }
    }

    /// Begin a fresh game ticking every `tick_interval`. Any running game is discarded.
    pub fn start(&mut self, tick_interval: Duration) {
        self.ticker.stop();
        self.snake.reset(self.config.initial_length);
        self.score = 0;
        self.bonus = None;
        self.regular = None;
        self.last_reason = None;
        self.tick_interval = tick_interval;
        self.phase = Phase::Running;

        if !self.respawn_items() {
            self.end(GameOverReason::BoardFull);
            return;
        }
        self.ticker.start(tick_interval);
        tracing::info!(
            tick_interval_ms = tick_interval.as_millis() as u64,
            "session started"
        );
    }

    /// Feed elapsed frame time; runs the ticks that came due, at most
    /// `MAX_TICKS_PER_UPDATE` of them. A longer stall is coalesced, not replayed.
    pub fn update(&mut self, dt: Duration) -> Vec<TickReport> {
        self.ticker.accumulate(dt);
        let mut reports = Vec::new();
        while reports.len() < MAX_TICKS_PER_UPDATE && self.ticker.take_tick() {
            reports.push(self.on_tick());
        }
        if reports.len() == MAX_TICKS_PER_UPDATE {
            self.ticker.drop_backlog();
        }
        reports
    }

    /// Advance the simulation one step. Does nothing unless running.
    pub fn on_tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.phase != Phase::Running {
            return report;
        }

        self.snake.advance();
        let head = self.snake.head();

        if self.regular == Some(head) {
            report.consumed = Some(Item::Regular);
        } else if let Some(anchor) = self.bonus {
            if self.grid.footprint_contains(anchor, BONUS_SPAN, head) {
                report.consumed = Some(Item::Bonus);
            }
        }

        if let Some(item) = report.consumed {
            let points = match item {
                Item::Regular => REGULAR_POINTS,
                Item::Bonus => {
                    self.bonus = None;
                    BONUS_POINTS
                }
            };
            self.score += points;
            self.snake.grow();
            tracing::debug!(?item, score = self.score, length = self.snake.len(), "item consumed");
            if !self.respawn_items() {
                report.game_over = Some(GameOverReason::BoardFull);
            }
        }

        if self.snake.check_wall_collision() {
            report.game_over = Some(GameOverReason::HitWall);
        } else if self.snake.check_self_collision() {
            report.game_over = Some(GameOverReason::HitSelf);
        }

        if let Some(reason) = report.game_over {
            self.end(reason);
        }
        report
    }

    /// Buffer a turn. Only honored while running.
    pub fn on_direction_input(&mut self, direction: Direction) -> bool {
        self.phase == Phase::Running && self.snake.set_heading(direction)
    }

    /// Start over at the previous tick interval. Only honored after a game over.
    pub fn on_restart_input(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.start(self.tick_interval);
        true
    }

    /// Move the regular item; returns false when the board has no free cell.
    fn respawn_items(&mut self) -> bool {
        let mut occupied: HashSet<Cell> = self.snake.segments().iter().copied().collect();
        if let Some(anchor) = self.bonus {
            occupied.extend(self.grid.footprint(anchor, BONUS_SPAN));
        }
        self.regular = self.spawner.spawn_regular(&occupied);
        let Some(regular) = self.regular else {
            return false;
        };

        if self.bonus.is_none() {
            occupied.insert(regular);
            self.bonus = self.spawner.maybe_spawn_bonus(&occupied, false);
        }
        true
    }

    fn end(&mut self, reason: GameOverReason) {
        self.ticker.stop();
        self.phase = Phase::GameOver;
        self.last_reason = Some(reason);
        let record = self.high_score.submit(self.score);
        tracing::info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            new_record = record,
            "game over"
        );
    }

    /// Place items by hand, for scripted scenarios.
    pub fn debug_place_items(&mut self, regular: Option<Cell>, bonus: Option<Cell>) {
        self.regular = regular;
        self.bonus = bonus;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn regular_item(&self) -> Option<Cell> {
        self.regular
    }

    pub fn bonus_item(&self) -> Option<Cell> {
        self.bonus
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn last_reason(&self) -> Option<GameOverReason> {
        self.last_reason
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
