use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;

use snake_classic::{
    Cell, Difficulty, Direction, GameConfig, HighScore, Phase, ScoreStore, Session,
};

const WINDOW_SIZE: i32 = 500;
const HUD_FONT: f32 = 18.0;

const APPLE: Color = Color::new(0.86, 0.08, 0.08, 1.0);
const BONUS_APPLE: Color = Color::new(1.0, 0.65, 0.0, 1.0);
const LEAF: Color = Color::new(0.0, 0.8, 0.0, 1.0);

const SNAKE_COLORS: [(&str, Color); 4] = [
    ("Forest", Color::new(0.13, 0.55, 0.13, 1.0)),
    ("Teal", Color::new(0.0, 0.5, 0.5, 1.0)),
    ("Gold", Color::new(0.85, 0.65, 0.13, 1.0)),
    ("Violet", Color::new(0.58, 0.0, 0.83, 1.0)),
];

#[derive(Parser)]
#[command(name = "snake_classic")]
#[command(version, about = "Classic Snake with a persisted high score")]
struct Cli {
    /// Skip the menu and start at this difficulty
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the high score (overrides the config file)
    #[arg(long)]
    high_score_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(path) = &self.high_score_file {
            config.high_score_file = path.clone();
        }
        Ok(config)
    }
}

struct LobbyState {
    selected: usize,
    color: usize,
}

impl LobbyState {
    const ROWS: usize = Difficulty::ALL.len() + 1;

    fn new(color: usize) -> Self {
        // Medium is preselected.
        Self { selected: 1, color }
    }
}

enum Screen {
    Lobby(LobbyState),
    Playing,
}

/// Screen-space placement of the board: uniform scale, centered.
struct BoardView {
    scale: f32,
    off_x: f32,
    off_y: f32,
}

impl BoardView {
    fn fit(extent: i32) -> Self {
        let sw = screen_width();
        let sh = screen_height();
        let scale = (sw / extent as f32).min(sh / extent as f32);
        let side = scale * extent as f32;
        Self {
            scale,
            off_x: (sw - side) * 0.5,
            off_y: (sh - side) * 0.5,
        }
    }

    fn point(&self, cell: Cell) -> (f32, f32) {
        (
            self.off_x + cell.x as f32 * self.scale,
            self.off_y + cell.y as f32 * self.scale,
        )
    }

    fn draw_apple(&self, cell: Cell, span: f32, tile: f32, color: Color) {
        let (x, y) = self.point(cell);
        let side = span * tile * self.scale;
        draw_circle(x + side * 0.5, y + side * 0.5, side * 0.5, color);
        let leaf = side / 4.0;
        draw_rectangle(x + side / 3.0, y - leaf * 0.5, leaf, leaf, LEAF);
    }
}

fn draw_centered(text: &str, y: f32, size: u16, color: Color) {
    let m = measure_text(text, None, size, 1.0);
    draw_text(text, (screen_width() - m.width) * 0.5, y, size as f32, color);
}

fn draw_session(session: &Session<StdRng>, snake_color: Color) {
    let grid = session.grid();
    let view = BoardView::fit(grid.extent());
    let tile = grid.tile as f32;

    if let Some(cell) = session.regular_item() {
        view.draw_apple(cell, 1.0, tile, APPLE);
    }
    if let Some(anchor) = session.bonus_item() {
        view.draw_apple(anchor, 2.0, tile, BONUS_APPLE);
    }

    let radius = tile * view.scale * 0.5;
    for (i, cell) in session.snake().segments().iter().enumerate() {
        let color = if i == 0 {
            snake_color
        } else {
            Color::from_rgba((50 + i * 2).min(255) as u8, 205, 50, 255)
        };
        let (x, y) = view.point(*cell);
        draw_circle(x + radius, y + radius, radius, color);
    }

    draw_text(&format!("Points: {}", session.score()), 10.0, 20.0, HUD_FONT, WHITE);
    draw_text(
        &format!("Highest Score: {}", session.high_score()),
        10.0,
        40.0,
        HUD_FONT,
        WHITE,
    );
}

fn draw_game_over(session: &Session<StdRng>) {
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::new(0.0, 0.0, 0.0, 0.6));
    let sh = screen_height();
    draw_centered("Game Over", sh / 3.0, 40, RED);
    let points = if session.score() > 0 {
        format!("Points: {}", session.score())
    } else {
        "Better Luck Next Time!".to_string()
    };
    draw_centered(&points, sh / 2.0, 20, WHITE);
    draw_centered(&format!("Highest Score: {}", session.high_score()), sh / 2.0 + 40.0, 20, WHITE);
    draw_centered("Press N for New Game", sh / 2.0 + 70.0, 20, WHITE);
}

fn draw_lobby(lobby: &LobbyState, high_score: u32) {
    let sh = screen_height();
    let mut y = sh * 0.25;
    draw_centered("SNAKE", y, 40, SNAKE_COLORS[lobby.color].1);
    y += 56.0;
    draw_centered("Select Difficulty Level", y, 20, LIGHTGRAY);
    y += 36.0;

    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let color = if lobby.selected == i { WHITE } else { GRAY };
        let line = format!(
            "{} ({} ms)",
            difficulty.label(),
            difficulty.tick_interval().as_millis()
        );
        draw_centered(&line, y, 22, color);
        y += 28.0;
    }

    let color_row = Difficulty::ALL.len();
    let color = if lobby.selected == color_row { WHITE } else { GRAY };
    draw_centered(
        &format!("Snake Color: < {} >", SNAKE_COLORS[lobby.color].0),
        y,
        22,
        color,
    );

    draw_centered(&format!("Highest Score: {high_score}"), sh - 40.0, 20, LIGHTGRAY);
}

/// Directions pressed this frame, in a fixed order.
fn pressed_directions() -> Vec<Direction> {
    let mut directions = Vec::new();
    if is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W) {
        directions.push(Direction::Up);
    }
    if is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S) {
        directions.push(Direction::Down);
    }
    if is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A) {
        directions.push(Direction::Left);
    }
    if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D) {
        directions.push(Direction::Right);
    }
    directions
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake Game".to_owned(),
        window_width: WINDOW_SIZE,
        window_height: WINDOW_SIZE,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.game_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e:#}");
            return;
        }
    };

    let high_score = HighScore::load(ScoreStore::new(config.high_score_file.clone()));
    let mut session = Session::new(config, high_score, StdRng::from_entropy());
    let mut snake_color = 0;

    let mut screen = match cli.difficulty {
        Some(difficulty) => {
            session.start(difficulty.tick_interval());
            Screen::Playing
        }
        None => Screen::Lobby(LobbyState::new(snake_color)),
    };

    loop {
        if is_key_pressed(KeyCode::Q) || is_key_pressed(KeyCode::Escape) {
            break;
        }

        clear_background(BLACK);
        let mut next_screen: Option<Screen> = None;
        match &mut screen {
            Screen::Lobby(lobby) => {
                if is_key_pressed(KeyCode::Up) {
                    lobby.selected = (lobby.selected + LobbyState::ROWS - 1) % LobbyState::ROWS;
                }
                if is_key_pressed(KeyCode::Down) {
                    lobby.selected = (lobby.selected + 1) % LobbyState::ROWS;
                }
                let on_color_row = lobby.selected == Difficulty::ALL.len();
                if on_color_row && is_key_pressed(KeyCode::Left) {
                    lobby.color = (lobby.color + SNAKE_COLORS.len() - 1) % SNAKE_COLORS.len();
                }
                if on_color_row && (is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::Enter)) {
                    lobby.color = (lobby.color + 1) % SNAKE_COLORS.len();
                }
                snake_color = lobby.color;

                if !on_color_row && is_key_pressed(KeyCode::Enter) {
                    let difficulty = Difficulty::ALL[lobby.selected];
                    tracing::info!(difficulty = difficulty.label(), "difficulty selected");
                    session.start(difficulty.tick_interval());
                    next_screen = Some(Screen::Playing);
                }

                draw_lobby(lobby, session.high_score());
            }

            Screen::Playing => {
                match session.phase() {
                    Phase::Running => {
                        for direction in pressed_directions() {
                            session.on_direction_input(direction);
                        }
                    }
                    Phase::GameOver => {
                        if is_key_pressed(KeyCode::N) {
                            session.on_restart_input();
                        }
                    }
                    Phase::Idle => {}
                }

                let dt = Duration::from_secs_f32(get_frame_time().max(0.0));
                session.update(dt);

                draw_session(&session, SNAKE_COLORS[snake_color].1);
                if session.phase() == Phase::GameOver {
                    draw_game_over(&session);
                }
            }
        }

        if let Some(ns) = next_screen {
            screen = ns;
        }

        next_frame().await;
    }
}
