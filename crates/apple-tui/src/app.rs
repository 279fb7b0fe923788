use crate::leaderboard::{create_backend_auto, LeaderboardBackend, RankEntry, RANKING_LIMIT};
use crate::render;
use crate::theme::Theme;
use apple_core::{GameSummary, Generator, GeneratorConfig, MatchResult, Position, Session};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Longest accepted nickname
pub const MAX_NICKNAME_LEN: usize = 12;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Nickname entry and start prompt
    Title,
    /// Normal gameplay
    Playing,
    /// Round summary screen
    GameOver,
    /// Ranking screen
    Leaderboard,
}

/// The main application state
pub struct App {
    /// Current round
    pub session: Session,
    /// Board generator, reused across replays
    generator: Generator,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Color theme
    pub theme: Theme,
    /// Player nickname, captured on the title screen
    pub nickname: String,
    /// Keyboard cursor position on the grid
    pub cursor: Position,
    /// Whether a keyboard-driven selection is in flight
    pub keyboard_selecting: bool,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Ranking persistence backend
    backend: Arc<dyn LeaderboardBackend>,
    /// Cached ranking rows for the leaderboard screen
    pub ranking: Vec<RankEntry>,
    /// Error from the last ranking fetch, if any
    pub ranking_error: Option<String>,
    /// Report from the last finished round
    pub last_summary: Option<GameSummary>,
    /// Non-fatal submit failure, surfaced on the summary screen
    pub submit_status: Option<String>,
    /// Grid interior origin in terminal cells, written by the renderer
    pub grid_origin: Option<(u16, u16)>,
    /// Wall-clock anchor for the one-second session tick
    last_second: Instant,
    theme_index: usize,
}

impl App {
    pub fn new(size: usize, time_limit: u32, seed: Option<u64>) -> Self {
        let config = GeneratorConfig {
            size,
            ..GeneratorConfig::default()
        };
        let mut generator = match seed {
            Some(seed) => Generator::with_config_and_seed(config, seed),
            None => Generator::with_config(config),
        };
        let session = Session::with_time_limit(generator.generate(), time_limit);

        Self {
            session,
            generator,
            screen_state: ScreenState::Title,
            theme: Theme::dark(),
            nickname: String::new(),
            cursor: Position::new(size / 2, size / 2),
            keyboard_selecting: false,
            message: None,
            message_timer: 0,
            backend: create_backend_auto(),
            ranking: Vec::new(),
            ranking_error: None,
            last_summary: None,
            submit_status: None,
            grid_origin: None,
            last_second: Instant::now(),
            theme_index: 0,
        }
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            // Fast polling keeps drag selection responsive
            ScreenState::Playing => Duration::from_millis(50),
            ScreenState::Title | ScreenState::GameOver | ScreenState::Leaderboard => {
                Duration::from_millis(100)
            }
        }
    }

    /// Update the message timer and advance the session clock
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.screen_state == ScreenState::Playing {
            // One session tick per elapsed wall-clock second
            while self.last_second.elapsed() >= Duration::from_secs(1) {
                self.session.tick();
                self.last_second += Duration::from_secs(1);
            }
            if self.session.is_over() {
                self.finish_round();
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Title => self.handle_title_key(key),
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::GameOver => self.handle_game_over_key(key),
            ScreenState::Leaderboard => self.handle_leaderboard_key(key),
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter => {
                if self.nickname.trim().is_empty() {
                    self.show_message("Enter a nickname first");
                } else {
                    self.start_round();
                }
            }
            KeyCode::Tab => self.open_leaderboard(),
            KeyCode::Backspace => {
                self.nickname.pop();
            }
            KeyCode::Char(c) => {
                if (c.is_alphanumeric() || c == '-' || c == '_')
                    && self.nickname.len() < MAX_NICKNAME_LEN
                {
                    self.nickname.push(c);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Cursor movement
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Anchor / evaluate a keyboard selection
            KeyCode::Char(' ') => {
                if self.keyboard_selecting {
                    self.keyboard_selecting = false;
                    self.resolve_selection();
                } else {
                    self.session.selection_start(self.cursor.row, self.cursor.col);
                    self.keyboard_selecting = self.session.current_selection().is_some();
                }
            }
            KeyCode::Esc => {
                self.session.selection_cancel();
                self.keyboard_selecting = false;
            }

            KeyCode::Char('r') => self.replay_round(),
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char('r') => self.replay_round(),
            KeyCode::Char('l') => self.open_leaderboard(),
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_leaderboard_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => {
                self.screen_state = if self.last_summary.is_some() {
                    ScreenState::GameOver
                } else {
                    ScreenState::Title
                };
            }
            _ => {}
        }
        AppAction::Continue
    }

    /// Handle a mouse event (drag selection)
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen_state != ScreenState::Playing {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Presses outside the grid are ignored at the boundary
                if let Some(pos) = self.cell_at(mouse.column, mouse.row) {
                    self.keyboard_selecting = false;
                    self.session.selection_start(pos.row, pos.col);
                    self.cursor = pos;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(pos) = self.cell_at(mouse.column, mouse.row) {
                    self.session.selection_update(pos.row, pos.col);
                    self.cursor = pos;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.resolve_selection();
            }
            _ => {}
        }
    }

    /// Evaluate the in-flight selection and react to the outcome
    fn resolve_selection(&mut self) {
        match self.session.selection_end() {
            Some(MatchResult::Matched { cleared }) => {
                self.show_message(&format!("+1 point ({} apples)", cleared.len()));
            }
            Some(MatchResult::NoMatch { sum }) if sum > 0 => {
                self.show_message(&format!("Sum {} - not 10", sum));
            }
            _ => {}
        }
        if self.session.is_over() {
            self.finish_round();
        }
    }

    /// Translate terminal coordinates to a grid cell
    fn cell_at(&self, x: u16, y: u16) -> Option<Position> {
        let (ox, oy) = self.grid_origin?;
        if x < ox || y < oy {
            return None;
        }
        let col = ((x - ox) / render::CELL_W) as usize;
        let row = ((y - oy) / render::CELL_H) as usize;
        let size = self.session.grid().size();
        (row < size && col < size).then_some(Position::new(row, col))
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let size = self.session.grid().size() as isize;
        let row = (self.cursor.row as isize + dr).clamp(0, size - 1);
        let col = (self.cursor.col as isize + dc).clamp(0, size - 1);
        self.cursor = Position::new(row as usize, col as usize);

        if self.keyboard_selecting {
            self.session.selection_update(self.cursor.row, self.cursor.col);
        }
    }

    /// Begin the first round from the title screen
    fn start_round(&mut self) {
        self.session.start();
        self.last_second = Instant::now();
        self.screen_state = ScreenState::Playing;
    }

    /// Regenerate the board and start over
    ///
    /// Resetting the wall-clock anchor here is what keeps a tick meant
    /// for the previous round from landing on the new one.
    fn replay_round(&mut self) {
        self.session.replay(self.generator.generate());
        self.keyboard_selecting = false;
        self.last_summary = None;
        self.submit_status = None;
        self.message = None;
        self.message_timer = 0;
        self.last_second = Instant::now();
        self.screen_state = ScreenState::Playing;
    }

    /// Drain the game-over report and hand it to the ranking backend
    fn finish_round(&mut self) {
        // take_summary yields a value exactly once per round
        if let Some(summary) = self.session.take_summary() {
            self.last_summary = Some(summary);

            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let entry = RankEntry {
                nickname: self.nickname.clone(),
                final_score: summary.final_score,
                match_count: summary.match_count,
                time_remaining: summary.time_remaining,
                timestamp,
                rank: None,
            };

            // A failed write never blocks the game-over flow
            self.submit_status = match self.backend.submit_score(entry) {
                Ok(()) => None,
                Err(e) => Some(format!("Score not saved: {}", e)),
            };

            self.keyboard_selecting = false;
            self.screen_state = ScreenState::GameOver;
        }
    }

    fn open_leaderboard(&mut self) {
        match self.backend.top_scores(RANKING_LIMIT) {
            Ok(entries) => {
                self.ranking = entries;
                self.ranking_error = None;
            }
            Err(e) => {
                self.ranking.clear();
                self.ranking_error = Some(e.to_string());
            }
        }
        self.screen_state = ScreenState::Leaderboard;
    }

    fn cycle_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % 3;
        self.theme = match self.theme_index {
            0 => Theme::dark(),
            1 => Theme::light(),
            _ => Theme::high_contrast(),
        };
    }
}
