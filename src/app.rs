use chrono::Local;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{Config, ConfigStore};
use crate::game::{ClickOutcome, Game, Phase};
use crate::history::{ResultRecord, ResultsLog};
use crate::runtime::GameEvent;
use crate::session::{SessionConfig, GRID_SIZES};
use crate::stats::{ScoreSubmission, Stats, StatsSync};
use crate::ui::layout::GridGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Arrow-key movement of the highlighted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub struct App {
    pub config: Config,
    /// The setup form being edited; copied into the game on start
    pub setup: SessionConfig,
    pub game: Game,
    pub stats: Stats,
    /// Highlighted cell index for keyboard play
    pub selected: usize,
    /// Last drawn terminal area, used to map mouse clicks onto cells
    pub viewport: Rect,
    stats_sync: Option<StatsSync>,
    results_log: Option<ResultsLog>,
    config_store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(config: Config, events: Sender<GameEvent>) -> Self {
        Self {
            setup: config.session_config(),
            config,
            game: Game::with_ticks(events),
            stats: Stats::default(),
            selected: 0,
            viewport: Rect::default(),
            stats_sync: None,
            results_log: None,
            config_store: None,
        }
    }

    pub fn with_stats_sync(mut self, sync: StatsSync) -> Self {
        self.stats_sync = Some(sync);
        self
    }

    pub fn with_results_log(mut self, log: ResultsLog) -> Self {
        self.results_log = Some(log);
        self
    }

    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    /// Kick off the initial stats fetch; the result arrives as an event
    pub fn load_stats(&self) {
        if let Some(sync) = &self.stats_sync {
            sync.refresh();
        }
    }

    pub fn handle_event(&mut self, event: GameEvent, now: Instant) -> Flow {
        match event {
            GameEvent::Key(key) => self.on_key(key, now),
            GameEvent::Mouse(mouse) => {
                self.on_mouse(mouse, now);
                Flow::Continue
            }
            GameEvent::Tick => {
                self.game.on_tick(now);
                Flow::Continue
            }
            GameEvent::Stats(stats) => {
                self.stats = stats;
                Flow::Continue
            }
            GameEvent::Resize => Flow::Continue,
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.game.phase() {
            Phase::Setup => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Left => self.setup.cycle_grid_size(false),
                KeyCode::Right => self.setup.cycle_grid_size(true),
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(size) = c.to_digit(10).filter(|d| GRID_SIZES.contains(d)) {
                        self.setup.grid_size = size;
                    }
                }
                KeyCode::Char('m') => self.setup.mode = self.setup.mode.toggle(),
                KeyCode::Char('v') => self.setup.visual_feedback = !self.setup.visual_feedback,
                KeyCode::Enter | KeyCode::Char(' ') => self.start_session(),
                _ => {}
            },
            Phase::Playing => match key.code {
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Char('r') => self.reset(),
                KeyCode::Up => self.move_selection(Direction::Up),
                KeyCode::Down => self.move_selection(Direction::Down),
                KeyCode::Left => self.move_selection(Direction::Left),
                KeyCode::Right => self.move_selection(Direction::Right),
                KeyCode::Enter | KeyCode::Char(' ') => self.click_cell(self.selected, now),
                _ => {}
            },
            Phase::Finished => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Char('r') | KeyCode::Enter => self.reset(),
                _ => {}
            },
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.phase() != Phase::Playing {
            return;
        }
        let geometry = GridGeometry::new(
            crate::ui::board_area(self.viewport),
            self.game.config().grid_size,
        );
        if let Some(index) = geometry.cell_at(mouse.column, mouse.row) {
            self.selected = index;
            self.click_cell(index, now);
        }
    }

    pub fn start_session(&mut self) {
        let setup = self.setup;
        if !self.game.start(setup, &mut rand::thread_rng()) {
            return;
        }
        self.selected = 0;
        self.config.remember(&setup);
        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&self.config) {
                warn!("saving config failed: {e}");
            }
        }
    }

    pub fn reset(&mut self) {
        if self.game.reset() {
            self.selected = 0;
        }
    }

    pub fn click_cell(&mut self, index: usize, now: Instant) {
        if let ClickOutcome::Finished(score) = self.game.click_cell(index, now) {
            self.on_finished(score);
        }
    }

    fn on_finished(&mut self, score: ScoreSubmission) {
        info!(
            grid_size = score.grid_size,
            mode = %self.game.config().mode,
            time_taken = score.time_taken,
            "session finished"
        );

        if let Some(log) = &self.results_log {
            let record = ResultRecord {
                date: Local::now(),
                grid_size: score.grid_size,
                mode: self.game.config().mode,
                elapsed_secs: score.time_taken,
            };
            if let Err(e) = log.append(&record) {
                warn!("writing results log failed: {e:#}");
            }
        }

        if let Some(sync) = &self.stats_sync {
            sync.submit(score);
        }
    }

    pub fn move_selection(&mut self, direction: Direction) {
        let n = self.game.config().grid_size as usize;
        if n == 0 {
            return;
        }
        let (row, col) = (self.selected / n, self.selected % n);
        let (row, col) = match direction {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(n - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(n - 1)),
        };
        self.selected = row * n + col;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfigStore;
    use crate::diagnostics::{subscriber, CapturedLogs};
    use crate::session::GameMode;
    use crossterm::event::KeyEvent;
    use std::sync::mpsc;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> GameEvent {
        GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel();
        App::new(Config::default(), tx)
    }

    fn index_of(app: &App, num: u32) -> usize {
        app.game
            .grid()
            .and_then(|g| g.cells().iter().position(|&n| n == num))
            .unwrap()
    }

    #[test]
    fn setup_keys_edit_the_form() {
        let mut app = test_app();
        let now = Instant::now();
        app.handle_event(key(KeyCode::Right), now);
        assert_eq!(app.setup.grid_size, 7);
        app.handle_event(key(KeyCode::Char('3')), now);
        assert_eq!(app.setup.grid_size, 3);
        app.handle_event(key(KeyCode::Char('4')), now);
        assert_eq!(app.setup.grid_size, 3);
        app.handle_event(key(KeyCode::Char('m')), now);
        assert_eq!(app.setup.mode, GameMode::Reverse);
        app.handle_event(key(KeyCode::Char('v')), now);
        assert!(!app.setup.visual_feedback);
        assert_eq!(app.phase(), Phase::Setup);
    }

    #[test]
    fn enter_starts_and_r_resets() {
        let mut app = test_app();
        let now = Instant::now();
        app.handle_event(key(KeyCode::Enter), now);
        assert_eq!(app.phase(), Phase::Playing);
        assert_eq!(app.game.config().grid_size, 5);

        // setup edits during play don't reach the running game
        app.handle_event(key(KeyCode::Char('m')), now);
        assert_eq!(app.game.config().mode, GameMode::Standard);

        app.handle_event(key(KeyCode::Char('r')), now);
        assert_eq!(app.phase(), Phase::Setup);
        assert!(app.game.grid().is_none());
    }

    #[test]
    fn keyboard_play_to_finish() {
        let mut app = test_app();
        app.setup.grid_size = 3;
        let now = Instant::now();
        app.handle_event(key(KeyCode::Enter), now);

        for num in 1..=9 {
            app.selected = index_of(&app, num);
            app.handle_event(key(KeyCode::Char(' ')), now);
        }
        assert_eq!(app.phase(), Phase::Finished);

        app.handle_event(key(KeyCode::Enter), now);
        assert_eq!(app.phase(), Phase::Setup);
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut app = test_app();
        app.setup.grid_size = 3;
        app.start_session();

        app.move_selection(Direction::Up);
        app.move_selection(Direction::Left);
        assert_eq!(app.selected, 0);
        app.move_selection(Direction::Right);
        app.move_selection(Direction::Down);
        assert_eq!(app.selected, 4);
        for _ in 0..5 {
            app.move_selection(Direction::Right);
            app.move_selection(Direction::Down);
        }
        assert_eq!(app.selected, 8);
    }

    #[test]
    fn quit_keys() {
        let mut app = test_app();
        let now = Instant::now();
        assert_eq!(app.handle_event(key(KeyCode::Char('q')), now), Flow::Quit);
        let ctrl_c = GameEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.handle_event(ctrl_c, now), Flow::Quit);

        app.start_session();
        // 'q' is not bound while playing
        assert_eq!(app.handle_event(key(KeyCode::Char('q')), now), Flow::Continue);
        assert_eq!(app.handle_event(key(KeyCode::Esc), now), Flow::Quit);
    }

    #[test]
    fn stats_events_replace_cached_stats() {
        let mut app = test_app();
        let stats = Stats {
            best: 4.0,
            average: 6.0,
            last: 5.0,
        };
        app.handle_event(GameEvent::Stats(stats), Instant::now());
        assert_eq!(app.stats, stats);
    }

    #[test]
    fn mouse_click_hits_cell() {
        let mut app = test_app();
        app.setup.grid_size = 3;
        app.viewport = Rect::new(0, 0, 100, 30);
        app.start_session();

        let target = index_of(&app, 1);
        let geometry = GridGeometry::new(crate::ui::board_area(app.viewport), 3);
        let cell = geometry.cell_rect(target).unwrap();
        let click = GameEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: cell.x + 1,
            row: cell.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        app.handle_event(click, Instant::now());

        assert_eq!(app.selected, target);
        assert_eq!(app.game.current_target(), 2);
        assert!(app.game.timer_running());
    }

    #[test]
    fn finishing_writes_results_and_saves_config() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("results.csv");
        let config_path = dir.path().join("config.json");
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx)
            .with_results_log(ResultsLog::with_path(&results))
            .with_config_store(Box::new(FileConfigStore::with_path(&config_path)));
        app.setup.grid_size = 3;
        app.setup.mode = GameMode::Reverse;
        app.start_session();

        let saved = FileConfigStore::with_path(&config_path).load();
        assert_eq!(saved.grid_size, 3);
        assert_eq!(saved.mode, GameMode::Reverse);

        let now = Instant::now();
        for num in (1..=9).rev() {
            let idx = index_of(&app, num);
            app.click_cell(idx, now);
        }
        assert_eq!(app.phase(), Phase::Finished);

        let rows = ResultsLog::with_path(&results).read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].grid_size, 3);
        assert_eq!(rows[0].mode, GameMode::Reverse);
    }

    #[test]
    fn finishing_logs_the_session() {
        let logs = CapturedLogs::default();
        let mut app = test_app();
        app.setup.grid_size = 3;
        app.start_session();

        let now = Instant::now();
        tracing::subscriber::with_default(subscriber(logs.clone()), || {
            for num in 1..=9 {
                let idx = index_of(&app, num);
                app.click_cell(idx, now);
            }
        });

        let contents = logs.contents();
        assert!(contents.contains("INFO session finished"));
        assert!(contents.contains("grid_size=3"));
        assert!(contents.contains("mode=Standard"));
    }
}
