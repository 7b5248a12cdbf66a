use rand::Rng;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::grid::Grid;
use crate::runtime::GameEvent;
use crate::session::SessionConfig;
use crate::stats::ScoreSubmission;
use crate::timer::{RunningTimer, TickHandle, TICK_RATE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Wrong number, or not playing: nothing changed
    Ignored,
    /// Correct number; the cursor moved on
    Advanced,
    /// Correct terminal number; the session is over and this score goes out once
    Finished(ScoreSubmission),
}

/// Where ticks for a running session are delivered
#[derive(Debug, Clone)]
struct TickSink {
    events: Sender<GameEvent>,
    interval: Duration,
}

/// One Schulte-table game: setup, play, result
#[derive(Debug)]
pub struct Game {
    config: SessionConfig,
    phase: Phase,
    grid: Option<Grid>,
    current_target: u32,
    elapsed: f64,
    timer: Option<RunningTimer>,
    tick_sink: Option<TickSink>,
}

impl Game {
    /// A game that only updates `elapsed` when `on_tick` is called by hand
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            phase: Phase::Setup,
            grid: None,
            current_target: 1,
            elapsed: 0.0,
            timer: None,
            tick_sink: None,
        }
    }

    /// A game whose running timer pushes `GameEvent::Tick` into `events`
    pub fn with_ticks(events: Sender<GameEvent>) -> Self {
        Self {
            tick_sink: Some(TickSink {
                events,
                interval: Duration::from_millis(TICK_RATE_MS),
            }),
            ..Self::new()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn current_target(&self) -> u32 {
        self.current_target
    }

    /// Seconds on the clock; frozen once finished
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Setup -> Playing. Returns false (and changes nothing) outside Setup.
    pub fn start<R: Rng + ?Sized>(&mut self, config: SessionConfig, rng: &mut R) -> bool {
        if self.phase != Phase::Setup {
            return false;
        }
        self.config = config;
        self.grid = Some(Grid::shuffled(config.grid_size, rng));
        self.current_target = config.mode.initial_target(config.cell_count());
        self.elapsed = 0.0;
        self.timer = None;
        self.phase = Phase::Playing;
        true
    }

    pub fn click(&mut self, num: u32, now: Instant) -> ClickOutcome {
        if self.phase != Phase::Playing {
            return ClickOutcome::Ignored;
        }
        let cells = self.config.cell_count();
        let mode = self.config.mode;

        if num == mode.initial_target(cells) && self.timer.is_none() {
            let ticks = self
                .tick_sink
                .as_ref()
                .map(|sink| TickHandle::spawn(sink.interval, sink.events.clone()));
            self.timer = Some(RunningTimer::start(now, ticks));
        }

        if num != self.current_target {
            return ClickOutcome::Ignored;
        }

        if num == mode.terminal_target(cells) {
            ClickOutcome::Finished(self.finish(now))
        } else {
            self.current_target = mode.next_target(num);
            ClickOutcome::Advanced
        }
    }

    /// Click whatever number sits at `index` in the grid
    pub fn click_cell(&mut self, index: usize, now: Instant) -> ClickOutcome {
        match self.grid.as_ref().and_then(|g| g.get(index)) {
            Some(num) => self.click(num, now),
            None => ClickOutcome::Ignored,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.phase != Phase::Playing {
            return;
        }
        if let Some(timer) = &self.timer {
            self.elapsed = timer.elapsed_secs(now);
        }
    }

    fn finish(&mut self, now: Instant) -> ScoreSubmission {
        // dropping the timer releases its tick handle
        if let Some(timer) = self.timer.take() {
            self.elapsed = timer.elapsed_secs(now);
        }
        self.phase = Phase::Finished;
        ScoreSubmission {
            time_taken: self.elapsed,
            grid_size: self.config.grid_size,
        }
    }

    /// Playing/Finished -> Setup. Returns false in Setup.
    pub fn reset(&mut self) -> bool {
        if self.phase == Phase::Setup {
            return false;
        }
        self.timer = None;
        self.grid = None;
        self.elapsed = 0.0;
        self.current_target = self.config.mode.initial_target(self.config.cell_count());
        self.phase = Phase::Setup;
        true
    }

    /// Derived from the cursor, never stored per cell
    pub fn is_found(&self, num: u32) -> bool {
        match self.phase {
            Phase::Setup => false,
            Phase::Playing => self.config.mode.is_behind(num, self.current_target),
            Phase::Finished => true,
        }
    }

    /// Presentation-only: found status, if the player asked to see it
    pub fn shows_found(&self, num: u32) -> bool {
        self.config.visual_feedback && self.is_found(num)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
