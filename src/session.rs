use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Grid sizes offered on the setup screen
pub const GRID_SIZES: [u32; 3] = [3, 5, 7];
pub const DEFAULT_GRID_SIZE: u32 = 5;
/// Largest grid the terminal layout is expected to fit
pub const MAX_GRID_SIZE: u32 = 9;
pub const MIN_GRID_SIZE: u32 = 2;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Standard,
    Reverse,
}

impl GameMode {
    /// The first number to find in a grid of `cell_count` cells
    pub fn initial_target(self, cell_count: u32) -> u32 {
        match self {
            GameMode::Standard => 1,
            GameMode::Reverse => cell_count,
        }
    }

    /// The number whose click ends the session
    pub fn terminal_target(self, cell_count: u32) -> u32 {
        match self {
            GameMode::Standard => cell_count,
            GameMode::Reverse => 1,
        }
    }

    pub fn next_target(self, current: u32) -> u32 {
        match self {
            GameMode::Standard => current + 1,
            GameMode::Reverse => current.saturating_sub(1),
        }
    }

    /// Whether `num` lies behind the cursor, i.e. has already been found
    pub fn is_behind(self, num: u32, current: u32) -> bool {
        match self {
            GameMode::Standard => num < current,
            GameMode::Reverse => num > current,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            GameMode::Standard => GameMode::Reverse,
            GameMode::Reverse => GameMode::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub grid_size: u32,
    pub mode: GameMode,
    /// Cosmetic only: highlights found cells, never affects game logic
    pub visual_feedback: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            mode: GameMode::Standard,
            visual_feedback: true,
        }
    }
}

impl SessionConfig {
    pub fn cell_count(&self) -> u32 {
        self.grid_size * self.grid_size
    }

    /// Step through the offered sizes; sizes outside the list snap to the nearest offered one
    pub fn cycle_grid_size(&mut self, forward: bool) {
        let pos = GRID_SIZES.iter().position(|&s| s == self.grid_size);
        let next = match (pos, forward) {
            (Some(i), true) => (i + 1) % GRID_SIZES.len(),
            (Some(i), false) => (i + GRID_SIZES.len() - 1) % GRID_SIZES.len(),
            (None, _) => GRID_SIZES
                .iter()
                .position(|&s| s >= self.grid_size)
                .unwrap_or(GRID_SIZES.len() - 1),
        };
        self.grid_size = GRID_SIZES[next];
    }
}

pub fn is_supported_grid_size(size: u32) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size)
}
