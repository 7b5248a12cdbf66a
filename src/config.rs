use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{is_supported_grid_size, GameMode, SessionConfig, DEFAULT_GRID_SIZE};
use crate::stats::DEFAULT_API_BASE_URL;

pub const API_URL_ENV: &str = "SCHULTE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub grid_size: u32,
    pub mode: GameMode,
    pub visual_feedback: bool,
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            mode: GameMode::Standard,
            visual_feedback: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            grid_size: self.grid_size,
            mode: self.mode,
            visual_feedback: self.visual_feedback,
        }
    }

    /// Remember the setup the player last started with
    pub fn remember(&mut self, session: &SessionConfig) {
        self.grid_size = session.grid_size;
        self.mode = session.mode;
        self.visual_feedback = session.visual_feedback;
    }

    fn sanitized(mut self) -> Self {
        if !is_supported_grid_size(self.grid_size) {
            self.grid_size = DEFAULT_GRID_SIZE;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("schulte_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.sanitized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
