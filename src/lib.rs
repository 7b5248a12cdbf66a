// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod diagnostics;
pub mod game;
pub mod grid;
pub mod history;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;
pub mod util;
