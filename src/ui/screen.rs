use ratatui::Frame;

use crate::app::App;
use crate::game::Phase;
use crate::ui::setup::render_setup;

/// A UI screen boundary: one per game phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Setup screen - size, mode and feedback choices
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_setup(app, f.area(), f.buffer_mut());
    }
}

/// Board screen - shared by playing and finished, the sidebar tells them apart
pub struct BoardScreen;

impl Screen for BoardScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Setup => Box::new(SetupScreen),
        Phase::Playing | Phase::Finished => Box::new(BoardScreen),
    }
}
