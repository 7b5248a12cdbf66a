use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::session::GRID_SIZES;
use crate::util::{format_stat, on_off};

const PANEL_WIDTH: u16 = 48;
const PANEL_HEIGHT: u16 = 14;

/// Setup view: choose size, mode and feedback, then start
pub fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let selected_style = bold_style.fg(Color::Yellow);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let current = app.setup.grid_size;
    let mut size_spans = vec![Span::styled("Grid size:  ", bold_style)];
    for size in GRID_SIZES {
        let style = if size == current {
            selected_style.add_modifier(Modifier::REVERSED)
        } else {
            dim_style
        };
        size_spans.push(Span::styled(format!(" {size}x{size} "), style));
    }
    // sizes only reachable from the command line or config file
    if !GRID_SIZES.contains(&current) {
        size_spans.push(Span::styled(
            format!(" {current}x{current} "),
            selected_style.add_modifier(Modifier::REVERSED),
        ));
    }

    let lines = vec![
        Line::from(size_spans),
        Line::from(vec![
            Span::styled("Mode:       ", bold_style),
            Span::styled(app.setup.mode.to_string(), selected_style),
        ]),
        Line::from(vec![
            Span::styled("Feedback:   ", bold_style),
            Span::styled(on_off(app.setup.visual_feedback), selected_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "best {}   average {}   last {}",
                format_stat(app.stats.best),
                format_stat(app.stats.average),
                format_stat(app.stats.last)
            ),
            dim_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(←/→) size (m)ode (v) feedback",
            italic_style,
        )),
        Line::from(Span::styled("(enter) start / (esc)ape", italic_style)),
    ];

    let panel = centered(area, PANEL_WIDTH, PANEL_HEIGHT);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Schulte Table")
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: true })
        .render(panel, buf);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::GameMode;
    use crate::stats::Stats;
    use std::sync::mpsc;

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        render_setup(app, area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn shows_current_choices() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx);
        app.setup.mode = GameMode::Reverse;
        app.setup.visual_feedback = false;

        let text = rendered(&app);
        assert!(text.contains("Schulte Table"));
        assert!(text.contains("5x5"));
        assert!(text.contains("Reverse"));
        assert!(text.contains("OFF"));
    }

    #[test]
    fn shows_backend_stats() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx);
        app.stats = Stats {
            best: 10.0,
            average: 15.25,
            last: 12.0,
        };
        let text = rendered(&app);
        assert!(text.contains("best 10.00s"));
        assert!(text.contains("average 15.25s"));
    }

    fn highlighted(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        render_setup(app, area, &mut buffer);
        buffer
            .content()
            .iter()
            .filter(|c| c.modifier.contains(Modifier::REVERSED))
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn highlights_offered_size() {
        let (tx, _rx) = mpsc::channel();
        let app = App::new(Config::default(), tx);
        assert_eq!(highlighted(&app).trim(), "5x5");
    }

    #[test]
    fn highlights_size_outside_the_offered_set() {
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            grid_size: 4,
            ..Config::default()
        };
        let app = App::new(config, tx);

        let text = rendered(&app);
        assert!(text.contains("3x3"));
        assert!(text.contains("7x7"));
        assert_eq!(highlighted(&app).trim(), "4x4");
    }

    #[test]
    fn centered_panel_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 6);
        let panel = centered(area, PANEL_WIDTH, PANEL_HEIGHT);
        assert!(panel.width <= area.width);
        assert!(panel.height <= area.height);
    }
}
