pub mod layout;
pub mod screen;
pub mod setup;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::App;
use crate::game::Phase;
use crate::ui::layout::GridGeometry;
use crate::util::{format_secs, format_stat};

const MARGIN: u16 = 1;
const SIDEBAR_WIDTH: u16 = 26;

/// Draw whichever screen matches the current phase
pub fn draw(app: &mut App, f: &mut Frame) {
    app.viewport = f.area();
    screen::current_screen(app.phase()).render(app, f);
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(MARGIN)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Where the board goes for a given terminal area
pub fn board_area(viewport: Rect) -> Rect {
    split(viewport).1
}

/// Playing and finished views: sidebar plus board
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (sidebar, board) = split(area);
        render_sidebar(self, sidebar, buf);
        render_board(self, board, buf);
    }
}

fn render_sidebar(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let game = &app.game;
    let finished = game.phase() == Phase::Finished;

    let find = if finished {
        Span::styled("Done!", bold_style.fg(Color::Green))
    } else {
        Span::styled(game.current_target().to_string(), bold_style.fg(Color::Yellow))
    };

    let mut lines = vec![
        Line::from(vec![Span::styled("Find: ", bold_style), find]),
        Line::from(vec![
            Span::styled("Time: ", bold_style),
            Span::styled(format_secs(game.elapsed()), bold_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{0}x{0} {1}",
                game.config().grid_size,
                game.config().mode
            ),
            dim_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("best    {}", format_stat(app.stats.best)),
            dim_style,
        )),
        Line::from(Span::styled(
            format!("average {}", format_stat(app.stats.average)),
            dim_style,
        )),
        Line::from(Span::styled(
            format!("last    {}", format_stat(app.stats.last)),
            dim_style,
        )),
        Line::from(""),
    ];

    lines.push(Line::from(Span::styled(
        if finished {
            "(r)eset / (esc)ape"
        } else {
            "arrows + enter or mouse / (r)eset / (esc)ape"
        },
        italic_style,
    )));

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Schulte"))
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let game = &app.game;
    let Some(grid) = game.grid() else {
        return;
    };
    let geometry = GridGeometry::new(area, grid.size());
    if !geometry.fits() {
        Paragraph::new("terminal too small")
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let found_style = Style::default().fg(Color::Green).add_modifier(Modifier::DIM);
    let bordered = geometry.cell_height() >= 3 && geometry.cell_width() >= 4;

    for (index, &num) in grid.cells().iter().enumerate() {
        let Some(rect) = geometry.cell_rect(index) else {
            continue;
        };

        let mut style = if game.shows_found(num) {
            found_style
        } else {
            bold_style
        };
        if game.phase() == Phase::Playing && index == app.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let mut cell = Paragraph::new(Span::styled(num.to_string(), style))
            .alignment(Alignment::Center);
        if bordered {
            cell = cell.block(Block::default().borders(Borders::ALL).border_style(style));
        }
        cell.render(rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::SessionConfig;
    use std::sync::mpsc;
    use std::time::Instant;

    fn playing_app(grid_size: u32) -> App {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(Config::default(), tx);
        app.setup = SessionConfig {
            grid_size,
            ..SessionConfig::default()
        };
        app.start_session();
        app
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn playing_view_shows_target_and_time() {
        let app = playing_app(3);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Find: 1"));
        assert!(text.contains("Time: 0.0s"));
        assert!(text.contains("3x3 Standard"));
    }

    #[test]
    fn board_renders_every_number() {
        let app = playing_app(3);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        for n in 1..=9 {
            assert!(text.contains(&n.to_string()), "missing {n}");
        }
    }

    #[test]
    fn finished_view_says_done() {
        let mut app = playing_app(3);
        let now = Instant::now();
        for num in 1..=9 {
            app.game.click(num, now);
        }
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Find: Done!"));
        assert!(text.contains("(r)eset"));
    }

    #[test]
    fn stats_show_dash_until_loaded() {
        let mut app = playing_app(3);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("best    -"));

        app.stats.best = 7.5;
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("best    7.50s"));
    }

    #[test]
    fn small_area_does_not_panic() {
        let app = playing_app(7);
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn board_area_sits_right_of_sidebar() {
        let board = board_area(Rect::new(0, 0, 100, 30));
        assert_eq!(board.x, MARGIN + SIDEBAR_WIDTH);
        assert_eq!(board.y, MARGIN);
    }
}
