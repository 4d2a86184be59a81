mod browser;
mod card;
mod help;
mod picker;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    browser::render(app, frame);

    if let Some(p) = app.picker {
        picker::render(app, frame, p);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Action, FetchOutcome, InputMode, ResponseOrdering};
    use crate::model::{Genre, Movie, PosterUrls};
    use ratatui::{Terminal, backend::TestBackend};

    fn app_with_movies() -> App {
        let mut app = App::new(
            PosterUrls {
                image_base: "https://image.tmdb.org/t/p".to_string(),
                size: "w300".to_string(),
                placeholder: "https://via.placeholder.com/300x450?text=No+Image".to_string(),
            },
            ResponseOrdering::LatestRequest,
        );
        let requests = app.dispatch(Action::Started);
        app.dispatch(Action::FetchSucceeded {
            request: requests[0].clone(),
            outcome: FetchOutcome::Genres(vec![Genre { id: 28, name: "Action".to_string() }]),
        });
        app.dispatch(Action::FetchSucceeded {
            request: requests[1].clone(),
            outcome: FetchOutcome::Movies(vec![
                Movie {
                    id: 1,
                    title: "Arrival".to_string(),
                    overview: Some("L".repeat(120)),
                    poster_path: Some("/arrival.jpg".to_string()),
                    vote_average: 7.6,
                },
                Movie {
                    id: 2,
                    title: "Blank".to_string(),
                    overview: None,
                    poster_path: None,
                    vote_average: 0.0,
                },
            ]),
        });
        app
    }

    fn screen_text(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_render_shows_cards() {
        let mut app = app_with_movies();
        app.update_columns(100);
        let text = screen_text(&app, 100, 40);
        assert!(text.contains("Movies Quest"));
        assert!(text.contains("Arrival"));
        assert!(text.contains("7.6/10"));
        assert!(text.contains("Read More"));
        assert!(text.contains("No description available."));
        assert!(text.contains("Popularity Descending"));
        assert!(text.contains("All Genres"));
    }

    #[test]
    fn test_render_genre_picker() {
        let mut app = app_with_movies();
        app.open_genre_picker();
        let text = screen_text(&app, 100, 40);
        assert!(text.contains("Action"));
    }

    #[test]
    fn test_render_expanded_card_offers_read_less() {
        let mut app = app_with_movies();
        app.update_columns(100);
        app.dispatch(Action::ExpansionToggled(1));
        let text = screen_text(&app, 100, 40);
        assert!(text.contains("Read Less"));
        assert!(text.contains(&"L".repeat(40)));
    }

    #[test]
    fn test_render_very_long_search_text_shows_its_end() {
        let mut app = app_with_movies();
        app.input_mode = InputMode::Editing;
        app.dispatch(Action::SearchChanged(format!("{}END", "a".repeat(65_520))));
        let text = screen_text(&app, 100, 40);
        assert!(text.contains("aaaEND"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let app = app_with_movies();
        screen_text(&app, 10, 5);
    }

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 50, parent);
        assert!(rect.x >= parent.x && rect.right() <= parent.right());
        assert!(rect.y >= parent.y && rect.bottom() <= parent.bottom());
        assert_eq!(rect.width, 50);
    }
}
