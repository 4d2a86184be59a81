use super::card;
use crate::app::{App, InputMode, Listing};
use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(2) + search(3) + filters(1) + grid(min) + status(1) + footer(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header = Paragraph::new("Movies Quest")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    render_search_bar(app, frame, chunks[1]);
    render_filter_line(app, frame, chunks[2]);
    render_grid(app, frame, chunks[3]);

    // ── Status bar ──
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key_style),
        Span::raw(" Move  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("Space", key_style),
        Span::raw(" Read More  "),
        Span::styled("s", key_style),
        Span::raw(" Sort  "),
        Span::styled("g", key_style),
        Span::raw(" Genre  "),
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(
            format!("{} movies", app.movies.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[4]);

    // ── Footer ──
    let year = chrono::Local::now().year();
    let footer = Paragraph::new(format!("© {} MovieQuest", year))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[5]);
}

fn render_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let label = if app.input_mode == InputMode::Editing {
        " 🔍 (Enter to search, Esc to leave): "
    } else {
        " 🔍 Search movies... (/): "
    };

    // Borders take two columns, the cursor one more
    let room = (area.width as usize).saturating_sub(label.width() + 3);
    let shown = visible_tail(&app.search_text, room);

    let bar = Paragraph::new(format!("{}{}", label, shown))
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(" Search "),
        );
    frame.render_widget(bar, area);

    if app.input_mode == InputMode::Editing {
        let offset = (label.width() + shown.width()).min(u16::MAX as usize) as u16;
        let cursor_x = area.x.saturating_add(1).saturating_add(offset);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Longest suffix of `text` that fits in `max_width` columns.
pub fn visible_tail(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

fn render_filter_line(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" Sort By: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.sort_by.label(), Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("Genre: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.selected_genre_label(), Style::default().fg(Color::White)),
    ];
    if let Listing::Search(query) = &app.listing {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("Results for \"{}\"", query),
            Style::default().fg(Color::Magenta),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// First row to draw so that `selected_row` is fully visible.
pub fn first_visible_row(row_heights: &[u16], selected_row: usize, available: u16) -> usize {
    let mut used = 0u16;
    let mut start = selected_row.min(row_heights.len().saturating_sub(1));
    loop {
        let Some(height) = row_heights.get(start) else {
            return 0;
        };
        used = used.saturating_add(*height);
        if used > available && start < selected_row {
            return start + 1;
        }
        if start == 0 {
            return 0;
        }
        start -= 1;
    }
}

fn render_grid(app: &App, frame: &mut Frame, area: Rect) {
    if app.movies.is_empty() {
        return;
    }

    let columns = app.columns.max(1);
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
    let col_width = area.width / columns as u16;

    let row_heights: Vec<u16> = app
        .movies
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|m| card::card_height(app, m, col_width))
                .max()
                .unwrap_or(1)
        })
        .collect();

    let selected_row = app.selected / columns;
    let start = first_visible_row(&row_heights, selected_row, area.height);

    let mut y = area.y;
    for (row_idx, row) in app.movies.chunks(columns).enumerate().skip(start) {
        if y >= area.bottom() {
            break;
        }
        let height = row_heights[row_idx].min(area.bottom() - y);
        let row_area = Rect::new(area.x, y, area.width, height);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(row_area);

        for (col, movie) in row.iter().enumerate() {
            let index = row_idx * columns + col;
            card::render(app, frame, cells[col], movie, index == app.selected);
        }
        y += height;
    }
}
