use crate::app::App;
use crate::model::Movie;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Rows taken by the rating line, the Read More hint and the borders.
const CARD_CHROME: u16 = 4;

/// Number of lines `text` takes when greedily word-wrapped at `width` columns.
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut total = 0u16;
    for line in text.lines() {
        let mut rows = 1u16;
        let mut used = 0usize;
        for word in line.split_whitespace() {
            let w = word.width();
            let needed = if used == 0 { w } else { used + 1 + w };
            if needed <= width {
                used = needed;
            } else if used == 0 {
                // A single word wider than the card spills over several rows.
                rows = rows.saturating_add((w.div_ceil(width) - 1) as u16);
                used = last_row_width(w, width);
            } else {
                rows = rows.saturating_add(1);
                used = w;
                if w > width {
                    rows = rows.saturating_add((w.div_ceil(width) - 1) as u16);
                    used = last_row_width(w, width);
                }
            }
        }
        total = total.saturating_add(rows);
    }
    total.max(1)
}

/// Columns used on the last row by a word that spans several rows.
fn last_row_width(w: usize, width: usize) -> usize {
    match w % width {
        0 => width,
        rest => rest,
    }
}

/// Total height of a card for `movie` at the given outer width.
pub fn card_height(app: &App, movie: &Movie, width: u16) -> u16 {
    let inner = width.saturating_sub(2);
    let description = app.description_for(movie);
    let poster_lines = wrapped_height(&app.poster_url_for(movie), inner);
    wrapped_height(&description, inner) + poster_lines + CARD_CHROME
}

pub fn render(app: &App, frame: &mut Frame, area: Rect, movie: &Movie, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", movie.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![Line::from(vec![
        Span::styled("★ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            movie.rating_label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ])];

    // One line per paragraph so the drawn height agrees with `wrapped_height`.
    let description = app.description_for(movie);
    let description_style = Style::default().fg(Color::Gray);
    let mut paragraphs = description.lines().peekable();
    if paragraphs.peek().is_none() {
        lines.push(Line::from(""));
    }
    for paragraph in paragraphs {
        lines.push(Line::from(Span::styled(paragraph.to_string(), description_style)));
    }

    if movie.has_long_description() {
        let label = if app.is_expanded(movie.id) { "Read Less" } else { "Read More" };
        let key = if selected { "[Space] " } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{}{}", key, label),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        app.poster_url_for(movie),
        Style::default().fg(Color::DarkGray),
    )));

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(card, area);
}
