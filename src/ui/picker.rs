use super::centered_rect;
use crate::app::{App, Picker};
use crate::model::SortBy;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

pub fn render(app: &App, frame: &mut Frame, picker: Picker) {
    let (title, labels, current, cursor): (&str, Vec<String>, usize, usize) = match picker {
        Picker::Sort { cursor } => (
            " Sort By ",
            SortBy::ALL.iter().map(|s| s.label().to_string()).collect(),
            app.sort_by.index(),
            cursor,
        ),
        Picker::Genre { cursor } => {
            let options = app.genre_options();
            let current = options
                .iter()
                .position(|o| o.id == app.selected_genre)
                .unwrap_or(0);
            (
                " Genre ",
                options.into_iter().map(|o| o.label).collect(),
                current,
                cursor,
            )
        }
    };

    let area = centered_rect(40, 60, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = if i == current { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, label))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_bottom(
                    Line::from(" Enter select · Esc cancel ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(cursor));
    frame.render_stateful_widget(list, area, &mut state);
}
