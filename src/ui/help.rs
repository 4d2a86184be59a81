use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(keys, Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("  Global"),
        binding("    ?         ", "Toggle this help"),
        binding("    q         ", "Quit application"),
        binding("    Ctrl+C    ", "Quit from anywhere"),
        Line::from(""),
        section("  Browsing"),
        binding("    ←↑↓→/hjkl ", "Move between movie cards"),
        binding("    Home/End  ", "First / last movie"),
        binding("    Space     ", "Read More / Read Less on the selected card"),
        binding("    s         ", "Choose sort order"),
        binding("    g         ", "Choose genre (All Genres clears the filter)"),
        Line::from(""),
        section("  Search"),
        binding("    /         ", "Edit the search text"),
        binding("    Enter     ", "Search (empty text does nothing)"),
        binding("    Esc       ", "Stop editing without searching"),
        Line::from(""),
        section("  Pickers"),
        binding("    ↑/↓       ", "Move"),
        binding("    Enter     ", "Apply"),
        binding("    Esc       ", "Cancel"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
