use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::centered_rect;

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", key), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Render the help overlay
pub fn render(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings (any key to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left = vec![
        section("Navigation"),
        Line::from(""),
        key_line("j, ↓", "next task"),
        key_line("k, ↑", "previous task"),
        key_line("g / G", "first / last task"),
        key_line("q", "quit"),
        Line::from(""),
        section("Tasks"),
        Line::from(""),
        key_line("a", "add task"),
        key_line("e", "edit selected task"),
        key_line("t, Enter", "toggle complete"),
        key_line("d", "delete selected task"),
        key_line("x", "mark/unmark for bulk ops"),
        key_line("D", "delete marked tasks"),
        key_line("C", "complete marked tasks"),
    ];

    let right = vec![
        section("View"),
        Line::from(""),
        key_line("f", "cycle filter (all/pending/completed/overdue)"),
        key_line("s", "toggle sort (date/alphabetical)"),
        key_line("/", "search"),
        key_line("Esc", "clear marks, then search"),
        Line::from(""),
        section("Quick-add syntax"),
        Line::from(""),
        key_line("@DATE", "deadline, e.g. @2024-06-01"),
        key_line("!PRIO", "!low, !medium or !high"),
        key_line("#tag", "add a tag (repeatable)"),
        key_line("+Cat", "category from the configured set"),
    ];

    f.render_widget(Paragraph::new(left), columns[0]);
    f.render_widget(Paragraph::new(right), columns[1]);
}
