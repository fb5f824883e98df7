use crate::app::{App, Mode};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar: mode badge, view state, counts
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => ("NORMAL", Color::Green),
        Mode::Insert => ("INSERT", Color::Yellow),
        Mode::Edit => ("EDIT", Color::Yellow),
        Mode::Search => ("SEARCH", Color::Cyan),
        Mode::Confirm => ("CONFIRM", Color::Magenta),
        Mode::Help => ("HELP", Color::Blue),
    };

    let search_display = if app.mode == Mode::Search || !app.view.search.is_empty() {
        format!(" /{}", app.view.search)
    } else {
        String::new()
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(search_display),
        Span::raw(format!(
            " | filter: {} | sort: {} | {}/{} tasks ",
            app.view.filter,
            app.view.sort,
            app.visible.len(),
            app.store.len()
        )),
        Span::styled(
            if app.marked.is_empty() {
                String::new()
            } else {
                format!("| {} marked ", app.marked.len())
            },
            Style::default().fg(Color::Yellow),
        ),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
