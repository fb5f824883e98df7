pub mod dialogs;
pub mod help;
pub mod list;
pub mod statusbar;

use crate::app::{App, Mode, Notification, NotificationLevel};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // task list
            Constraint::Length(1), // statusbar
        ])
        .split(f.area());

    list::render(f, main_chunks[0], app);
    statusbar::render(f, main_chunks[1], app);

    match app.mode {
        Mode::Insert | Mode::Edit => dialogs::render_input_dialog(f, app),
        Mode::Confirm => dialogs::render_confirm_dialog(f, app),
        Mode::Help => help::render(f, f.area()),
        _ => {}
    }

    if let Some(ref notification) = app.notification {
        render_notification(f, f.area(), notification);
    }
}

/// Notification bar across the top
fn render_notification(f: &mut Frame, area: Rect, notification: &Notification) {
    let notification_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 3,
    };

    let (bg_color, fg_color, prefix) = match notification.level {
        NotificationLevel::Info => (Color::Blue, Color::White, "ℹ"),
        NotificationLevel::Success => (Color::Green, Color::White, "✓"),
        NotificationLevel::Warning => (Color::Yellow, Color::Black, "⚠"),
        NotificationLevel::Error => (Color::Red, Color::White, "✗"),
    };

    let content = Line::from(vec![
        Span::styled(
            format!(" {} ", prefix),
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&notification.message, Style::default().fg(fg_color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(bg_color))
        .style(Style::default().bg(bg_color));

    f.render_widget(Paragraph::new(content).block(block), notification_area);
}

/// Centered rect helper for dialogs and overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
