use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, ConfirmAction, Mode};
use crate::ui::centered_rect;

/// Render the add/edit input dialog
pub fn render_input_dialog(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 30, f.area());
    f.render_widget(Clear, area);

    let title = match app.mode {
        Mode::Edit => "  Edit task  ",
        _ => "  New task  ",
    };

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(76, 86, 106)))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // hint
            Constraint::Length(3), // input
            Constraint::Min(0),
        ])
        .split(inner);

    let hint = Paragraph::new("text @YYYY-MM-DD !low|!high #tag +Category — Enter submits, Esc cancels")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)));
    f.render_widget(hint, chunks[0]);

    f.render_widget(&app.input, chunks[1]);
}

/// Render the yes/no confirmation dialog
pub fn render_confirm_dialog(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);

    let message = match &app.pending_confirm {
        Some(ConfirmAction::DeleteTask(id)) => {
            let text = app
                .store
                .get(*id)
                .map(|t| t.text.clone())
                .unwrap_or_default();
            format!("Delete \"{}\"?", text)
        }
        Some(ConfirmAction::DeleteMarked) => {
            format!("Delete {} marked task(s)?", app.marked.len())
        }
        None => return,
    };

    let block = Block::default()
        .title("  Confirm  ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    f.render_widget(text, chunks[0]);

    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);
    let unselected = Style::default().fg(Color::Gray);

    let buttons = Line::from(vec![
        Span::styled(
            "  Yes  ",
            if app.confirm_yes { selected } else { unselected },
        ),
        Span::raw("   "),
        Span::styled(
            "  No  ",
            if app.confirm_yes { unselected } else { selected },
        ),
    ]);
    let buttons = Paragraph::new(buttons).alignment(Alignment::Center);
    f.render_widget(buttons, chunks[1]);
}
