use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;
use crate::models::{DEFAULT_CATEGORY, Priority, Task};

/// Render the task list
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" doable — {} ", app.view.filter);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded);

    if app.visible.is_empty() {
        let message = if app.store.is_empty() {
            "No tasks yet — press 'a' to add one"
        } else {
            "No tasks match the current filter or search"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let today = Local::now().date_naive();
    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|task| ListItem::new(task_line(task, app.marked.contains(&task.id), today)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// One display line per task: mark, checkbox, priority, text, then deadline,
/// tags and category annotations.
fn task_line(task: &Task, marked: bool, today: chrono::NaiveDate) -> Line<'_> {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        if marked { "* " } else { "  " },
        Style::default().fg(Color::Yellow),
    ));

    spans.push(Span::styled(
        if task.completed { "[x] " } else { "[ ] " },
        Style::default().fg(if task.completed {
            Color::Green
        } else {
            Color::DarkGray
        }),
    ));

    match task.priority {
        Priority::High => spans.push(Span::styled("! ", Style::default().fg(Color::Red))),
        Priority::Low => spans.push(Span::styled(". ", Style::default().fg(Color::DarkGray))),
        Priority::Medium => spans.push(Span::raw("  ")),
    }

    let text_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    spans.push(Span::styled(task.text.as_str(), text_style));

    if let Some(deadline) = task.deadline {
        let style = if task.is_overdue(today) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        };
        spans.push(Span::styled(
            format!("  @{}", deadline.format("%Y-%m-%d")),
            style,
        ));
    }

    for tag in &task.tags {
        spans.push(Span::styled(
            format!("  #{}", tag),
            Style::default().fg(Color::Magenta),
        ));
    }

    if task.category != DEFAULT_CATEGORY {
        spans.push(Span::styled(
            format!("  +{}", task.category),
            Style::default().fg(Color::Cyan),
        ));
    }

    Line::from(spans)
}
