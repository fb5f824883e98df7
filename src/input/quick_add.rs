/// Quick-add syntax: one input line carrying a task's attributes
///
/// `Buy milk @2024-06-01 !high #errand +Shopping` — `@` marks the deadline,
/// `!` the priority, `#` a tag (repeatable), `+` the category. Everything
/// else is the task text, in order.
use anyhow::{Result, bail};

use crate::models::{DEFAULT_CATEGORY, Priority, TaskDraft, parse_iso_date};

/// Parse a quick-add line into a task draft.
///
/// Marker tokens may appear anywhere; later `@`/`!`/`+` tokens override
/// earlier ones. The category is taken verbatim here and normalized against
/// the configured set by the caller.
pub fn parse_quick_add(input: &str) -> Result<TaskDraft> {
    let mut draft = TaskDraft::default();
    let mut text_parts: Vec<&str> = Vec::new();

    for token in input.split_whitespace() {
        if let Some(raw) = token.strip_prefix('@') {
            if raw.is_empty() {
                bail!("missing date after '@'");
            }
            match parse_iso_date(raw) {
                Some(date) => draft.deadline = Some(date),
                None => bail!("invalid deadline '{}', expected YYYY-MM-DD", raw),
            }
        } else if let Some(raw) = token.strip_prefix('!') {
            match raw.parse::<Priority>() {
                Ok(priority) => draft.priority = priority,
                Err(_) => bail!("invalid priority '{}', expected low, medium or high", raw),
            }
        } else if let Some(raw) = token.strip_prefix('#') {
            if !raw.is_empty() {
                draft.tags.push(raw.to_string());
            }
        } else if let Some(raw) = token.strip_prefix('+') {
            if !raw.is_empty() {
                draft.category = raw.to_string();
            }
        } else {
            text_parts.push(token);
        }
    }

    draft.text = text_parts.join(" ");
    Ok(draft)
}

/// Render a task's attributes back into quick-add form, used to prefill the
/// edit dialog. Defaulted attributes are omitted.
pub fn to_quick_add_line(
    text: &str,
    deadline: Option<chrono::NaiveDate>,
    priority: Priority,
    category: &str,
    tags: &[String],
) -> String {
    let mut line = text.to_string();

    if let Some(date) = deadline {
        line.push_str(&format!(" @{}", date.format("%Y-%m-%d")));
    }
    if priority != Priority::Medium {
        line.push_str(&format!(" !{}", priority));
    }
    for tag in tags {
        line.push_str(&format!(" #{}", tag));
    }
    if category != DEFAULT_CATEGORY {
        line.push_str(&format!(" +{}", category));
    }

    line
}
