/// Derived task view: status filter, text search, sort
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Task;

/// Status filter for the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl StatusFilter {
    /// Cycle order used by the TUI filter key.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::Overdue,
            StatusFilter::Overdue => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
            StatusFilter::Overdue => "overdue",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" | "active" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "overdue" => Ok(StatusFilter::Overdue),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

/// Sort mode for the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending by deadline, tasks without one last.
    #[default]
    Date,
    /// Case-insensitive ascending by text.
    Alphabetical,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Date => SortMode::Alphabetical,
            SortMode::Alphabetical => SortMode::Date,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Date => "date",
            SortMode::Alphabetical => "alphabetical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "alphabetical" | "alpha" => Ok(SortMode::Alphabetical),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// Transient view state. Never persisted; every start uses the defaults.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub filter: StatusFilter,
    pub search: String,
    pub sort: SortMode,
}

/// Compute the displayed task sequence from a snapshot of the collection.
///
/// Pure: narrows by status, then by search text, then orders with a stable
/// sort. Tasks are cloned, never mutated. `today` is passed in so overdue is
/// decidable without reading the clock.
pub fn compute_view(
    tasks: &[Task],
    filter: StatusFilter,
    search: &str,
    sort: SortMode,
    today: NaiveDate,
) -> Vec<Task> {
    let mut result: Vec<Task> = tasks
        .iter()
        .filter(|task| match filter {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Overdue => task.is_overdue(today),
        })
        .cloned()
        .collect();

    let search = search.trim().to_lowercase();
    if !search.is_empty() {
        result.retain(|task| task.text.to_lowercase().contains(&search));
    }

    // Vec::sort_by is stable, so deadline ties and deadline-less tasks keep
    // their input order.
    match sort {
        SortMode::Alphabetical => {
            result.sort_by(|a, b| a.text.to_lowercase().cmp(&b.text.to_lowercase()));
        }
        SortMode::Date => {
            result.sort_by(|a, b| match (a.deadline, b.deadline) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, text: &str, deadline: Option<NaiveDate>, completed: bool) -> Task {
        let mut draft = TaskDraft::new(text);
        draft.deadline = deadline;
        let mut task = Task::new(id, draft);
        task.completed = completed;
        task
    }

    fn today() -> NaiveDate {
        date(2024, 6, 1)
    }

    #[test]
    fn test_all_filter_passes_everything() {
        let tasks = vec![
            task(1, "a", None, false),
            task(2, "b", Some(date(2024, 1, 1)), true),
        ];
        let view = compute_view(&tasks, StatusFilter::All, "", SortMode::Date, today());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_pending_and_completed_split_on_flag() {
        let tasks = vec![task(1, "a", None, false), task(2, "b", None, true)];

        let pending = compute_view(&tasks, StatusFilter::Pending, "", SortMode::Date, today());
        assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        let completed = compute_view(&tasks, StatusFilter::Completed, "", SortMode::Date, today());
        assert_eq!(completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_overdue_never_includes_completed() {
        let past = Some(date(2024, 1, 1));
        let tasks = vec![
            task(1, "incomplete past", past, false),
            task(2, "complete past", past, true),
            task(3, "incomplete future", Some(date(2025, 1, 1)), false),
            task(4, "no deadline", None, false),
        ];

        let view = compute_view(&tasks, StatusFilter::Overdue, "", SortMode::Date, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let tasks = vec![
            task(1, "Buy MILK", None, false),
            task(2, "Call dentist", None, false),
        ];

        let view = compute_view(&tasks, StatusFilter::All, "milk", SortMode::Date, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        let view = compute_view(&tasks, StatusFilter::All, "DENT", SortMode::Date, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_blank_search_disables_text_filter() {
        let tasks = vec![task(1, "a", None, false), task(2, "b", None, false)];
        let view = compute_view(&tasks, StatusFilter::All, "   ", SortMode::Date, today());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_search_applies_after_status_filter() {
        let tasks = vec![
            task(1, "milk run", None, true),
            task(2, "milk run again", None, false),
        ];
        let view = compute_view(&tasks, StatusFilter::Pending, "milk", SortMode::Date, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_date_sort_puts_missing_deadlines_last() {
        let tasks = vec![
            task(1, "none one", None, false),
            task(2, "late", Some(date(2024, 12, 1)), false),
            task(3, "none two", None, false),
            task(4, "early", Some(date(2024, 2, 1)), false),
        ];

        let view = compute_view(&tasks, StatusFilter::All, "", SortMode::Date, today());
        // Dated ascending first, then the deadline-less in input order.
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_date_sort_is_stable_for_equal_deadlines() {
        let d = Some(date(2024, 3, 3));
        let tasks = vec![
            task(1, "first", d, false),
            task(2, "second", d, false),
            task(3, "third", d, false),
        ];

        let view = compute_view(&tasks, StatusFilter::All, "", SortMode::Date, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_alphabetical_sort_ignores_case() {
        let tasks = vec![
            task(1, "banana", None, false),
            task(2, "Apple", None, false),
            task(3, "cherry", None, false),
        ];

        let view = compute_view(&tasks, StatusFilter::All, "", SortMode::Alphabetical, today());
        assert_eq!(view.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn test_view_does_not_mutate_input() {
        let tasks = vec![
            task(1, "b", None, false),
            task(2, "a", Some(date(2024, 1, 1)), false),
        ];
        let before = tasks.clone();
        compute_view(&tasks, StatusFilter::All, "a", SortMode::Alphabetical, today());
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_filter_and_sort_cycles() {
        assert_eq!(StatusFilter::All.next(), StatusFilter::Pending);
        assert_eq!(StatusFilter::Overdue.next(), StatusFilter::All);
        assert_eq!(SortMode::Date.next(), SortMode::Alphabetical);
        assert_eq!(SortMode::Alphabetical.next(), SortMode::Date);
    }

    #[test]
    fn test_filter_parses_aliases() {
        assert_eq!("active".parse::<StatusFilter>(), Ok(StatusFilter::Pending));
        assert_eq!("done".parse::<StatusFilter>(), Ok(StatusFilter::Completed));
        assert_eq!("alpha".parse::<SortMode>(), Ok(SortMode::Alphabetical));
        assert!("latest".parse::<SortMode>().is_err());
    }
}
