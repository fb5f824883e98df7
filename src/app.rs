use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use std::time::Instant;
use tui_textarea::TextArea;

use crate::config::Config;
use crate::input::quick_add::{parse_quick_add, to_quick_add_line};
use crate::models::{Task, TaskPatch};
use crate::storage::FileStorage;
use crate::store::TaskStore;
use crate::view::{ViewState, compute_view};

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Notification message shown at the top of the screen
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// Expired notifications disappear after 3 seconds
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and single-key commands
    Normal,
    /// Adding a new task via the input dialog
    Insert,
    /// Editing the selected task via the input dialog
    Edit,
    /// Incremental search input
    Search,
    /// Yes/no confirmation dialog
    Confirm,
    /// Keybinding help overlay
    Help,
}

/// Pending action behind a confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(i64),
    DeleteMarked,
}

/// Application state
pub struct App {
    /// Canonical task collection
    pub store: TaskStore,
    /// Active filter, search text and sort mode
    pub view: ViewState,
    /// Derived list currently displayed, recomputed after every change
    pub visible: Vec<Task>,
    /// Selected index into `visible`
    pub selected: usize,
    /// Ids marked for bulk operations
    pub marked: HashSet<i64>,
    /// Current mode
    pub mode: Mode,
    /// Input widget for the add/edit dialog
    pub input: TextArea<'static>,
    /// Task being edited, if the dialog was opened with `e`
    pub editing_id: Option<i64>,
    /// Action awaiting confirmation
    pub pending_confirm: Option<ConfirmAction>,
    /// Whether "yes" is highlighted in the confirmation dialog
    pub confirm_yes: bool,
    /// Notification message
    pub notification: Option<Notification>,
    /// Application configuration
    pub config: Config,
}

impl App {
    /// Create the app: load config-resolved storage and the saved snapshot.
    pub fn new(config: Config) -> Result<Self> {
        let storage = FileStorage::new(config.data_dir());
        let store = TaskStore::load(Box::new(storage))?;
        Ok(Self::with_store(store, config))
    }

    /// Build the app around an already-loaded store. Tests use this with
    /// in-memory storage.
    pub fn with_store(store: TaskStore, config: Config) -> Self {
        let mut app = Self {
            store,
            view: ViewState::default(),
            visible: Vec::new(),
            selected: 0,
            marked: HashSet::new(),
            mode: Mode::Normal,
            input: TextArea::default(),
            editing_id: None,
            pending_confirm: None,
            confirm_yes: false,
            notification: None,
            config,
        };
        app.refresh_view();
        app
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crate::input::handle_key_input;
        handle_key_input(self, key)
    }

    /// Recompute the derived view and keep the selection in bounds.
    pub fn refresh_view(&mut self) {
        let today = Local::now().date_naive();
        self.visible = compute_view(
            self.store.tasks(),
            self.view.filter,
            &self.view.search,
            self.view.sort,
            today,
        );
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        let store = &self.store;
        self.marked.retain(|id| store.get(*id).is_some());
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible.get(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, last as isize) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    // ------------------------------------------------------------------
    // Dialog entry points
    // ------------------------------------------------------------------

    pub fn begin_insert(&mut self) {
        self.input = TextArea::default();
        self.editing_id = None;
        self.mode = Mode::Insert;
    }

    pub fn begin_edit(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let line = to_quick_add_line(
            &task.text,
            task.deadline,
            task.priority,
            &task.category,
            &task.tags,
        );
        self.editing_id = Some(task.id);
        self.input = TextArea::from([line]);
        self.input.move_cursor(tui_textarea::CursorMove::End);
        self.mode = Mode::Edit;
    }

    pub fn cancel_input(&mut self) {
        self.input = TextArea::default();
        self.editing_id = None;
        self.mode = Mode::Normal;
    }

    /// Parse the dialog line and add or update. On a validation error the
    /// dialog stays open so the input can be fixed.
    pub fn submit_input(&mut self) {
        let line = self.input.lines().join(" ");

        let mut draft = match parse_quick_add(&line) {
            Ok(draft) => draft,
            Err(e) => {
                self.show_notification(e.to_string(), NotificationLevel::Error);
                return;
            }
        };
        draft.category = self.config.normalize_category(&draft.category);

        let result = match self.editing_id {
            None => self.store.add_draft(draft).map(|task| {
                format!("Added \"{}\"", task.text)
            }),
            Some(id) => {
                let patch = TaskPatch {
                    text: Some(draft.text),
                    deadline: Some(draft.deadline),
                    priority: Some(draft.priority),
                    category: Some(draft.category),
                    tags: Some(draft.tags),
                };
                self.store.update(id, patch).map(|_| "Task updated".to_string())
            }
        };

        match result {
            Ok(message) => {
                self.cancel_input();
                self.refresh_view();
                self.show_notification(message, NotificationLevel::Success);
            }
            Err(e) => {
                self.show_notification(e.to_string(), NotificationLevel::Error);
            }
        }
    }

    // ------------------------------------------------------------------
    // Task commands
    // ------------------------------------------------------------------

    pub fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        if let Err(e) = self.store.toggle_complete(id) {
            self.show_notification(e.to_string(), NotificationLevel::Error);
        }
        self.refresh_view();
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.pending_confirm = Some(ConfirmAction::DeleteTask(task.id));
            self.confirm_yes = false;
            self.mode = Mode::Confirm;
        }
    }

    pub fn request_delete_marked(&mut self) {
        if self.marked.is_empty() {
            self.show_notification(
                "No tasks marked (mark with x)".to_string(),
                NotificationLevel::Warning,
            );
            return;
        }
        self.pending_confirm = Some(ConfirmAction::DeleteMarked);
        self.confirm_yes = false;
        self.mode = Mode::Confirm;
    }

    /// Run the action behind the confirmation dialog.
    pub fn execute_confirmed(&mut self) {
        let action = self.pending_confirm.take();
        self.mode = Mode::Normal;

        let result = match action {
            Some(ConfirmAction::DeleteTask(id)) => {
                self.store.delete(id).map(|_| "Task deleted".to_string())
            }
            Some(ConfirmAction::DeleteMarked) => {
                let count = self.marked.len();
                self.store
                    .bulk_delete(&self.marked.clone())
                    .map(|_| format!("Deleted {} task(s)", count))
            }
            None => return,
        };

        match result {
            Ok(message) => {
                self.marked.clear();
                self.refresh_view();
                self.show_notification(message, NotificationLevel::Success);
            }
            Err(e) => self.show_notification(e.to_string(), NotificationLevel::Error),
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.pending_confirm = None;
        self.mode = Mode::Normal;
    }

    pub fn toggle_mark(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
        self.move_selection(1);
    }

    pub fn complete_marked(&mut self) {
        if self.marked.is_empty() {
            self.show_notification(
                "No tasks marked (mark with x)".to_string(),
                NotificationLevel::Warning,
            );
            return;
        }
        let count = self.marked.len();
        match self.store.bulk_complete(&self.marked.clone()) {
            Ok(()) => {
                self.marked.clear();
                self.refresh_view();
                self.show_notification(
                    format!("Completed {} task(s)", count),
                    NotificationLevel::Success,
                );
            }
            Err(e) => self.show_notification(e.to_string(), NotificationLevel::Error),
        }
    }

    // ------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------

    pub fn cycle_filter(&mut self) {
        self.view.filter = self.view.filter.next();
        self.refresh_view();
        self.show_notification(
            format!("Filter: {}", self.view.filter),
            NotificationLevel::Info,
        );
    }

    pub fn cycle_sort(&mut self) {
        self.view.sort = self.view.sort.next();
        self.refresh_view();
        self.show_notification(format!("Sort: {}", self.view.sort), NotificationLevel::Info);
    }

    pub fn begin_search(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn push_search(&mut self, c: char) {
        self.view.search.push(c);
        self.refresh_view();
    }

    pub fn pop_search(&mut self) {
        self.view.search.pop();
        self.refresh_view();
    }

    pub fn clear_search(&mut self) {
        self.view.search.clear();
        self.mode = Mode::Normal;
        self.refresh_view();
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn test_app() -> App {
        let store = TaskStore::load(Box::new(MemoryStorage::new())).unwrap();
        App::with_store(store, Config::default())
    }

    #[test]
    fn test_submit_insert_adds_task_and_refreshes_view() {
        let mut app = test_app();
        app.begin_insert();
        app.input.insert_str("Buy milk @2024-06-01 +shopping");
        app.submit_input();

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.visible[0].text, "Buy milk");
        // Category normalized against the configured set.
        assert_eq!(app.visible[0].category, "Shopping");
    }

    #[test]
    fn test_submit_empty_text_keeps_dialog_open() {
        let mut app = test_app();
        app.begin_insert();
        app.input.insert_str("   ");
        app.submit_input();

        assert_eq!(app.mode, Mode::Insert);
        assert_eq!(app.store.len(), 0);
        assert!(matches!(
            app.notification,
            Some(Notification {
                level: NotificationLevel::Error,
                ..
            })
        ));
    }

    #[test]
    fn test_edit_prefills_and_applies_patch() {
        let mut app = test_app();
        app.store.add("Old text", None).unwrap();
        app.refresh_view();

        app.begin_edit();
        assert_eq!(app.input.lines().join(""), "Old text");

        app.input.select_all();
        app.input.cut();
        app.input.insert_str("New text !high");
        app.submit_input();

        assert_eq!(app.store.tasks()[0].text, "New text");
        assert_eq!(
            app.store.tasks()[0].priority,
            crate::models::Priority::High
        );
    }

    #[test]
    fn test_confirmed_delete_removes_selected() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.store.add("b", None).unwrap();
        app.refresh_view();

        app.request_delete_selected();
        assert_eq!(app.mode, Mode::Confirm);
        app.execute_confirmed();

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_cancelled_confirm_changes_nothing() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.refresh_view();

        app.request_delete_selected();
        app.cancel_confirm();

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.pending_confirm, None);
    }

    #[test]
    fn test_mark_and_complete_marked() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.store.add("b", None).unwrap();
        app.store.add("c", None).unwrap();
        app.refresh_view();

        app.toggle_mark(); // marks first, moves down
        app.toggle_mark(); // marks second
        app.complete_marked();

        let completed: Vec<bool> = app.store.tasks().iter().map(|t| t.completed).collect();
        assert_eq!(completed.iter().filter(|c| **c).count(), 2);
        assert!(app.marked.is_empty());
    }

    #[test]
    fn test_search_narrows_incrementally() {
        let mut app = test_app();
        app.store.add("Buy milk", None).unwrap();
        app.store.add("Call dentist", None).unwrap();
        app.refresh_view();

        app.begin_search();
        app.push_search('m');
        app.push_search('i');
        app.push_search('l');
        assert_eq!(app.visible.len(), 1);

        app.pop_search();
        app.pop_search();
        app.pop_search();
        assert_eq!(app.visible.len(), 2);
    }

    #[test]
    fn test_selection_clamps_when_view_shrinks() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.store.add("b", None).unwrap();
        app.refresh_view();
        app.select_last();

        let id = app.visible[1].id;
        app.store.delete(id).unwrap();
        app.refresh_view();

        assert_eq!(app.selected, 0);
    }
}
