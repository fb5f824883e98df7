pub mod task;

pub use task::{DEFAULT_CATEGORY, Priority, Task, TaskDraft, TaskPatch, dedup_tags, parse_iso_date};
