use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Task priority. Defaults to medium when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// A single todo entry.
///
/// Serialized field names are camelCase so snapshots written by older
/// versions of the app load unchanged. `priority`, `category`, `tags` and the
/// timestamps are defaulted on load for snapshots that predate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// Calendar date after which an incomplete task counts as overdue.
    #[serde(default, with = "iso_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    pub fn new(id: i64, draft: TaskDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            text: draft.text.trim().to_string(),
            completed: false,
            deadline: draft.deadline,
            priority: draft.priority,
            category: draft.category,
            tags: dedup_tags(draft.tags),
            created_at: now,
            updated_at: now,
        }
    }

    /// Incomplete and strictly past its deadline, at day granularity.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|d| d < today)
    }
}

/// Input for creating a task, before an id is assigned.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub text: String,
    pub deadline: Option<NaiveDate>,
    pub priority: Priority,
    pub category: String,
    pub tags: Vec<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            text: String::new(),
            deadline: None,
            priority: Priority::default(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
        }
    }
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Fields that can be updated on an existing task. `None` leaves the field
/// untouched; `deadline` is doubly optional so it can be cleared.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub deadline: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.deadline.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

/// Drop duplicate and empty tags, keeping first-seen order.
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Parse a deadline string. Accepts a plain ISO date (`2024-01-01`) as well
/// as a full RFC 3339 datetime, which older snapshots used; the time part is
/// truncated.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = s.parse::<NaiveDate>() {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

mod iso_date {
    use super::parse_iso_date;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse_iso_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid deadline: {}", raw))),
        }
    }
}
