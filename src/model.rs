//! Task entity and its derived state.
//!
//! A [`Task`] is created with [`Task::new`], which leaves the ID at `0`; the
//! store assigns the real ID when the task is added.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Task importance, ordered `Low < Medium < High`.
///
/// Stored as the integers 1, 2 and 3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(
                "priority must be between 1 (Low) and 3 (High)".to_string(),
            )),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a task is presented to the user.
///
/// Completion wins over the due date: a completed task is never shown as
/// overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Overdue,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Overdue => "overdue",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the store; `0` until the task has been added.
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "zero_time")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "zero_time")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Minutes spent, only ever increases.
    #[serde(default)]
    pub time_spent: u64,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project: impl Into<String>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            project: project.into(),
            priority,
            due_date,
            created_at: Utc::now(),
            completed_at: None,
            time_spent: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// True iff a due date is set and lies strictly before `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> TaskStatus {
        if self.is_completed() {
            TaskStatus::Done
        } else if self.is_overdue_at(now) {
            TaskStatus::Overdue
        } else {
            TaskStatus::Pending
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status_at(Utc::now())
    }

    /// Mark the task completed now. Completing again moves the timestamp.
    pub fn complete(&mut self) {
        self.complete_at(Utc::now());
    }

    pub fn complete_at(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }

    pub fn add_time_spent(&mut self, minutes: u64) {
        self.time_spent = self.time_spent.saturating_add(minutes);
    }

    /// Due date as `YYYY-MM-DD`, or `-` when unset.
    pub fn due_label(&self) -> String {
        format_date(self.due_date)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} [{}] Due: {} ({} min spent)",
            self.status(),
            self.title,
            self.project,
            self.due_label(),
            self.time_spent
        )
    }
}

/// Format an optional timestamp as `YYYY-MM-DD`, or `-` when unset.
pub fn format_date(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Optional timestamps stored as RFC 3339 strings, with the year-one zero
/// timestamp standing in for "unset".
mod zero_time {
    use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub const ZERO: &str = "0001-01-01T00:00:00Z";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            // RFC 3339 has no room for signed or five-digit years.
            Some(ts) if !(1..=9999).contains(&ts.year()) => Err(ser::Error::custom(format!(
                "timestamp year {} is outside 1..=9999",
                ts.year()
            ))),
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_str(ZERO),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let parsed = DateTime::parse_from_rfc3339(raw.trim()).map_err(de::Error::custom)?;
        let zero = NaiveDate::from_ymd_opt(1, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        if Some(parsed.naive_local()) == zero {
            return Ok(None);
        }
        Ok(Some(parsed.with_timezone(&Utc)))
    }
}
