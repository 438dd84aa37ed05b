//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical persisted task record.
//! - Normalize and validate caller input before it reaches storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty in every stored record.
//! - `status` is exactly one of `pending` | `completed`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task, generated by the persistence layer at
/// creation time.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Two-state task lifecycle.
///
/// Either state may transition to either state, including itself; there is
/// no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not finished.
    #[default]
    Pending,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Canonical storage/wire string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parses caller-supplied status text.
    ///
    /// # Errors
    /// - `TaskValidationError::InvalidStatus` for anything other than the
    ///   exact strings `pending` or `completed`.
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(TaskValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical persisted task record.
///
/// Timestamps are unix epoch milliseconds and are owned by the storage
/// engine: `created_at` is set once at insert, `updated_at` is refreshed on
/// every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID.
    pub id: TaskId,
    /// Non-empty trimmed title.
    pub title: String,
    /// Optional free-form text; absent rather than blank.
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Validated title/description input for create and full-update paths.
///
/// Construction is the validation boundary: holding a `TaskDraft` means the
/// title invariant holds and the description is normalized, so repositories
/// accept drafts rather than raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
}

impl TaskDraft {
    /// Normalizes and validates caller input.
    ///
    /// - `title` is trimmed; empty or whitespace-only input is rejected.
    /// - `description` is trimmed; blank input normalizes to `None`.
    pub fn new(
        title: &str,
        description: Option<&str>,
    ) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::TitleRequired);
        }

        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(Self {
            title: title.to_string(),
            description,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Caller-input error detected before any storage access is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    TitleRequired,
    InvalidStatus(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Title is required"),
            Self::InvalidStatus(_) => write!(f, "Invalid status"),
        }
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::{TaskDraft, TaskStatus, TaskValidationError};

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(TaskStatus::parse("pending").unwrap(), TaskStatus::Pending);
        assert_eq!(
            TaskStatus::parse("completed").unwrap(),
            TaskStatus::Completed
        );
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn status_parse_rejects_unknown_and_non_canonical_values() {
        for value in ["", "done", "PENDING", " pending", "Completed"] {
            let err = TaskStatus::parse(value).unwrap_err();
            assert_eq!(err, TaskValidationError::InvalidStatus(value.to_string()));
        }
    }

    #[test]
    fn draft_trims_title_and_description() {
        let draft = TaskDraft::new("  Buy milk  ", Some("  2%  ")).unwrap();
        assert_eq!(draft.title(), "Buy milk");
        assert_eq!(draft.description(), Some("2%"));
    }

    #[test]
    fn draft_normalizes_blank_description_to_none() {
        let missing = TaskDraft::new("task", None).unwrap();
        assert_eq!(missing.description(), None);

        let blank = TaskDraft::new("task", Some("   ")).unwrap();
        assert_eq!(blank.description(), None);
    }

    #[test]
    fn draft_rejects_empty_or_whitespace_title() {
        for title in ["", "   ", "\t\n"] {
            let err = TaskDraft::new(title, Some("detail")).unwrap_err();
            assert_eq!(err, TaskValidationError::TitleRequired);
        }
    }
}
