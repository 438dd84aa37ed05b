//! Task use-case service.
//!
//! # Responsibility
//! - Provide the five task operations: list, create, set-status, update,
//!   delete.
//! - Validate caller input before any storage access.
//! - Map storage failures to fixed, generic per-operation errors.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Storage failure causes are logged, never exposed in returned errors.
//! - The change signal fires after every successful mutation and only then.

use crate::model::task::{Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskChange, TaskRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Which storage-backed operation failed.
///
/// Carried instead of the underlying cause so callers and tests can match
/// structurally while the user-visible message stays generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Fetch,
    Create,
    Update,
    Delete,
}

/// Task service error taxonomy: caller-input rejection or a storage failure
/// reduced to the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(TaskValidationError),
    Storage(StorageOp),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(StorageOp::Fetch) => write!(f, "Failed to fetch tasks"),
            Self::Storage(StorageOp::Create) => write!(f, "Failed to create task"),
            Self::Storage(StorageOp::Update) => write!(f, "Failed to update task"),
            Self::Storage(StorageOp::Delete) => write!(f, "Failed to delete task"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            // The storage cause is logged at the failure site and
            // deliberately not retained here.
            Self::Storage(_) => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Payload-less "data changed" notification fired after successful
/// mutations, consumed by presentation-tier caches.
pub trait ChangeSignal {
    fn data_changed(&self);
}

/// No-op signal for callers without a cache to invalidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSignal;

impl ChangeSignal for NullSignal {
    fn data_changed(&self) {}
}

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<R: TaskRepository, S: ChangeSignal = NullSignal> {
    repo: R,
    signal: S,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service without a change-signal consumer.
    pub fn new(repo: R) -> Self {
        Self::with_signal(repo, NullSignal)
    }
}

impl<R: TaskRepository, S: ChangeSignal> TaskService<R, S> {
    /// Creates a service firing `signal` after every successful mutation.
    pub fn with_signal(repo: R, signal: S) -> Self {
        Self { repo, signal }
    }

    /// Lists every task, newest `created_at` first.
    ///
    /// # Errors
    /// - `ServiceError::Storage(StorageOp::Fetch)` on any storage failure.
    pub fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.repo
            .list_tasks()
            .map_err(|err| self.storage_failure("task_list", StorageOp::Fetch, &err))
    }

    /// Creates a task from caller-supplied title and optional description.
    ///
    /// The title is trimmed and required; a blank description is stored as
    /// absent. The returned record carries the storage-generated id, default
    /// `pending` status, and both timestamps.
    ///
    /// # Errors
    /// - `ServiceError::Validation` before any storage call on bad input.
    /// - `ServiceError::Storage(StorageOp::Create)` on storage failure.
    pub fn create_task(&self, title: &str, description: Option<&str>) -> ServiceResult<Task> {
        let draft = TaskDraft::new(title, description)?;

        let task = self
            .repo
            .create_task(&draft)
            .map_err(|err| self.storage_failure("task_create", StorageOp::Create, &err))?;

        self.mutation_succeeded("task_create", task.id);
        Ok(task)
    }

    /// Overwrites the status of a task from caller-supplied status text.
    ///
    /// The overwrite is unconditional: either state may transition to either
    /// state, including itself.
    ///
    /// # Errors
    /// - `ServiceError::Validation` unless `status` is exactly `pending` or
    ///   `completed`, before any storage call.
    /// - `ServiceError::Storage(StorageOp::Update)` on storage failure,
    ///   including unknown ids.
    pub fn set_task_status(&self, id: TaskId, status: &str) -> ServiceResult<Task> {
        let status = TaskStatus::parse(status)?;

        let task = self
            .repo
            .update_task(id, &TaskChange::status(status))
            .map_err(|err| self.storage_failure("task_set_status", StorageOp::Update, &err))?;

        self.mutation_succeeded("task_set_status", id);
        Ok(task)
    }

    /// Replaces title and description of a task; `status` is untouched.
    ///
    /// Same validation and normalization as [`Self::create_task`].
    ///
    /// # Errors
    /// - `ServiceError::Validation` before any storage call on bad input.
    /// - `ServiceError::Storage(StorageOp::Update)` on storage failure,
    ///   including unknown ids.
    pub fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: Option<&str>,
    ) -> ServiceResult<Task> {
        let draft = TaskDraft::new(title, description)?;

        let task = self
            .repo
            .update_task(id, &TaskChange::fields(&draft))
            .map_err(|err| self.storage_failure("task_update", StorageOp::Update, &err))?;

        self.mutation_succeeded("task_update", id);
        Ok(task)
    }

    /// Permanently deletes a task.
    ///
    /// # Errors
    /// - `ServiceError::Storage(StorageOp::Delete)` on storage failure,
    ///   including unknown ids.
    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        self.repo
            .delete_task(id)
            .map_err(|err| self.storage_failure("task_delete", StorageOp::Delete, &err))?;

        self.mutation_succeeded("task_delete", id);
        Ok(())
    }

    fn storage_failure(&self, event: &str, op: StorageOp, cause: &RepoError) -> ServiceError {
        error!("event={event} module=service status=error error={cause}");
        ServiceError::Storage(op)
    }

    fn mutation_succeeded(&self, event: &str, id: TaskId) {
        info!("event={event} module=service status=ok id={id}");
        self.signal.data_changed();
    }
}
