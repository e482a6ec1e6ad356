//! Error types shared by the board core and the gateway adapters.

use thiserror::Error;

use crate::model::{ColumnId, TaskId};

/// Failure talking to the remote task or user service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response (connection, DNS, TLS).
    #[error("request to {url} failed: {message}")]
    Request {
        /// Target URL.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("{url} answered {status}: {message}")]
    Status {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Target URL.
        url: String,
        /// Parser error text.
        message: String,
    },
    /// A failure served back from a replay cassette.
    #[error("{0}")]
    Replayed(String),
}

/// Broad class of a [`BoardError`], mirroring how the UI reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A required field is blank or invalid. Nothing was sent.
    Validation,
    /// The operation is not allowed in the current board state. Nothing was sent.
    Precondition,
    /// The remote call failed. The local change was not applied.
    Remote,
    /// The board and the caller disagree (unknown id, stale confirmation).
    Inconsistent,
}

/// Errors returned by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A required form field is blank.
    #[error("{field} is required")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },
    /// The title is reserved for the column placeholder task.
    #[error("title {0:?} is reserved")]
    ReservedTitle(String),
    /// Another column already uses this title.
    #[error("a column titled {0:?} already exists")]
    DuplicateColumn(String),
    /// Columns holding real tasks cannot be renamed or deleted.
    #[error("column {title:?} still holds {count} task(s)")]
    ColumnNotEmpty {
        /// Column title.
        title: String,
        /// Number of real tasks in it.
        count: usize,
    },
    /// The task has never been saved, so the service does not know it.
    #[error("task {0} has not been saved yet")]
    TaskNotPersisted(TaskId),
    /// No column with this key.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),
    /// No task with this id (or it is not where the caller said).
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// An index outside the list.
    #[error("index {index} out of range for {len} item(s)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// List length.
        len: usize,
    },
    /// A newer operation on the same task superseded this confirmation.
    #[error("confirmation for task {0} is stale")]
    StaleConfirmation(TaskId),
    /// The suggestion named a user the user service does not list.
    #[error("suggested user {0} is unknown")]
    UnknownUser(String),
    /// The remote call failed.
    #[error("{action} failed: {source}")]
    Remote {
        /// What was being attempted, e.g. `"move task"`.
        action: &'static str,
        /// Underlying gateway error.
        #[source]
        source: GatewayError,
    },
}

impl BoardError {
    /// Wraps a gateway error with the action it interrupted.
    #[must_use]
    pub fn remote(action: &'static str, source: GatewayError) -> Self {
        Self::Remote { action, source }
    }

    /// Classifies the error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingField { .. } | Self::ReservedTitle(_) | Self::DuplicateColumn(_) => {
                ErrorClass::Validation
            }
            Self::ColumnNotEmpty { .. } | Self::TaskNotPersisted(_) => ErrorClass::Precondition,
            Self::Remote { .. } | Self::UnknownUser(_) => ErrorClass::Remote,
            Self::ColumnNotFound(_)
            | Self::TaskNotFound(_)
            | Self::IndexOutOfRange { .. }
            | Self::StaleConfirmation(_) => ErrorClass::Inconsistent,
        }
    }
}
