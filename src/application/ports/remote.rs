use crate::domain::entities::Resume;
use crate::domain::value_objects::{ResumeId, ResumePayload};
use crate::shared::error::AppError;
use async_trait::async_trait;
use thiserror::Error;

/// Remote failure, classified so the coordinator can tell a transient
/// connectivity loss (requeue) from a definite rejection (don't retry).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote unreachable: {0}")]
    Connectivity(String),
    #[error("remote rejected ({status:?}): {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
}

impl RemoteError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, RemoteError::Connectivity(_))
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        RemoteError::Rejected {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Connectivity(msg) => AppError::Connectivity(msg),
            RemoteError::Rejected { .. } => AppError::Remote(err.to_string()),
        }
    }
}

/// The remote source of truth for resumes.
#[async_trait]
pub trait RemoteResumeService: Send + Sync {
    async fn create(&self, payload: ResumePayload) -> Result<Resume, RemoteError>;
    async fn update(&self, id: &ResumeId, payload: ResumePayload) -> Result<Resume, RemoteError>;
    async fn delete(&self, id: &ResumeId) -> Result<(), RemoteError>;
    async fn duplicate(
        &self,
        id: &ResumeId,
        new_title: Option<String>,
    ) -> Result<Resume, RemoteError>;
}
