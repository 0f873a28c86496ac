use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::question::ExerciseType;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("network access is disabled")]
    Offline,
    #[error("server returned status {0}")]
    Status(u16),
    #[error("could not decode server response: {0}")]
    Decode(String),
    #[cfg(feature = "network")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Historical miss count for one prompt, keyed by its literal text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub question: String,
    pub error_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub secret_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissReport {
    pub name: String,
    pub exercise_type: ExerciseType,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultReport {
    pub name: String,
    pub score: u32,
    pub total: u32,
    pub tables: Vec<u32>,
    pub exercise_type: ExerciseType,
    pub mean_time_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewGroup<'a> {
    pub name: &'a str,
}

/// Persistence and group collaborator. Implementations must be usable from
/// the dispatch worker thread.
pub trait Backend: Send + Sync {
    fn fetch_errors(&self, name: &str, mode: ExerciseType) -> Result<Vec<ErrorRecord>, ApiError>;
    fn fetch_best_score(&self, name: &str, mode: ExerciseType) -> Result<BestScore, ApiError>;
    fn record_error(&self, report: &MissReport) -> Result<(), ApiError>;
    fn post_result(&self, report: &ResultReport) -> Result<(), ApiError>;
    fn find_group(&self, secret_key: &str) -> Result<Option<Group>, ApiError>;
    fn create_group(&self, name: &str) -> Result<Group, ApiError>;
}

/// Used when networking is switched off; every call fails with `Offline`
/// and callers fall back to their no-data defaults.
pub struct OfflineBackend;

impl Backend for OfflineBackend {
    fn fetch_errors(&self, _name: &str, _mode: ExerciseType) -> Result<Vec<ErrorRecord>, ApiError> {
        Err(ApiError::Offline)
    }

    fn fetch_best_score(&self, _name: &str, _mode: ExerciseType) -> Result<BestScore, ApiError> {
        Err(ApiError::Offline)
    }

    fn record_error(&self, _report: &MissReport) -> Result<(), ApiError> {
        Err(ApiError::Offline)
    }

    fn post_result(&self, _report: &ResultReport) -> Result<(), ApiError> {
        Err(ApiError::Offline)
    }

    fn find_group(&self, _secret_key: &str) -> Result<Option<Group>, ApiError> {
        Err(ApiError::Offline)
    }

    fn create_group(&self, _name: &str) -> Result<Group, ApiError> {
        Err(ApiError::Offline)
    }
}

/// Error history for seeding the selector; any failure means "no history".
pub fn errors_or_empty(backend: &dyn Backend, name: &str, mode: ExerciseType) -> Vec<ErrorRecord> {
    match backend.fetch_errors(name, mode) {
        Ok(errors) => errors,
        Err(e) => {
            tracing::warn!(error = %e, player = name, mode = %mode, "error history unavailable");
            Vec::new()
        }
    }
}

/// Prior best for the record check; any failure means `{0, 0}`.
pub fn best_or_default(backend: &dyn Backend, name: &str, mode: ExerciseType) -> BestScore {
    match backend.fetch_best_score(name, mode) {
        Ok(best) => best,
        Err(e) => {
            tracing::warn!(error = %e, player = name, mode = %mode, "best score unavailable");
            BestScore::default()
        }
    }
}
