use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to load '{path}': {reason}")]
    Load { path: String, reason: String },

    #[error("Failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid dataset: {field} — {reason}")]
    InvalidDataset { field: String, reason: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DashboardError {
    /// True for the failures that stop the dashboard from rendering at all.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::Load { .. }
                | DashboardError::Parse(_)
                | DashboardError::EmptyDataset(_)
                | DashboardError::InvalidDataset { .. }
        )
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "extract")]
impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::Parse(e.to_string())
    }
}
