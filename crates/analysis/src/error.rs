use thiserror::Error;

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No timed lap exists for this driver in the session.
    #[error("Driver {code} not found")]
    DriverNotFound { code: String },

    /// A stage received a sequence it cannot work with.
    #[error("Transform error in {stage}: {details}")]
    Transform { stage: &'static str, details: String },
}

impl AnalysisError {
    pub fn driver_not_found(code: impl Into<String>) -> Self {
        AnalysisError::DriverNotFound { code: code.into() }
    }

    pub fn transform(stage: &'static str, details: impl Into<String>) -> Self {
        AnalysisError::Transform { stage, details: details.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisError::DriverNotFound { .. })
    }
}
