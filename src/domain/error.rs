//! Domain error types.

/// Top-level error type for rsioma.
///
/// Only structurally invalid input surfaces here. Warmup gaps and runs that
/// produce no trades are ordinary results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RsiomaError {
    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RsiomaError {
    pub(crate) fn invalid_series(reason: impl Into<String>) -> Self {
        RsiomaError::InvalidSeries {
            reason: reason.into(),
        }
    }
}

impl From<&RsiomaError> for std::process::ExitCode {
    fn from(err: &RsiomaError) -> Self {
        let code: u8 = match err {
            RsiomaError::Io(_) | RsiomaError::Report { .. } => 1,
            RsiomaError::ConfigParse { .. }
            | RsiomaError::ConfigMissing { .. }
            | RsiomaError::ConfigInvalid { .. } => 2,
            RsiomaError::DataLoad { .. } => 3,
            RsiomaError::InvalidSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
