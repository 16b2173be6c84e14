use thiserror::Error;

/// Failures raised while turning a tabular source into a [`Dataset`].
///
/// Every variant is a startup-time failure: once a dataset exists nothing in
/// the filtering or charting path can fail.
///
/// [`Dataset`]: super::model::Dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
    #[error("dataset contains no launch records")]
    Empty,
}

impl DataError {
    pub(crate) fn invalid_row(row: usize, reason: impl Into<String>) -> Self {
        DataError::InvalidRow {
            row,
            reason: reason.into(),
        }
    }
}
