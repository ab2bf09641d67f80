use thiserror::Error;

/// Structural problems with a data source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("table '{0}' not found in database")]
    MissingTable(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}
