use thiserror::Error;

pub type UtilsResult<T> = Result<T, UtilsError>;

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid day-cycle entry: {0}")]
    InvalidDayCycle(String),
}

// An I/O failure surfaced through the CSV layer is still an I/O failure.
impl From<csv::Error> for UtilsError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io) = err.kind() {
            return UtilsError::Io(std::io::Error::new(io.kind(), io.to_string()));
        }
        UtilsError::Csv(err)
    }
}
