use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("malformed timestamp: `{0}`")]
    MalformedTimestamp(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
