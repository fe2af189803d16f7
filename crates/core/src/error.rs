use thiserror::Error;

pub type TracelinkResult<T> = Result<T, TracelinkError>;

#[derive(Error, Debug)]
pub enum TracelinkError {
    /// A dynamic value was not a string, number, or boolean. Carries the
    /// rejected value's textual form for diagnostics.
    #[error("Invalid event parameter value: `{0}`")]
    InvalidParamType(String),

    /// A revenue event was constructed without both an amount and a currency.
    #[error("Revenue events require both an amount and a currency")]
    MissingRevenueFields,

    /// A collaborator log line did not match `level|tag|message|stackTrace`.
    /// The record is dropped; log routing continues.
    #[error("Malformed log record: {0}")]
    MalformedLogRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
