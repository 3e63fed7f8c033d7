use serde::Serialize;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The area of the program in which a command failed. This is attached to errors that leave the
/// `commands` module so that the user can tell a broken configuration from a database problem or
/// a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The data directory or its config file is missing or invalid.
    Config,
    /// Reading from or writing to the SQLite database failed.
    Database,
    /// The arguments of the request were invalid.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// Tags a `Result` with the `ErrorType` in which it failed.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(format!("{error_type} error")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_keeps_source_message() {
        let result: Result<()> = Err(anyhow!("disk full"));
        let err = result.pub_result(ErrorType::Database).unwrap_err();
        assert_eq!(err.to_string(), "database error");
        assert!(format!("{err:#}").contains("disk full"));
    }

    #[test]
    fn test_pub_result_passes_ok_through() {
        let result: Result<u8> = Ok(7);
        assert_eq!(result.pub_result(ErrorType::Config).unwrap(), 7);
    }
}
