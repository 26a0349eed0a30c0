use crate::common::error::CohoError;

/// Result alias used throughout the crate.
pub type CohoResult<T> = Result<T, CohoError>;

/// Conversions from `Option` into [`CohoResult`].
pub trait OptionExt<T> {
    /// Turn `None` into a usage error (exit code 1).
    ///
    /// ```
    /// use coho::common::result::{CohoResult, OptionExt};
    ///
    /// let version: Option<String> = None;
    /// let result: CohoResult<String> = version.ok_or_usage_error("--version is required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_usage_error(self, message: impl Into<String>) -> CohoResult<T>;

    /// Turn `None` into an internal error.
    fn ok_or_internal_error(self, message: impl Into<String>) -> CohoResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_usage_error(self, message: impl Into<String>) -> CohoResult<T> {
        self.ok_or_else(|| CohoError::usage_error(message))
    }

    fn ok_or_internal_error(self, message: impl Into<String>) -> CohoResult<T> {
        self.ok_or_else(|| CohoError::internal_error(message))
    }
}

/// Conversions from foreign `Result`s into [`CohoResult`].
pub trait ResultExt<T> {
    /// Wrap an I/O failure with a message and the path it concerned.
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> CohoResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> CohoResult<T> {
        self.map_err(|e| CohoError::filesystem_error_with_source(message, path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_option_ext_ok_or_usage_error() {
        let none_value: Option<String> = None;
        let result = none_value.ok_or_usage_error("missing");
        assert!(matches!(result, Err(CohoError::UsageError { .. })));

        let some_value = Some("1.0.0".to_string());
        assert_eq!(some_value.ok_or_usage_error("missing").unwrap(), "1.0.0");
    }

    #[test]
    fn test_option_ext_ok_or_internal_error() {
        let none_value: Option<String> = None;
        if let Err(CohoError::InternalError { message, .. }) =
            none_value.ok_or_internal_error("test error")
        {
            assert_eq!(message, "test error");
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = Some(PathBuf::from("/test/path"));

        match result.with_filesystem_error("read failed", path.clone()) {
            Err(CohoError::FileSystemError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }
}
