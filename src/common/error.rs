use std::path::PathBuf;
use thiserror::Error;

/// Exit code for bad invocations (unknown flags, missing arguments).
pub const EXIT_USAGE: i32 = 1;

/// Exit code for every fatal application error, including failed subprocesses.
pub const EXIT_FATAL: i32 = 2;

#[derive(Error, Debug)]
pub enum CohoError {
    #[error("{message}")]
    UsageError { message: String },

    #[error("Invalid repo value: {value}\nUse `coho list-repos` to see the valid repo ids and groups.")]
    InvalidRepo { value: String },

    #[error("Command failed: {command} (exit code {exit_code:?})\n{stderr}")]
    CommandError {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Repo directory does not exist: {repo_name}. First run coho repo-clone.")]
    MissingRepoDirectory { repo_name: String, path: PathBuf },

    #[error("Git operation failed: {message}")]
    GitError {
        message: String,
        directory: Option<PathBuf>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network operation failed: {message}")]
    NetworkError {
        message: String,
        url: Option<String>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CohoError {
    pub fn usage_error(message: impl Into<String>) -> Self {
        Self::UsageError {
            message: message.into(),
        }
    }

    pub fn invalid_repo(value: impl Into<String>) -> Self {
        Self::InvalidRepo {
            value: value.into(),
        }
    }

    pub fn command_error(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandError {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
            source: None,
        }
    }

    pub fn command_error_with_source(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandError {
            command: command.into(),
            exit_code: None,
            stderr: source.to_string(),
            source: Some(source),
        }
    }

    pub fn missing_repo_directory(repo_name: impl Into<String>, path: PathBuf) -> Self {
        Self::MissingRepoDirectory {
            repo_name: repo_name.into(),
            path,
        }
    }

    pub fn git_error(message: impl Into<String>, directory: Option<PathBuf>) -> Self {
        Self::GitError {
            message: message.into(),
            directory,
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn network_error(message: impl Into<String>, url: Option<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
            url,
            source: None,
        }
    }

    pub fn network_error_with_source(
        message: impl Into<String>,
        url: Option<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::NetworkError {
            message: message.into(),
            url,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }

    /// Process exit code this error terminates the run with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UsageError { .. } => EXIT_USAGE,
            _ => EXIT_FATAL,
        }
    }
}

impl From<std::io::Error> for CohoError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for CohoError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for CohoError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

impl From<reqwest::Error> for CohoError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string());
        Self::network_error_with_source("Network request failed", url, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_repo_message_names_value() {
        let error = CohoError::invalid_repo("nonexistent-group");
        assert!(error
            .to_string()
            .starts_with("Invalid repo value: nonexistent-group"));
        assert_eq!(error.exit_code(), EXIT_FATAL);
    }

    #[test]
    fn test_usage_error_exit_code() {
        let error = CohoError::usage_error("--version is required");
        assert_eq!(error.exit_code(), EXIT_USAGE);
        assert_eq!(error.to_string(), "--version is required");
    }

    #[test]
    fn test_command_error_is_fatal() {
        let error = CohoError::command_error("git push origin master", Some(128), "denied");
        assert_eq!(error.exit_code(), EXIT_FATAL);
        assert!(error.to_string().contains("git push origin master"));
    }

    #[test]
    fn test_missing_repo_directory_hint() {
        let error =
            CohoError::missing_repo_directory("cordova-android", PathBuf::from("/w/cordova-android"));
        assert_eq!(
            error.to_string(),
            "Repo directory does not exist: cordova-android. First run coho repo-clone."
        );
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CohoError = io_error.into();
        assert!(matches!(error, CohoError::FileSystemError { .. }));
    }
}
