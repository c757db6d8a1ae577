use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::module_path::ModulePathError;
use crate::domain::value_objects::pseudo_version::PseudoVersionError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::filesystem::use_list_store::UseListError;

#[derive(Error, Debug)]
pub enum ModbatchError {
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

    #[error("Use list error: {message}")]
    UseListError {
        message: String,
        #[source]
        source: Option<UseListError>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ModbatchError {
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

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
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
}

impl From<std::io::Error> for ModbatchError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<UseListError> for ModbatchError {
    fn from(error: UseListError) -> Self {
        Self::UseListError {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

impl From<ConfigStoreError> for ModbatchError {
    fn from(error: ConfigStoreError) -> Self {
        Self::config_error_with_source("Failed to load settings", error)
    }
}

impl From<ModulePathError> for ModbatchError {
    fn from(error: ModulePathError) -> Self {
        match error {
            ModulePathError::InvalidPrefix(ref prefix) => {
                Self::validation_error("prefix", error.to_string(), Some(prefix.clone()))
            }
        }
    }
}

impl From<PseudoVersionError> for ModbatchError {
    fn from(error: PseudoVersionError) -> Self {
        Self::invalid_arguments(error.to_string())
    }
}

impl From<serde_json::Error> for ModbatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

impl From<serde_yaml::Error> for ModbatchError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_error_with_path() {
        let path = PathBuf::from("/test/path");
        let error = ModbatchError::filesystem_error("test message", Some(path.clone()));
        if let ModbatchError::FileSystemError { path: Some(p), .. } = error {
            assert_eq!(p, path);
        } else {
            panic!("Expected FileSystemError with path");
        }
    }

    #[test]
    fn test_validation_error() {
        let error = ModbatchError::validation_error("field", "message", Some("value".to_string()));
        assert_eq!(error.to_string(), "Validation error: field - message");
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ModbatchError = io_error.into();
        assert!(matches!(error, ModbatchError::FileSystemError { .. }));
    }

    #[test]
    fn test_error_conversion_from_pseudo_version_error() {
        let error: ModbatchError = PseudoVersionError::MissingArguments { given: 1 }.into();
        assert!(matches!(error, ModbatchError::InvalidArguments { .. }));
    }

    #[test]
    fn test_error_conversion_from_use_list_error() {
        let error: ModbatchError = UseListError::NotFound(PathBuf::from("use.list")).into();
        assert!(error.to_string().contains("no file named use.list"));
    }
}
