use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsolateError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read input {}: {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unterminated raw string literal in {} (opened at line {line}, delimiter {delimiter:?})", path.display())]
    UnterminatedLiteral {
        path: PathBuf,
        line: usize,
        delimiter: String,
    },

    #[error("Cannot write output file {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output file already exists: {path}")]
    OutputFileExists { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for IsolateError {
    fn user_message(&self) -> String {
        match self {
            IsolateError::UnreadableInput { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            IsolateError::UnterminatedLiteral {
                path,
                line,
                delimiter,
            } => {
                format!(
                    "Raw string literal opened at {}:{} is never closed with ){}\";",
                    path.display(),
                    line,
                    delimiter
                )
            }
            IsolateError::WriteFailure { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            IsolateError::OutputFileExists { path } => {
                format!("Output file already exists: {}", path)
            }
            IsolateError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            IsolateError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            IsolateError::UnreadableInput { .. } => Some(
                "Check the file permissions and encoding (UTF-8 is required), or pass --skip-unreadable to continue past it.".to_string()
            ),
            IsolateError::UnterminatedLiteral { .. } => Some(
                "Close the literal with the same delimiter it was opened with, or drop --strict to discard it with a warning.".to_string()
            ),
            IsolateError::WriteFailure { .. } => Some(
                "Ensure the output directory exists, is writable and has free space.".to_string()
            ),
            IsolateError::OutputFileExists { .. } => Some(
                "Remove the existing files, choose another --output-dir, or drop --no-overwrite.".to_string()
            ),
            IsolateError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all fields have valid values.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for IsolateError {
    fn from(error: toml::de::Error) -> Self {
        IsolateError::Config {
            message: error.to_string(),
        }
    }
}

impl From<walkdir::Error> for IsolateError {
    fn from(error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let source = match error.into_io_error() {
            Some(io_error) => io_error,
            None => std::io::Error::new(
                std::io::ErrorKind::Other,
                "filesystem loop detected while walking directory",
            ),
        };

        IsolateError::UnreadableInput { path, source }
    }
}

pub type Result<T> = std::result::Result<T, IsolateError>;
