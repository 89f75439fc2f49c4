//! Error type shared by every pipeline stage.
//!
//! Every variant is fatal: the run aborts and `main` maps the variant to a
//! process exit code. Recoverable problems (lenient time parsing) are not
//! errors; see `io::normalize::SoftParseFailure`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Input file missing, unreadable, or structurally malformed.
    #[error("Failed to read CSV '{}': {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// One of the expected columns is absent from the header.
    #[error("Missing required column: `{0}`")]
    MissingColumn(String),

    /// A strict date/time column holds a value that does not match its format.
    #[error("Invalid value '{value}' in column `{column}` (line {line}): expected {expected}")]
    Parse {
        column: String,
        line: usize,
        value: String,
        expected: String,
    },

    /// A command referenced a column the dataset does not have.
    #[error("Unknown column: `{0}`")]
    UnknownColumn(String),

    #[error("{0}")]
    Config(String),

    #[error("Failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Read { .. }
            | AppError::MissingColumn(_)
            | AppError::UnknownColumn(_)
            | AppError::Config(_) => 2,
            AppError::Parse { .. } => 3,
            AppError::Write { .. } => 4,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AppError::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AppError::Write {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_split_read_and_parse_failures() {
        assert_eq!(AppError::read("x.csv", "gone").exit_code(), 2);
        assert_eq!(AppError::MissingColumn("Price".to_string()).exit_code(), 2);
        let parse = AppError::Parse {
            column: "Departure Time".to_string(),
            line: 7,
            value: "25:99".to_string(),
            expected: "time in format %H:%M:%S".to_string(),
        };
        assert_eq!(parse.exit_code(), 3);
        assert_eq!(
            parse.to_string(),
            "Invalid value '25:99' in column `Departure Time` (line 7): expected time in format %H:%M:%S"
        );
        assert_eq!(AppError::write("out.json", "denied").exit_code(), 4);
    }
}
