use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Location request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Location server answered with status {0}")]
    Status(u16),

    #[error("Failed to parse location tree: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read location file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid location row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Country,
    State,
    City,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Country => "country",
            Level::State => "state",
            Level::City => "city",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("{value:?} is not an available {level} option")]
    UnknownOption { level: Level, value: String },

    #[error("Choose a parent before picking a {0}")]
    ParentUnset(Level),
}
