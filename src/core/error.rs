//! Error types for network construction, loading and resolution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Unknown specification: {0}")]
    UnknownSpec(String),

    #[error("Key {0} is not a recognized site")]
    UnknownSite(String),

    #[error("Key {0} is not a recognized channel")]
    UnknownChannel(String),

    #[error("Site '{group}' does not contain the site '{member}'")]
    UnknownMember { group: String, member: String },

    #[error("Invalid site: {message}")]
    InvalidSite { message: String },

    #[error("A site can only be the output of one channel. Source of {site} is {producer}")]
    AlreadyProduced { site: String, producer: String },

    #[error("Site {site} is not an input of channel {channel}")]
    NotAnInput { site: String, channel: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Definition error: {message}")]
    Definition { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    /// Stable machine-readable code used in result items
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::UnknownSpec(_) => "UNKNOWN_SPEC",
            FlowError::UnknownSite(_) => "UNKNOWN_SITE",
            FlowError::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            FlowError::UnknownMember { .. } => "UNKNOWN_MEMBER",
            FlowError::InvalidSite { .. } => "INVALID_SITE",
            FlowError::AlreadyProduced { .. } => "ALREADY_PRODUCED",
            FlowError::NotAnInput { .. } => "NOT_AN_INPUT",
            FlowError::Parse { .. } => "PARSE_ERROR",
            FlowError::Definition { .. } => "DEFINITION_ERROR",
            FlowError::Io(_) => "IO_ERROR",
            FlowError::Json(_) => "JSON_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
