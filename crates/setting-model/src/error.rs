use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid component code '{0}'")]
    InvalidComponentCode(String),
    #[error("invalid flag value '{value}' (expected true/false, yes/no, y/n or 1/0)")]
    InvalidFlag { value: String },
    #[error("invalid order value '{value}' for {abbreviation}")]
    InvalidOrder {
        abbreviation: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
