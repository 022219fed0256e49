/// Errors raised while parsing composite setting codes.
#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("malformed setting code '{0}'")]
    Malformed(String),

    #[error("failed to build setting code pattern: {0}")]
    Pattern(#[from] regex::Error),
}
