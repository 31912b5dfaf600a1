use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeedsError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("need `{0}` is defined twice")]
    DuplicateNeed(String),

    #[error("need `{name}` has an empty range [{min}, {max}]")]
    InvalidRange { name: String, min: i32, max: i32 },

    #[error("need `{name}` starts at {initial}, outside [{min}, {max}]")]
    InitialOutOfRange {
        name: String,
        initial: i32,
        min: i32,
        max: i32,
    },

    #[error("unknown need `{0}`")]
    UnknownNeed(String),
}
