use crate::ParamKind;
use thiserror::Error;

/// Errors raised while reading a system from JSON.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("unknown {category} type {name:?}")]
    UnknownType { category: &'static str, name: String },
    #[error("{owner} takes no argument {name:?}")]
    UnknownArgument { owner: String, name: String },
    #[error("argument {name:?} of {owner} must be {expected}")]
    InvalidArgument {
        owner: String,
        name: String,
        expected: ParamKind,
    },
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error(transparent)]
    Core(#[from] phoray::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
