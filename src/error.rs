use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error {0}")]
    Io(#[from] io::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("malformed entry on line {line}: {reason}")]
    Codec { line: usize, reason: String },

    #[error("key on line {line} already exists")]
    DuplicateEntry { line: usize },
}
