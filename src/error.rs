use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed coverage document: {0}")]
    Malformed(String),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("No <{0}> element found")]
    MissingStructure(&'static str),
}

impl From<quick_xml::Error> for CovError {
    fn from(err: quick_xml::Error) -> Self {
        CovError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CovError>;
