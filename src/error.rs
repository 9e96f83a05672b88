use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovpostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No compatible CI platform detected. Set explicit parameters or use the local submission path.")]
    NoProvider,

    #[error("{0}")]
    Precondition(String),

    #[error("Upload failed: {0}")]
    Transport(#[from] Box<ureq::Error>),
}

pub type Result<T> = std::result::Result<T, CovpostError>;
