use thiserror::Error;

#[derive(Error, Debug)]
pub enum FryCountError {
    #[error("Template load error: {0}")]
    TemplateLoad(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("History log error: {0}")]
    History(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FryCountError>;
