use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("malformed scene JSON: {0}")]
    MalformedScene(#[from] serde_json::Error),

    #[error("unknown draw mode `{0}`")]
    UnknownDrawMode(String),

    #[error("unknown pen color `{0}`")]
    UnknownPenColor(String),

    #[error("invalid props: {0}")]
    InvalidProps(String),

    #[error("not a base64 data URL")]
    InvalidDataUrl,

    #[error("`{0}` is not an image type")]
    NotAnImage(String),

    #[error("base64 payload could not be decoded: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image could not be processed: {0}")]
    Image(#[from] image::ImageError),

    #[error("image buffer is {actual} bytes, expected {expected}")]
    PixelBuffer { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PaintError>;
