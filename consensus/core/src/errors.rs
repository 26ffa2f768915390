use arbor_keys::KeyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("header encoding failed: {0}")]
    Encode(String),

    #[error("{0}")]
    Key(#[from] KeyError),
}

pub type HeaderResult<T> = std::result::Result<T, HeaderError>;
