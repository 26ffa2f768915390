use crate::model::stores::StoreError;
use arbor_consensus_core::{Cid, HeaderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("header {0} is referenced but cannot be fetched")]
    MissingHeader(Cid),

    #[error("header {0} is malformed: {1}")]
    MalformedHeader(Cid, String),

    #[error("header {0} failed verification: {1}")]
    UnverifiedHeader(Cid, HeaderError),

    #[error("store returned bytes for {requested} hashing to {actual}")]
    CorruptStore { requested: Cid, actual: Cid },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
