use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into DataError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for DataError {
            fn from(e: $t) -> Self { DataError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl From<postcard::Error> for DataError {
    fn from(e: postcard::Error) -> Self {
        DataError::Decode(e.to_string())
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, DataError> {
    postcard::to_allocvec(value).map_err(|e| DataError::Encode(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DataError> {
    Ok(postcard::from_bytes(bytes)?)
}
