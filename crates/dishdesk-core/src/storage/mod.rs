use crate::error::StorageError;

pub mod config;
pub mod seen;

type Result<T> = std::result::Result<T, StorageError>;
