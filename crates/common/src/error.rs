use std::error::Error;
use std::fmt;
use std::io;

pub fn c_err(s: &str) -> StorageError {
    StorageError::Storage(s.to_string())
}

/// Custom error type for the storage core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A page had no room for the requested bytes.
    NoRoom(String),
    /// A row did not conform to a table's schema.
    Schema(String),
    /// The underlying record-number file failed on open/get/put/remove.
    IO(String),
    /// Generic storage-layer failure not covered by the above.
    Storage(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StorageError::NoRoom(s) => format!("No Room Error: {}", s),
                StorageError::Schema(s) => format!("Schema Error: {}", s),
                StorageError::IO(s) => format!("IO Error: {}", s),
                StorageError::Storage(s) => format!("Storage Error: {}", s),
            }
        )
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IO(error.to_string())
    }
}

impl Error for StorageError {}
