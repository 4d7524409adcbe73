#[macro_use]
#[allow(unused_imports)]
extern crate log;

pub mod error;
pub mod ids;
pub mod schema;
pub mod testutil;
pub mod value;

/// Size in bytes of every block in a heap file.
pub const BLOCK_SZ: usize = 4096;

pub mod prelude {
    pub use crate::error::{c_err, StorageError};
    pub use crate::ids::{BlockId, Handle, RecordId};
    pub use crate::schema::{Column, Schema};
    pub use crate::value::{ColumnType, Row, Value};
    pub use crate::BLOCK_SZ;
}
