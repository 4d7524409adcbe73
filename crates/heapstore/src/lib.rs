//! A heap-organized table storage layer: a slotted-page record manager,
//! a heap file built as a sequence of such pages, and a schema-aware
//! table layered on top.
//!
//! # Slotted page layout
//!
//! Each block is exactly `BLOCK_SZ` bytes:
//!
//! ```text
//! [0..2)   num_records (u16 LE)  — count of slots ever allocated
//! [2..4)   end_free    (u16 LE)  — offset of the last free byte
//! [4i..4i+4) for i in [1..num_records]:
//!          size (u16 LE), offset (u16 LE)  — slot i's record
//! ...payload bytes, packed densely above end_free...
//! ```
//!
//! A tombstone slot has size=0 AND offset=0. `num_records` only grows;
//! deletion never shrinks the slot table, so a page that churns through
//! many inserts and deletes can exhaust its slot directory even with
//! live space remaining. This is preserved rather than "fixed" because
//! nothing downstream depends on slot reuse and changing it would be an
//! on-disk format change.
//!
//! Record ids, block ids, and `Handle` are defined in the `common`
//! crate so they can be shared with collaborators above this core.

#[macro_use]
#[allow(unused_imports)]
extern crate log;

pub mod heap_file;
pub mod heap_table;
mod heap_table_tests;
pub mod page;
mod page_tests;
pub mod record_file;

pub mod prelude {
    pub use crate::heap_file::HeapFile;
    pub use crate::heap_table::HeapTable;
    pub use crate::page::SlottedPage;
    pub use crate::record_file::RecordFile;
}
