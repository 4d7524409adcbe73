//! A heap file: a sequence of slotted pages stored as a record-number-
//! keyed access method on disk.

use crate::page::SlottedPage;
use crate::record_file::RecordFile;
use common::error::StorageError;
use common::ids::BlockId;
use common::BLOCK_SZ;
use log::{debug, trace};
use std::path::{Path, PathBuf};

pub struct HeapFile {
    path: PathBuf,
    file: Option<RecordFile>,
    last: BlockId,
    closed: bool,
}

impl HeapFile {
    /// Create a brand-new heap file at `path`. Fails if one already
    /// exists there. Allocates block 1 so the file is never empty.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let record_file = RecordFile::create(&path)?;
        let mut heap_file = HeapFile {
            path: path.as_ref().to_path_buf(),
            file: Some(record_file),
            last: 0,
            closed: false,
        };
        debug!("creating heap file {:?}", heap_file.path);
        heap_file.get_new()?;
        Ok(heap_file)
    }

    /// Open an existing heap file, recovering `last` from the file's
    /// current length.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let record_file = RecordFile::open(&path)?;
        let last = record_file.num_records()?;
        Ok(HeapFile {
            path: path.as_ref().to_path_buf(),
            file: Some(record_file),
            last,
            closed: false,
        })
    }

    /// Release the process-local handle. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        trace!("closing heap file {:?}", self.path);
        self.file = None;
        self.closed = true;
    }

    /// Close the handle and delete the on-disk file.
    pub fn drop_file(mut self) -> Result<(), StorageError> {
        self.close();
        debug!("dropping heap file {:?}", self.path);
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_mut(&mut self) -> Result<&mut RecordFile, StorageError> {
        self.file
            .as_mut()
            .ok_or_else(|| StorageError::Storage("heap file is closed".to_string()))
    }

    /// Allocate a fresh block, persist its (empty) image immediately so
    /// a subsequent `get` returns a buffer the file subsystem owns, and
    /// hand back the page.
    pub fn get_new(&mut self) -> Result<SlottedPage, StorageError> {
        self.last += 1;
        let block_id = self.last;
        let page = SlottedPage::new([0u8; BLOCK_SZ], block_id, true);
        self.file_mut()?.write_block(block_id, page.as_bytes())?;
        Ok(page)
    }

    /// Read `block_id` off disk into a freshly owned page.
    pub fn get(&mut self, block_id: BlockId) -> Result<SlottedPage, StorageError> {
        let buf = self.file_mut()?.read_block(block_id)?;
        Ok(SlottedPage::new(buf, block_id, false))
    }

    /// Persist `page`'s current image under its own block id.
    pub fn put(&mut self, page: &SlottedPage) -> Result<(), StorageError> {
        self.file_mut()?
            .write_block(page.block_id(), page.as_bytes())
    }

    /// `[1, 2, ..., last]`.
    pub fn block_ids(&self) -> Vec<BlockId> {
        (1..=self.last).collect()
    }

    pub fn get_last_block_id(&self) -> BlockId {
        self.last
    }
}
