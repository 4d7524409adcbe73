//! `RecordFile` is the on-disk record-number access method a `HeapFile`
//! is layered on: a flat file of fixed-length (`BLOCK_SZ`) records,
//! addressed by a 1-based block id.

use common::error::StorageError;
use common::ids::BlockId;
use common::BLOCK_SZ;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub struct RecordFile {
    path: PathBuf,
    file: File,
}

impl RecordFile {
    fn block_offset(block_id: BlockId) -> u64 {
        (block_id as u64 - 1) * BLOCK_SZ as u64
    }

    /// Open the file for creation. Fails if it already exists.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        Ok(RecordFile {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    /// Open an existing file. Fails if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        Ok(RecordFile {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    /// Number of whole `BLOCK_SZ` records currently in the file.
    pub fn num_records(&self) -> Result<u32, StorageError> {
        let len = self.file.metadata()?.len();
        Ok((len / BLOCK_SZ as u64) as u32)
    }

    pub fn read_block(&mut self, block_id: BlockId) -> Result<[u8; BLOCK_SZ], StorageError> {
        let mut buf = [0u8; BLOCK_SZ];
        self.file.seek(SeekFrom::Start(Self::block_offset(block_id)))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn write_block(
        &mut self,
        block_id: BlockId,
        bytes: &[u8; BLOCK_SZ],
    ) -> Result<(), StorageError> {
        self.file.seek(SeekFrom::Start(Self::block_offset(block_id)))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        Ok(())
    }

    /// Close the handle and remove the file from disk.
    pub fn remove(self) -> Result<(), StorageError> {
        let path = self.path.clone();
        drop(self);
        std::fs::remove_file(path)?;
        Ok(())
    }
}
