//! Schema-aware layer above a `HeapFile`: marshals rows to bytes, appends
//! them to the last page (rolling over to a new page on overflow), and
//! unmarshals bytes back into typed rows.

use crate::heap_file::HeapFile;
use common::error::StorageError;
use common::ids::Handle;
use common::schema::Schema;
use common::value::{ColumnType, Row, Value};
use log::{debug, warn};
use std::path::{Path, PathBuf};

pub struct HeapTable {
    path: PathBuf,
    schema: Schema,
    file: Option<HeapFile>,
}

impl HeapTable {
    pub fn new(path: impl Into<PathBuf>, schema: Schema) -> Self {
        HeapTable {
            path: path.into(),
            schema,
            file: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn create(&mut self) -> Result<(), StorageError> {
        debug!("creating heap table at {:?}", self.path);
        self.file = Some(HeapFile::create(&self.path)?);
        Ok(())
    }

    /// Try to open; on any open failure, create instead.
    pub fn create_if_not_exists(&mut self) -> Result<(), StorageError> {
        match HeapFile::open(&self.path) {
            Ok(f) => {
                self.file = Some(f);
                Ok(())
            }
            Err(_) => self.create(),
        }
    }

    pub fn open(&mut self) -> Result<(), StorageError> {
        self.file = Some(HeapFile::open(&self.path)?);
        Ok(())
    }

    pub fn close(&mut self) {
        if let Some(f) = self.file.as_mut() {
            f.close();
        }
        self.file = None;
    }

    pub fn drop_table(mut self) -> Result<(), StorageError> {
        self.close();
        debug!("dropping heap table at {:?}", self.path);
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut HeapFile, StorageError> {
        self.file
            .as_mut()
            .ok_or_else(|| StorageError::Storage("heap table is closed".to_string()))
    }

    /// Reject rows naming a column absent from the schema, and require
    /// every schema column to be present. Returns a fresh row containing
    /// exactly the schema's columns, in no particular order.
    ///
    /// Checking a value's type against its own named column, not merely
    /// against the set of types declared somewhere in the schema.
    pub fn validate(&self, row: &Row) -> Result<Row, StorageError> {
        for name in row.keys() {
            if !self.schema.contains(name) {
                return Err(StorageError::Schema(format!(
                    "column '{}' is not in the schema",
                    name
                )));
            }
        }
        let mut canonical = Row::new();
        for column in self.schema.columns() {
            let value = row.get(&column.name).ok_or_else(|| {
                StorageError::Schema(format!(
                    "missing value for column '{}' (NULLs/defaults not supported)",
                    column.name
                ))
            })?;
            if value.column_type() != column.col_type {
                return Err(StorageError::Schema(format!(
                    "column '{}' expects {} but got {}",
                    column.name,
                    column.col_type,
                    value.column_type()
                )));
            }
            canonical.insert(column.name.clone(), value.clone());
        }
        Ok(canonical)
    }

    pub fn insert(&mut self, row: &Row) -> Result<Handle, StorageError> {
        if self.file.is_none() {
            self.open()?;
        }
        let canonical = self.validate(row)?;
        self.append(&canonical)
    }

    /// Marshal and append to the last page, rolling over to a fresh page
    /// exactly once on `NoRoom`. A second `NoRoom` means the row cannot
    /// fit on any single page and is fatal.
    fn append(&mut self, row: &Row) -> Result<Handle, StorageError> {
        let bytes = self.marshal(row)?;
        let file = self.file_mut()?;
        let block_id = file.get_last_block_id();
        let mut page = file.get(block_id)?;

        let record_id = match page.add(&bytes) {
            Ok(id) => id,
            Err(StorageError::NoRoom(_)) => {
                let mut new_page = file.get_new()?;
                let id = new_page.add(&bytes).map_err(|_| {
                    StorageError::Storage(format!(
                        "row of {} bytes does not fit on an empty page",
                        bytes.len()
                    ))
                })?;
                file.put(&new_page)?;
                return Ok(Handle::new(new_page.block_id(), id));
            }
            Err(e) => return Err(e),
        };
        file.put(&page)?;
        Ok(Handle::new(page.block_id(), record_id))
    }

    /// Every live handle across every block, in ascending (block_id,
    /// record_id) order. `_where` is accepted but never evaluated here;
    /// filtering belongs to a planner layered above this core.
    pub fn select(&mut self, _where: Option<&Row>) -> Result<Vec<Handle>, StorageError> {
        let file = self.file_mut()?;
        let mut handles = Vec::new();
        for block_id in file.block_ids() {
            let page = file.get(block_id)?;
            for record_id in page.ids() {
                handles.push(Handle::new(block_id, record_id));
            }
        }
        Ok(handles)
    }

    pub fn project(&mut self, handle: Handle) -> Result<Row, StorageError> {
        let file = self.file_mut()?;
        let page = file.get(handle.block_id)?;
        let bytes = page.get(handle.record_id).ok_or_else(|| {
            StorageError::Storage(format!("no record at handle {}", handle))
        })?;
        self.unmarshal(&bytes)
    }

    /// Same as `project`, restricted to the named columns. Callers
    /// tolerate names absent from the schema by simply not seeing them
    /// in the result.
    pub fn project_columns(
        &mut self,
        handle: Handle,
        column_names: &[&str],
    ) -> Result<Row, StorageError> {
        let full = self.project(handle)?;
        let mut projected = Row::new();
        for &name in column_names {
            if let Some(v) = full.get(name) {
                projected.insert(name.to_string(), v.clone());
            } else {
                warn!("project_columns: column '{}' not found in row", name);
            }
        }
        Ok(projected)
    }

    /// Encode `row` in schema-column order: INT as 4 little-endian
    /// bytes, TEXT as a 2-byte little-endian length prefix followed by
    /// the raw bytes.
    fn marshal(&self, row: &Row) -> Result<Vec<u8>, StorageError> {
        let mut buf = Vec::new();
        for column in self.schema.columns() {
            let value = row.get(&column.name).ok_or_else(|| {
                StorageError::Schema(format!("missing value for column '{}'", column.name))
            })?;
            match (column.col_type, value) {
                (ColumnType::Int, Value::Int(n)) => buf.extend_from_slice(&n.to_le_bytes()),
                (ColumnType::Text, Value::Text(bytes)) => {
                    let len: u16 = bytes.len().try_into().map_err(|_| {
                        StorageError::Schema(format!(
                            "column '{}' text value too long to length-prefix",
                            column.name
                        ))
                    })?;
                    buf.extend_from_slice(&len.to_le_bytes());
                    buf.extend_from_slice(bytes);
                }
                (expected, got) => {
                    return Err(StorageError::Schema(format!(
                        "column '{}' expects {} but got {}",
                        column.name,
                        expected,
                        got.column_type()
                    )))
                }
            }
        }
        Ok(buf)
    }

    /// The exact inverse of `marshal`, consuming columns in schema order.
    fn unmarshal(&self, bytes: &[u8]) -> Result<Row, StorageError> {
        let mut row = Row::new();
        let mut pos = 0usize;
        for column in self.schema.columns() {
            match column.col_type {
                ColumnType::Int => {
                    let end = pos + 4;
                    let raw: [u8; 4] = bytes.get(pos..end).ok_or_else(truncated)?.try_into().map_err(|_| truncated())?;
                    row.insert(column.name.clone(), Value::Int(i32::from_le_bytes(raw)));
                    pos = end;
                }
                ColumnType::Text => {
                    let len_end = pos + 2;
                    let len_raw: [u8; 2] = bytes
                        .get(pos..len_end)
                        .ok_or_else(truncated)?
                        .try_into()
                        .map_err(|_| truncated())?;
                    let len = u16::from_le_bytes(len_raw) as usize;
                    let data_end = len_end + len;
                    let data = bytes.get(len_end..data_end).ok_or_else(truncated)?;
                    row.insert(column.name.clone(), Value::Text(data.to_vec()));
                    pos = data_end;
                }
            }
        }
        Ok(row)
    }
}

fn truncated() -> StorageError {
    StorageError::Storage("record bytes truncated relative to schema".to_string())
}
