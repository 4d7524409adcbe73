//! The slotted page: a single fixed-size block holding variable-length
//! records addressed by a stable per-page record id.
//!
//! Layout (see module-level docs in `lib.rs` for the full picture):
//!   bytes[0..2)  num_records, u16 LE
//!   bytes[2..4)  end_free, u16 LE
//!   bytes[4*i..4*i+4) for i in [1..num_records]: (size, offset), u16 LE each
//!   payload bytes live above end_free, packed densely toward BLOCK_SZ
//!
//! A tombstone is a slot with size == 0 AND offset == 0. A live,
//! zero-length record has offset > 0 and is therefore distinguishable.

use common::error::StorageError;
use common::ids::{BlockId, RecordId};
use common::BLOCK_SZ;

const NUM_RECORDS_OFFSET: usize = 0;
const END_FREE_OFFSET: usize = 2;
/// Bytes of page header before the slot directory begins.
const HEADER_LEN: usize = 4;
/// Bytes of slot-directory entry per record id (2 for size, 2 for offset).
const SLOT_ENTRY_LEN: usize = 4;

pub struct SlottedPage {
    data: [u8; BLOCK_SZ],
    block_id: BlockId,
}

impl SlottedPage {
    /// Construct a page over `data`. If `is_new`, the header is
    /// initialized fresh; otherwise it is read back out of `data`
    /// (which is assumed to already hold a valid page image).
    pub fn new(data: [u8; BLOCK_SZ], block_id: BlockId, is_new: bool) -> Self {
        let mut page = SlottedPage { data, block_id };
        if is_new {
            page.set_num_records(0);
            page.set_end_free((BLOCK_SZ - 1) as u16);
        }
        page
    }

    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_SZ] {
        &self.data
    }

    fn read_u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.data[offset..offset + 2].try_into().unwrap())
    }

    fn write_u16_at(&mut self, offset: usize, value: u16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn num_records(&self) -> u16 {
        self.read_u16_at(NUM_RECORDS_OFFSET)
    }

    fn set_num_records(&mut self, n: u16) {
        self.write_u16_at(NUM_RECORDS_OFFSET, n);
    }

    fn end_free(&self) -> u16 {
        self.read_u16_at(END_FREE_OFFSET)
    }

    fn set_end_free(&mut self, v: u16) {
        self.write_u16_at(END_FREE_OFFSET, v);
    }

    fn slot_entry_offset(id: RecordId) -> usize {
        HEADER_LEN + (id as usize - 1) * SLOT_ENTRY_LEN
    }

    /// Returns (size, offset) for `id`. Does not check `id` is in range;
    /// callers are expected to have validated against `num_records`.
    fn get_slot(&self, id: RecordId) -> (u16, u16) {
        let off = Self::slot_entry_offset(id);
        (self.read_u16_at(off), self.read_u16_at(off + 2))
    }

    fn put_slot(&mut self, id: RecordId, size: u16, offset: u16) {
        let off = Self::slot_entry_offset(id);
        self.write_u16_at(off, size);
        self.write_u16_at(off + 2, offset);
    }

    /// `size <= end_free - 4*(num_records+1)`, computed in a wider
    /// integer so a near-full page doesn't underflow.
    pub fn has_room(&self, size: usize) -> bool {
        let consumed = SLOT_ENTRY_LEN as i64 * (self.num_records() as i64 + 1);
        let available = self.end_free() as i64 - consumed;
        size as i64 <= available
    }

    /// Reserve space at the high end of the page for `bytes` and record
    /// it in a freshly allocated slot. Leaves the page untouched on
    /// failure.
    pub fn add(&mut self, bytes: &[u8]) -> Result<RecordId, StorageError> {
        if !self.has_room(bytes.len()) {
            return Err(StorageError::NoRoom(format!(
                "not enough room for a {}-byte record",
                bytes.len()
            )));
        }
        let size = bytes.len() as u16;
        let id = self.num_records() + 1;
        let new_end_free = self.end_free() - size;
        let loc = new_end_free + 1;

        self.set_num_records(id);
        self.set_end_free(new_end_free);
        self.put_slot(id, size, loc);
        self.data[loc as usize..loc as usize + size as usize].copy_from_slice(bytes);
        Ok(id)
    }

    /// Bytes stored for `id`, or `None` if `id` is out of range or a
    /// tombstone.
    pub fn get(&self, id: RecordId) -> Option<Vec<u8>> {
        if id == 0 || id > self.num_records() {
            return None;
        }
        let (size, offset) = self.get_slot(id);
        if offset == 0 {
            return None;
        }
        Some(self.data[offset as usize..offset as usize + size as usize].to_vec())
    }

    /// Replace the bytes stored for `id` in place, compacting the page
    /// as needed to grow or to reclaim a shrunk record's space.
    pub fn put(&mut self, id: RecordId, bytes: &[u8]) -> Result<(), StorageError> {
        let (size, loc) = self.get_slot(id);
        let new_size = bytes.len() as u16;

        if new_size > size {
            let extra = new_size - size;
            if !self.has_room(extra as usize) {
                return Err(StorageError::NoRoom(format!(
                    "not enough room to grow record {} by {} bytes",
                    id, extra
                )));
            }
            self.slide(loc, loc - extra);
            let new_loc = loc - extra;
            self.data[new_loc as usize..new_loc as usize + new_size as usize]
                .copy_from_slice(bytes);
        } else {
            self.data[loc as usize..loc as usize + new_size as usize].copy_from_slice(bytes);
            self.slide(loc + new_size, loc + size);
        }

        let (_, final_loc) = self.get_slot(id);
        self.put_slot(id, new_size, final_loc);
        Ok(())
    }

    /// Tombstone `id` and reclaim its space. A no-op error if `id` does
    /// not name a live record.
    pub fn del(&mut self, id: RecordId) -> Result<(), StorageError> {
        if id == 0 || id > self.num_records() {
            return Err(StorageError::Storage(format!(
                "no such record id {}",
                id
            )));
        }
        let (size, loc) = self.get_slot(id);
        if loc == 0 {
            return Err(StorageError::Storage(format!(
                "record {} already deleted",
                id
            )));
        }
        self.put_slot(id, 0, 0);
        self.slide(loc, loc + size);
        Ok(())
    }

    /// Every live record id, ascending.
    pub fn ids(&self) -> Vec<RecordId> {
        (1..=self.num_records())
            .filter(|&id| self.get_slot(id).1 != 0)
            .collect()
    }

    /// Move the contiguous byte range `[end_free+1, start)` to
    /// `[end_free+1+shift, start+shift)` where `shift = end - start`,
    /// then fix up every live slot whose offset lies at or below
    /// `start`. This is the page's compaction primitive: `put` and
    /// `del` both reduce to a single `slide`.
    fn slide(&mut self, start: u16, end: u16) {
        let shift = end as i32 - start as i32;
        if shift == 0 {
            return;
        }

        let old_start = self.end_free() as i32 + 1;
        let len = start as i32 - old_start;
        if len > 0 {
            let new_start = (old_start + shift) as usize;
            self.data
                .copy_within(old_start as usize..start as usize, new_start);
        }

        for id in self.ids() {
            let (size, offset) = self.get_slot(id);
            if offset as i32 <= start as i32 {
                self.put_slot(id, size, (offset as i32 + shift) as u16);
            }
        }

        self.set_end_free((self.end_free() as i32 + shift) as u16);
    }
}
