// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ffi::CStr;
use core::mem::size_of;

use crate::RecordOp;

/// An ordered, append-only log of [`RecordOp`] entries.
///
/// A record also owns the storage that entries copy their arguments into.
/// The `alloc*` methods hand out that storage and keep a running byte count
/// of it; entries built from them are then moved into the log with
/// [`Record::append`].
///
/// Entries cannot be mutated or removed once appended. Allocation failure
/// aborts the process rather than returning an error.
#[derive(Debug, Default)]
pub struct Record {
    ops: Vec<RecordOp>,
    arena_bytes: usize,
}

impl Record {
    /// Create an empty record.
    #[inline]
    pub const fn new() -> Self {
        Self {
            ops: Vec::new(),
            arena_bytes: 0,
        }
    }

    /// Create an empty record with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
            arena_bytes: 0,
        }
    }

    /// Append one entry and return its index.
    pub fn append(&mut self, op: RecordOp) -> usize {
        let index = self.ops.len();
        self.ops.push(op);
        index
    }

    /// Copy one value into record storage.
    pub fn alloc<T: Clone>(&mut self, value: &T) -> Box<T> {
        self.arena_bytes += size_of::<T>();
        Box::new(value.clone())
    }

    /// Copy a slice element by element into record storage.
    ///
    /// The copy has the same length and order as `src`.
    pub fn alloc_slice<T: Clone>(&mut self, src: &[T]) -> Box<[T]> {
        self.arena_bytes += size_of::<T>() * src.len();
        src.into()
    }

    /// Copy raw bytes into record storage in one pass.
    pub fn alloc_bytes(&mut self, src: &[u8]) -> Box<[u8]> {
        self.arena_bytes += src.len();
        Box::from(src)
    }

    /// Copy a nul-terminated string, terminator included, into record storage.
    pub fn alloc_cstr(&mut self, src: &CStr) -> Box<CStr> {
        self.arena_bytes += src.to_bytes_with_nul().len();
        Box::from(src)
    }

    /// Total bytes handed out by the `alloc*` methods so far.
    #[inline]
    pub fn arena_bytes(&self) -> usize {
        self.arena_bytes
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing has been appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// All entries in append order.
    #[inline]
    pub fn ops(&self) -> &[RecordOp] {
        &self.ops
    }

    /// The entry at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&RecordOp> {
        self.ops.get(index)
    }

    /// Iterate over entries in append order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, RecordOp> {
        self.ops.iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a RecordOp;
    type IntoIter = core::slice::Iter<'a, RecordOp>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
