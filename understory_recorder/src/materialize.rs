// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning borrowed call arguments into data a [`Record`] owns.
//!
//! Each argument kind has one policy:
//!
//! - Cheap `Copy` values are moved into the entry as-is.
//! - Expensive values are wrapped in [`Deferred`] at the call site and copied
//!   exactly once, when the entry is built.
//! - Optional values and arrays go through [`copy`] / [`copy_slice`]: `None`
//!   stays `None`, anything else is copied into record storage.
//! - Byte payloads and nul-terminated strings take the bulk paths
//!   [`copy_bytes`] / [`copy_cstr`].

use alloc::boxed::Box;
use core::ffi::CStr;

use understory_record::Record;

/// A borrow of an expensive value whose copy is postponed to entry construction.
///
/// Creating a `Deferred` never copies; [`Deferred::into_owned`] copies once.
#[derive(Debug)]
pub struct Deferred<'a, T>(&'a T);

impl<'a, T> Deferred<'a, T> {
    /// Borrow `value` until the entry that stores it is built.
    #[inline]
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }

    /// The borrowed value.
    #[inline]
    pub fn get(&self) -> &'a T {
        self.0
    }
}

impl<T: Clone> Deferred<'_, T> {
    /// Make the single copy that the entry keeps.
    #[inline]
    pub fn into_owned(self) -> T {
        self.0.clone()
    }
}

/// Shorthand for [`Deferred::new`].
#[inline]
pub fn delay_copy<T>(value: &T) -> Deferred<'_, T> {
    Deferred::new(value)
}

/// Copy an optional value into record storage.
#[inline]
pub fn copy<T: Clone>(record: &mut Record, src: Option<&T>) -> Option<Box<T>> {
    src.map(|value| record.alloc(value))
}

/// Copy an optional array into record storage, element by element.
///
/// `None` yields `None`; an empty slice yields an empty copy.
#[inline]
pub fn copy_slice<T: Clone>(record: &mut Record, src: Option<&[T]>) -> Option<Box<[T]>> {
    src.map(|values| record.alloc_slice(values))
}

/// Bulk-copy a byte payload into record storage.
#[inline]
pub fn copy_bytes(record: &mut Record, src: &[u8]) -> Box<[u8]> {
    record.alloc_bytes(src)
}

/// Copy a nul-terminated string, strlen + 1 bytes, into record storage.
#[inline]
pub fn copy_cstr(record: &mut Record, src: &CStr) -> Box<CStr> {
    record.alloc_cstr(src)
}
