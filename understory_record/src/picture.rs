// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finished recordings and the objects that produce them.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::Record;

bitflags::bitflags! {
    /// Options controlling how a picture snapshot is recorded.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RecordFlags: u32 {
        /// Gather per-layer bounds and paints while recording so playback can
        /// avoid unneeded layer allocations.
        const COMPUTE_SAVE_LAYER_INFO = 1 << 0;
    }
}

/// An immutable, finished record together with its cull rectangle.
///
/// Pictures are shared through `Arc<Picture>`; entries that draw a picture
/// reference it without copying its contents.
#[derive(Debug)]
pub struct Picture {
    record: Record,
    cull_rect: Rect,
}

impl Picture {
    /// Wrap a finished record.
    #[inline]
    pub fn new(record: Record, cull_rect: Rect) -> Self {
        Self { record, cull_rect }
    }

    /// The recorded entries.
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Bounds outside of which the picture draws nothing.
    #[inline]
    pub fn cull_rect(&self) -> Rect {
        self.cull_rect
    }
}

/// A spatial index over the bounds of recorded entries.
///
/// Building real hierarchies is left to implementors; the recorder only
/// passes factories through to [`Drawable::new_picture_snapshot`].
pub trait BBoxHierarchy: fmt::Debug {
    /// Register the bounds of the entry at `index`.
    fn insert(&mut self, index: usize, bounds: Rect);

    /// Indices of entries whose bounds may intersect `query`, in ascending order.
    fn search(&self, query: Rect) -> Vec<usize>;
}

/// Creates [`BBoxHierarchy`] instances for new pictures.
pub trait BBoxHierarchyFactory: fmt::Debug {
    /// Create an empty hierarchy for a picture with the given cull rectangle.
    fn create(&self, bounds: Rect) -> Box<dyn BBoxHierarchy>;
}

/// A self-contained drawing unit that can snapshot its content as a picture.
///
/// Canvases receive drawables as `Arc<dyn Drawable>` and may retain them
/// until the drawable is turned into a picture.
pub trait Drawable: fmt::Debug {
    /// Conservative bounds of everything the drawable draws.
    fn bounds(&self) -> Rect;

    /// Record the drawable's current content into a new picture.
    fn new_picture_snapshot(
        &self,
        factory: Option<&dyn BBoxHierarchyFactory>,
        flags: RecordFlags,
    ) -> Arc<Picture>;
}
