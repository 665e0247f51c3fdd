// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The side table of drawables a recorder keeps alive.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use understory_record::{BBoxHierarchyFactory, Drawable, Picture, RecordFlags};

/// Drawables retained by a recorder, indexed by first encounter.
///
/// Each [`DrawableList::push`] appends a new slot, even for a drawable that
/// is already present, so indices are never reused or renumbered.
#[derive(Debug, Default)]
pub struct DrawableList {
    drawables: Vec<Arc<dyn Drawable>>,
}

impl DrawableList {
    /// Create an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retain `drawable` in a new slot and return the slot index.
    pub fn push(&mut self, drawable: &Arc<dyn Drawable>) -> usize {
        self.drawables.push(Arc::clone(drawable));
        self.drawables.len() - 1
    }

    /// Number of retained drawables.
    #[inline]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Returns `true` if nothing is retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// The drawable at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Drawable>> {
        self.drawables.get(index)
    }

    /// Ask every retained drawable for a picture snapshot, in table order.
    ///
    /// Returns `None` when the table is empty.
    pub fn snapshot_all(
        &self,
        factory: Option<&dyn BBoxHierarchyFactory>,
        flags: RecordFlags,
    ) -> Option<DrawableSnapshot> {
        if self.drawables.is_empty() {
            return None;
        }
        let pictures = self
            .drawables
            .iter()
            .map(|drawable| drawable.new_picture_snapshot(factory, flags))
            .collect();
        Some(DrawableSnapshot { pictures })
    }

    /// Release every retained drawable.
    pub fn release_all(&mut self) {
        self.drawables.clear();
    }
}

/// Pictures produced by [`DrawableList::snapshot_all`].
///
/// Holds exactly one picture per recorded drawable, in the same order.
/// Dropping the snapshot releases every picture it holds.
#[derive(Debug)]
pub struct DrawableSnapshot {
    pictures: Box<[Arc<Picture>]>,
}

impl DrawableSnapshot {
    /// Number of pictures.
    #[inline]
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    /// Always `false`: empty snapshots are never produced.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// The pictures, indexed like the drawable table.
    #[inline]
    pub fn pictures(&self) -> &[Arc<Picture>] {
        &self.pictures
    }

    /// Take ownership of the pictures.
    #[inline]
    pub fn into_pictures(self) -> Box<[Arc<Picture>]> {
        self.pictures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use understory_record::{Rect, Record};

    #[derive(Debug)]
    struct Fixed {
        bounds: Rect,
        snapshots: Cell<u32>,
    }

    impl Fixed {
        fn new(width: f64) -> Self {
            Self {
                bounds: Rect::new(0.0, 0.0, width, width),
                snapshots: Cell::new(0),
            }
        }
    }

    impl Drawable for Fixed {
        fn bounds(&self) -> Rect {
            self.bounds
        }

        fn new_picture_snapshot(
            &self,
            _factory: Option<&dyn BBoxHierarchyFactory>,
            _flags: RecordFlags,
        ) -> Arc<Picture> {
            self.snapshots.set(self.snapshots.get() + 1);
            Arc::new(Picture::new(Record::new(), self.bounds))
        }
    }

    #[test]
    fn empty_table_has_no_snapshot() {
        let list = DrawableList::new();
        assert!(list.snapshot_all(None, RecordFlags::empty()).is_none());
    }

    #[test]
    fn push_retains_and_numbers_slots() {
        let mut list = DrawableList::new();
        let drawable: Arc<dyn Drawable> = Arc::new(Fixed::new(1.0));

        assert_eq!(list.push(&drawable), 0);
        assert_eq!(list.push(&drawable), 1);
        assert_eq!(Arc::strong_count(&drawable), 3);

        list.release_all();
        assert!(list.is_empty());
        assert_eq!(Arc::strong_count(&drawable), 1);
    }

    #[test]
    fn snapshot_matches_table_order() {
        let mut list = DrawableList::new();
        let small = Arc::new(Fixed::new(1.0));
        let large = Arc::new(Fixed::new(5.0));
        let small_dyn: Arc<dyn Drawable> = small.clone();
        let large_dyn: Arc<dyn Drawable> = large.clone();
        list.push(&small_dyn);
        list.push(&large_dyn);

        let snapshot = list
            .snapshot_all(None, RecordFlags::COMPUTE_SAVE_LAYER_INFO)
            .expect("two drawables were pushed");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.pictures()[0].cull_rect(), small.bounds);
        assert_eq!(snapshot.pictures()[1].cull_rect(), large.bounds);
        assert_eq!(small.snapshots.get(), 1);
        assert_eq!(large.snapshots.get(), 1);
    }

    #[test]
    fn dropping_snapshot_releases_pictures() {
        let mut list = DrawableList::new();
        let drawable: Arc<dyn Drawable> = Arc::new(Fixed::new(2.0));
        list.push(&drawable);

        let snapshot = list
            .snapshot_all(None, RecordFlags::empty())
            .expect("one drawable was pushed");
        let picture = Arc::clone(&snapshot.pictures()[0]);
        assert_eq!(Arc::strong_count(&picture), 2);
        drop(snapshot);
        assert_eq!(Arc::strong_count(&picture), 1);
    }
}
