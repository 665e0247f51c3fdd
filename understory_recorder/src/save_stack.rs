// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tracking for nested saves.

use smallvec::SmallVec;

/// Mirror of the surface's save stack that remembers which frames are layers.
///
/// Every plain save pushes `false` and every layer save pushes `true`; each
/// restore pops one frame. The number of `true` frames on the stack is kept
/// alongside so [`SaveStack::is_drawing_to_layer`] is O(1).
#[derive(Clone, Debug, Default)]
pub struct SaveStack {
    frames: SmallVec<[bool; 16]>,
    layer_count: usize,
}

impl SaveStack {
    /// Create an empty stack.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plain save.
    #[inline]
    pub fn will_save(&mut self) {
        self.frames.push(false);
    }

    /// Record a layer save.
    #[inline]
    pub fn will_save_layer(&mut self) {
        self.frames.push(true);
        self.layer_count += 1;
    }

    /// Pop the most recent frame and return whether it was a layer.
    ///
    /// # Panics
    ///
    /// Panics if no frame is open.
    pub fn did_restore(&mut self) -> bool {
        let Some(was_layer) = self.frames.pop() else {
            panic!("SaveStack: restore without a matching save");
        };
        if was_layer {
            self.layer_count -= 1;
        }
        was_layer
    }

    /// Number of open frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of open layer frames.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Returns `true` while at least one layer frame is open.
    #[inline]
    pub fn is_drawing_to_layer(&self) -> bool {
        self.layer_count > 0
    }
}
