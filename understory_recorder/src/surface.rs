// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The clip and matrix state that a recorder forwards mutations to.

use alloc::vec::Vec;

use kurbo::{Affine, Rect, RoundedRect};
use understory_record::{ClipEdgeStyle, IRect, Path, Region, RegionOp};

/// Persistent surface state tracked underneath a recording canvas.
///
/// The recorder applies every clip, matrix, save, and restore call here
/// before it appends the matching entry, so that [`device_clip_bounds`] and
/// [`total_matrix`] already reflect the call when the entry is built.
///
/// [`device_clip_bounds`]: SurfaceState::device_clip_bounds
/// [`total_matrix`]: SurfaceState::total_matrix
pub trait SurfaceState {
    /// Push a copy of the current state.
    fn save(&mut self);

    /// Pop back to the most recently saved state.
    fn restore(&mut self);

    /// Number of frames, including the base frame.
    fn save_count(&self) -> usize;

    /// Pre-multiply the total matrix by `matrix`.
    fn concat(&mut self, matrix: &Affine);

    /// Replace the total matrix.
    fn set_matrix(&mut self, matrix: &Affine);

    /// The current total matrix.
    fn total_matrix(&self) -> Affine;

    /// Combine the clip with a rectangle in local coordinates.
    fn clip_rect(&mut self, rect: &Rect, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a rounded rectangle in local coordinates.
    fn clip_rrect(&mut self, rrect: &RoundedRect, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a path in local coordinates.
    fn clip_path(&mut self, path: &Path, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a region in device coordinates.
    fn clip_region(&mut self, region: &Region, op: RegionOp);

    /// Bounds of the current clip in device pixels.
    fn device_clip_bounds(&self) -> IRect;
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Frame {
    matrix: Affine,
    clip: IRect,
}

/// A [`SurfaceState`] that keeps the clip as a conservative device rectangle.
///
/// Shapes are reduced to the pixel-aligned bounds of their transformed
/// bounding box before they are combined with the clip, which means the
/// tracked clip always contains the exact one:
///
/// - `Intersect` keeps the overlap of the clip and the shape.
/// - `Union` and `Xor` keep their combined bounds, limited to the device.
/// - `Replace` and `ReverseDifference` keep the shape, limited to the device.
/// - `Difference` leaves the clip unchanged.
#[derive(Clone, Debug)]
pub struct ConservativeClip {
    device: IRect,
    current: Frame,
    saved: Vec<Frame>,
}

impl ConservativeClip {
    /// Create a tracker whose clip starts as the whole `device` rectangle.
    pub fn new(device: IRect) -> Self {
        Self {
            device,
            current: Frame {
                matrix: Affine::IDENTITY,
                clip: device,
            },
            saved: Vec::new(),
        }
    }

    /// The full device rectangle.
    #[inline]
    pub fn device_bounds(&self) -> IRect {
        self.device
    }

    fn apply(&mut self, shape: IRect, op: RegionOp) {
        let clip = self.current.clip;
        self.current.clip = match op {
            RegionOp::Intersect => clip.intersect(shape),
            RegionOp::Union | RegionOp::Xor => clip.union(shape).intersect(self.device),
            RegionOp::Replace | RegionOp::ReverseDifference => shape.intersect(self.device),
            RegionOp::Difference => clip,
        };
    }

    fn device_shape(&self, local: Rect) -> IRect {
        IRect::round_out(self.current.matrix.transform_rect_bbox(local))
    }
}

impl SurfaceState for ConservativeClip {
    fn save(&mut self) {
        self.saved.push(self.current);
    }

    fn restore(&mut self) {
        // Popping the base frame is the caller's bug; the save stack reports it.
        if let Some(frame) = self.saved.pop() {
            self.current = frame;
        }
    }

    fn save_count(&self) -> usize {
        self.saved.len() + 1
    }

    fn concat(&mut self, matrix: &Affine) {
        self.current.matrix *= *matrix;
    }

    fn set_matrix(&mut self, matrix: &Affine) {
        self.current.matrix = *matrix;
    }

    fn total_matrix(&self) -> Affine {
        self.current.matrix
    }

    fn clip_rect(&mut self, rect: &Rect, op: RegionOp, _edge_style: ClipEdgeStyle) {
        let shape = self.device_shape(*rect);
        self.apply(shape, op);
    }

    fn clip_rrect(&mut self, rrect: &RoundedRect, op: RegionOp, _edge_style: ClipEdgeStyle) {
        let shape = self.device_shape(rrect.rect());
        self.apply(shape, op);
    }

    fn clip_path(&mut self, path: &Path, op: RegionOp, _edge_style: ClipEdgeStyle) {
        let shape = self.device_shape(path.bounds());
        self.apply(shape, op);
    }

    fn clip_region(&mut self, region: &Region, op: RegionOp) {
        self.apply(region.bounds(), op);
    }

    fn device_clip_bounds(&self) -> IRect {
        self.current.clip
    }
}
