// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry value types that the record stores alongside kurbo's.

use alloc::vec::Vec;

use kurbo::{BezPath, Rect, Shape};

use crate::FillRule;

/// An axis-aligned rectangle in integer device coordinates.
///
/// A rectangle with `x1 <= x0` or `y1 <= y0` is empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Minimum X coordinate.
    pub x0: i32,
    /// Minimum Y coordinate.
    pub y0: i32,
    /// Maximum X coordinate.
    pub x1: i32,
    /// Maximum Y coordinate.
    pub y1: i32,
}

impl IRect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle anchored at the origin with the given size.
    #[inline]
    pub const fn from_wh(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest integer rectangle that contains `rect`.
    ///
    /// Non-finite coordinates saturate to the `i32` range.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate; device coordinates fit comfortably in i32"
    )]
    pub fn round_out(rect: Rect) -> Self {
        let r = rect.abs().expand();
        Self::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }

    /// Width, or 0 when empty.
    #[inline]
    pub fn width(self) -> u32 {
        if self.is_empty() { 0 } else { self.x1.abs_diff(self.x0) }
    }

    /// Height, or 0 when empty.
    #[inline]
    pub fn height(self) -> u32 {
        if self.is_empty() { 0 } else { self.y1.abs_diff(self.y0) }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Intersection of two rectangles, [`IRect::EMPTY`] if they do not overlap.
    pub fn intersect(self, other: Self) -> Self {
        let r = Self::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        if r.is_empty() { Self::EMPTY } else { r }
    }

    /// Smallest rectangle containing both; empty inputs are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Convert to kurbo's rectangle type.
    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

/// A set of pixels in device space, stored as a list of rectangles.
///
/// Regions ignore the current transform when used for clipping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<IRect>,
}

impl Region {
    /// Create an empty region.
    #[inline]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Create a region covering a single rectangle.
    pub fn from_rect(rect: IRect) -> Self {
        let mut region = Self::new();
        region.add_rect(rect);
        region
    }

    /// Add `rect` to the region. Empty rectangles are skipped.
    pub fn add_rect(&mut self, rect: IRect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// The rectangles making up this region, in insertion order.
    #[inline]
    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bounding rectangle of the region.
    pub fn bounds(&self) -> IRect {
        self.rects
            .iter()
            .fold(IRect::EMPTY, |acc, rect| acc.union(*rect))
    }
}

/// Path geometry together with the fill rule used to fill or clip it.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    /// The path outline.
    pub geometry: BezPath,
    /// How the inside of the path is determined.
    pub fill_rule: FillRule,
}

impl Path {
    /// Create a non-zero path from the given geometry.
    #[inline]
    pub fn new(geometry: BezPath) -> Self {
        Self {
            geometry,
            fill_rule: FillRule::NonZero,
        }
    }

    /// Replace the fill rule.
    #[inline]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Bounding box of the control points.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.geometry.bounding_box()
    }
}

impl From<BezPath> for Path {
    #[inline]
    fn from(geometry: BezPath) -> Self {
        Self::new(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_out_covers_fractional_edges() {
        let r = IRect::round_out(Rect::new(0.5, 1.25, 9.5, 10.0));
        assert_eq!(r, IRect::new(0, 1, 10, 10));
    }

    #[test]
    fn round_out_normalizes_flipped_rects() {
        let r = IRect::round_out(Rect::new(10.0, 10.0, 0.0, 0.0));
        assert_eq!(r, IRect::new(0, 0, 10, 10));
    }

    #[test]
    fn full_range_width_does_not_overflow() {
        let wide = IRect::round_out(Rect::new(-3e9, 0.0, 3e9, 10.0));
        assert_eq!(wide.x0, i32::MIN);
        assert_eq!(wide.x1, i32::MAX);
        assert_eq!(wide.width(), u32::MAX);
        assert_eq!(wide.height(), 10);
        assert_eq!(IRect::new(5, 5, 1, 9).width(), 0);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = IRect::new(0, 0, 10, 10);
        let b = IRect::new(20, 20, 30, 30);
        assert_eq!(a.intersect(b), IRect::EMPTY);
        assert!(a.intersect(b).is_empty());
    }

    #[test]
    fn union_skips_empty_sides() {
        let a = IRect::new(5, 5, 10, 10);
        assert_eq!(IRect::EMPTY.union(a), a);
        assert_eq!(a.union(IRect::EMPTY), a);
        assert_eq!(a.union(IRect::new(0, 0, 1, 1)), IRect::new(0, 0, 10, 10));
    }

    #[test]
    fn region_bounds_span_all_rects() {
        let mut region = Region::from_rect(IRect::new(0, 0, 4, 4));
        region.add_rect(IRect::new(8, 2, 12, 6));
        region.add_rect(IRect::EMPTY);
        assert_eq!(region.rects().len(), 2);
        assert_eq!(region.bounds(), IRect::new(0, 0, 12, 6));
    }
}
