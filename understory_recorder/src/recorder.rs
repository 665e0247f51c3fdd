// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::ffi::CStr;
use core::fmt;

use kurbo::{Affine, Point, Rect, RoundedRect};
use peniko::{BlendMode, Color};
use tracing::{debug, trace, warn};
use understory_record::{
    BBoxHierarchyFactory, Bitmap, BitmapRectFlags, Canvas, ClipEdgeStyle, ClipOpAndAa, Drawable,
    IRect, Image, PATCH_CONTROL_POINTS, PATCH_CORNERS, Paint, Path, Picture, PointMode, Record,
    RecordFlags, RecordOp, Region, RegionOp, SaveLayerFlags, TextBlob, VertexMode,
};

use crate::drawables::{DrawableList, DrawableSnapshot};
use crate::materialize::{copy, copy_bytes, copy_cstr, copy_slice, delay_copy};
use crate::save_stack::SaveStack;
use crate::surface::{ConservativeClip, SurfaceState};

/// How the surface underneath a recorder should handle a layer save.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SaveLayerStrategy {
    /// The surface allocates and composites the layer itself.
    FullLayer,
    /// The surface only saves state; the layer exists in the record alone.
    NoLayer,
}

/// Error returned by [`Recorder::from_bounds`] for bounds that cannot be
/// rounded to device pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InvalidBounds {
    /// The rejected bounds.
    pub bounds: Rect,
}

impl fmt::Display for InvalidBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recorder bounds {:?} are not finite", self.bounds)
    }
}

impl core::error::Error for InvalidBounds {}

/// A [`Canvas`] that appends one [`RecordOp`] per call instead of drawing.
///
/// The recorder borrows its [`Record`] for as long as it lives. Clip, matrix,
/// save, and restore calls are applied to the [`SurfaceState`] first, so the
/// device bounds and matrices stored in entries are the ones in effect right
/// after the call.
///
/// Drawables passed to [`Canvas::draw_drawable`] are retained until the
/// recorder is dropped or [`Recorder::forget_record`] is called.
#[derive(Debug)]
pub struct Recorder<'r, S = ConservativeClip> {
    record: Option<&'r mut Record>,
    surface: S,
    saves: SaveStack,
    drawables: DrawableList,
}

impl<'r> Recorder<'r> {
    /// Create a recorder for a `width` × `height` device.
    pub fn new(record: &'r mut Record, width: u32, height: u32) -> Self {
        let device = IRect::from_wh(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        Self::with_surface(record, ConservativeClip::new(device))
    }

    /// Create a recorder whose device covers `bounds` rounded outward.
    pub fn from_bounds(record: &'r mut Record, bounds: Rect) -> Result<Self, InvalidBounds> {
        if !bounds.is_finite() {
            return Err(InvalidBounds { bounds });
        }
        let device = IRect::round_out(bounds);
        Ok(Self::with_surface(record, ConservativeClip::new(device)))
    }
}

impl<'r, S: SurfaceState> Recorder<'r, S> {
    /// Create a recorder on top of an existing surface state tracker.
    pub fn with_surface(record: &'r mut Record, surface: S) -> Self {
        debug!(
            device_bounds = ?surface.device_clip_bounds(),
            start_len = record.len(),
            "recorder attached"
        );
        Self {
            record: Some(record),
            surface,
            saves: SaveStack::new(),
            drawables: DrawableList::new(),
        }
    }

    /// Returns `true` while any layer save is open.
    #[inline]
    pub fn is_drawing_to_layer(&self) -> bool {
        self.saves.is_drawing_to_layer()
    }

    /// Number of open layer saves.
    #[inline]
    pub fn active_layer_count(&self) -> usize {
        self.saves.layer_count()
    }

    /// Number of unmatched save or layer save calls.
    #[inline]
    pub fn save_depth(&self) -> usize {
        self.saves.depth()
    }

    /// Number of drawables retained so far.
    #[inline]
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// The surface state tracker.
    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Snapshot every drawable recorded so far into a picture.
    ///
    /// Returns `None` if no drawable was recorded. Otherwise the snapshot
    /// holds one picture per [`Canvas::draw_drawable`] call, in call order,
    /// so the index stored in each [`RecordOp::DrawDrawable`] selects its
    /// picture.
    pub fn new_drawable_snapshot(
        &self,
        factory: Option<&dyn BBoxHierarchyFactory>,
        flags: RecordFlags,
    ) -> Option<DrawableSnapshot> {
        self.drawables.snapshot_all(factory, flags)
    }

    /// Release all retained drawables and detach from the record.
    ///
    /// Calling this again does nothing. Drawing after this call is a caller
    /// bug: debug builds panic and release builds drop the call.
    pub fn forget_record(&mut self) {
        if self.record.is_none() {
            return;
        }
        debug!(released = self.drawables.len(), "recorder detached");
        self.drawables.release_all();
        self.record = None;
    }

    fn append(&mut self, build: impl FnOnce(&mut Record) -> RecordOp) {
        let Some(record) = self.record.as_deref_mut() else {
            report_detached();
            return;
        };
        let op = build(record);
        let name = op.name();
        let index = record.append(op);
        trace!(op = name, index, "append");
    }

    fn dev_bounds(&self) -> Rect {
        self.surface.device_clip_bounds().to_rect()
    }

    fn will_save(&mut self) {
        self.saves.will_save();
        self.append(|_| RecordOp::Save);
    }

    fn will_save_layer(
        &mut self,
        bounds: Option<&Rect>,
        paint: Option<&Paint>,
        flags: SaveLayerFlags,
    ) -> SaveLayerStrategy {
        self.saves.will_save_layer();
        self.append(|r| RecordOp::SaveLayer {
            bounds: copy(r, bounds),
            paint: copy(r, paint),
            flags,
        });
        SaveLayerStrategy::NoLayer
    }

    fn did_restore(&mut self) {
        self.saves.did_restore();
        let dev_bounds = self.dev_bounds();
        let matrix = self.surface.total_matrix();
        self.append(|_| RecordOp::Restore { dev_bounds, matrix });
    }

    fn did_concat(&mut self) {
        let total = self.surface.total_matrix();
        self.did_set_matrix(total);
    }

    fn did_set_matrix(&mut self, matrix: Affine) {
        let total = self.surface.total_matrix();
        if !same_bits(matrix, total) {
            warn!(?matrix, ?total, "recorded matrix differs from surface matrix");
            debug_assert_eq!(matrix, total, "Recorder: matrix out of sync with surface");
        }
        self.append(|_| RecordOp::SetMatrix { matrix });
    }
}

impl<S: SurfaceState> Canvas for Recorder<'_, S> {
    fn save(&mut self) -> usize {
        let count = self.surface.save_count();
        self.will_save();
        self.surface.save();
        count
    }

    fn save_layer(
        &mut self,
        bounds: Option<&Rect>,
        paint: Option<&Paint>,
        flags: SaveLayerFlags,
    ) -> usize {
        let count = self.surface.save_count();
        let strategy = self.will_save_layer(bounds, paint, flags);
        debug_assert_eq!(strategy, SaveLayerStrategy::NoLayer);
        self.surface.save();
        count
    }

    fn restore(&mut self) {
        self.surface.restore();
        self.did_restore();
    }

    fn save_count(&self) -> usize {
        self.surface.save_count()
    }

    fn concat(&mut self, matrix: &Affine) {
        self.surface.concat(matrix);
        self.did_concat();
    }

    fn set_matrix(&mut self, matrix: &Affine) {
        self.surface.set_matrix(matrix);
        self.did_set_matrix(*matrix);
    }

    fn total_matrix(&self) -> Affine {
        self.surface.total_matrix()
    }

    fn device_clip_bounds(&self) -> IRect {
        self.surface.device_clip_bounds()
    }

    fn clip_rect(&mut self, rect: &Rect, op: RegionOp, edge_style: ClipEdgeStyle) {
        self.surface.clip_rect(rect, op, edge_style);
        let dev_bounds = self.dev_bounds();
        let rect = *rect;
        self.append(|_| RecordOp::ClipRect {
            dev_bounds,
            rect,
            op: ClipOpAndAa::from_edge_style(op, edge_style),
        });
    }

    fn clip_rrect(&mut self, rrect: &RoundedRect, op: RegionOp, edge_style: ClipEdgeStyle) {
        self.surface.clip_rrect(rrect, op, edge_style);
        let dev_bounds = self.dev_bounds();
        let rrect = *rrect;
        self.append(|_| RecordOp::ClipRRect {
            dev_bounds,
            rrect,
            op: ClipOpAndAa::from_edge_style(op, edge_style),
        });
    }

    fn clip_path(&mut self, path: &Path, op: RegionOp, edge_style: ClipEdgeStyle) {
        self.surface.clip_path(path, op, edge_style);
        let dev_bounds = self.dev_bounds();
        let path = delay_copy(path);
        self.append(|_| RecordOp::ClipPath {
            dev_bounds,
            path: path.into_owned(),
            op: ClipOpAndAa::from_edge_style(op, edge_style),
        });
    }

    fn clip_region(&mut self, region: &Region, op: RegionOp) {
        self.surface.clip_region(region, op);
        let dev_bounds = self.dev_bounds();
        let region = delay_copy(region);
        self.append(|_| RecordOp::ClipRegion {
            dev_bounds,
            region: region.into_owned(),
            op,
        });
    }

    fn clear(&mut self, color: Color) {
        self.append(|_| RecordOp::Clear { color });
    }

    fn draw_paint(&mut self, paint: &Paint) {
        let paint = delay_copy(paint);
        self.append(|_| RecordOp::DrawPaint {
            paint: paint.into_owned(),
        });
    }

    fn draw_points(&mut self, mode: PointMode, points: &[Point], paint: &Paint) {
        let paint = delay_copy(paint);
        self.append(|r| RecordOp::DrawPoints {
            paint: paint.into_owned(),
            mode,
            points: r.alloc_slice(points),
        });
    }

    fn draw_rect(&mut self, rect: &Rect, paint: &Paint) {
        let paint = delay_copy(paint);
        let rect = *rect;
        self.append(|_| RecordOp::DrawRect {
            paint: paint.into_owned(),
            rect,
        });
    }

    fn draw_oval(&mut self, oval: &Rect, paint: &Paint) {
        let paint = delay_copy(paint);
        let oval = *oval;
        self.append(|_| RecordOp::DrawOval {
            paint: paint.into_owned(),
            oval,
        });
    }

    fn draw_rrect(&mut self, rrect: &RoundedRect, paint: &Paint) {
        let paint = delay_copy(paint);
        let rrect = *rrect;
        self.append(|_| RecordOp::DrawRRect {
            paint: paint.into_owned(),
            rrect,
        });
    }

    fn draw_drrect(&mut self, outer: &RoundedRect, inner: &RoundedRect, paint: &Paint) {
        let paint = delay_copy(paint);
        let (outer, inner) = (*outer, *inner);
        self.append(|_| RecordOp::DrawDRRect {
            paint: paint.into_owned(),
            outer,
            inner,
        });
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let paint = delay_copy(paint);
        let path = delay_copy(path);
        self.append(|_| RecordOp::DrawPath {
            paint: paint.into_owned(),
            path: path.into_owned(),
        });
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f64, top: f64, paint: Option<&Paint>) {
        let bitmap = delay_copy(bitmap);
        self.append(|r| RecordOp::DrawBitmap {
            paint: copy(r, paint),
            bitmap: bitmap.into_owned(),
            left,
            top,
        });
    }

    fn draw_bitmap_rect_to_rect(
        &mut self,
        bitmap: &Bitmap,
        src: Option<&Rect>,
        dst: &Rect,
        paint: Option<&Paint>,
        flags: BitmapRectFlags,
    ) {
        let bitmap = delay_copy(bitmap);
        let dst = *dst;
        self.append(|r| RecordOp::DrawBitmapRectToRect {
            paint: copy(r, paint),
            bitmap: bitmap.into_owned(),
            src: copy(r, src),
            dst,
            flags,
        });
    }

    fn draw_bitmap_matrix(&mut self, bitmap: &Bitmap, matrix: &Affine, paint: Option<&Paint>) {
        let bitmap = delay_copy(bitmap);
        let matrix = *matrix;
        self.append(|r| RecordOp::DrawBitmapMatrix {
            paint: copy(r, paint),
            bitmap: bitmap.into_owned(),
            matrix,
        });
    }

    fn draw_bitmap_nine(
        &mut self,
        bitmap: &Bitmap,
        center: &IRect,
        dst: &Rect,
        paint: Option<&Paint>,
    ) {
        let bitmap = delay_copy(bitmap);
        let (center, dst) = (*center, *dst);
        self.append(|r| RecordOp::DrawBitmapNine {
            paint: copy(r, paint),
            bitmap: bitmap.into_owned(),
            center,
            dst,
        });
    }

    fn draw_image(&mut self, image: &Arc<Image>, left: f64, top: f64, paint: Option<&Paint>) {
        self.append(|r| RecordOp::DrawImage {
            paint: copy(r, paint),
            image: Arc::clone(image),
            left,
            top,
        });
    }

    fn draw_image_rect(
        &mut self,
        image: &Arc<Image>,
        src: Option<&Rect>,
        dst: &Rect,
        paint: Option<&Paint>,
    ) {
        let dst = *dst;
        self.append(|r| RecordOp::DrawImageRect {
            paint: copy(r, paint),
            image: Arc::clone(image),
            src: copy(r, src),
            dst,
        });
    }

    fn draw_sprite(&mut self, bitmap: &Bitmap, left: i32, top: i32, paint: Option<&Paint>) {
        let bitmap = delay_copy(bitmap);
        self.append(|r| RecordOp::DrawSprite {
            paint: copy(r, paint),
            bitmap: bitmap.into_owned(),
            left,
            top,
        });
    }

    fn draw_text(&mut self, text: &[u8], x: f64, y: f64, paint: &Paint) {
        let paint = delay_copy(paint);
        self.append(|r| RecordOp::DrawText {
            paint: paint.into_owned(),
            text: copy_bytes(r, text),
            x,
            y,
        });
    }

    fn draw_pos_text(&mut self, text: &[u8], pos: &[Point], paint: &Paint) {
        let paint = delay_copy(paint);
        let pos = glyph_prefix(pos, paint.get().count_text(text));
        self.append(|r| RecordOp::DrawPosText {
            paint: paint.into_owned(),
            text: copy_bytes(r, text),
            pos: r.alloc_slice(pos),
        });
    }

    fn draw_pos_text_h(&mut self, text: &[u8], xpos: &[f64], const_y: f64, paint: &Paint) {
        let paint = delay_copy(paint);
        let xpos = glyph_prefix(xpos, paint.get().count_text(text));
        self.append(|r| RecordOp::DrawPosTextH {
            paint: paint.into_owned(),
            text: copy_bytes(r, text),
            xpos: r.alloc_slice(xpos),
            const_y,
        });
    }

    fn draw_text_on_path(
        &mut self,
        text: &[u8],
        path: &Path,
        matrix: Option<&Affine>,
        paint: &Paint,
    ) {
        let paint = delay_copy(paint);
        let path = delay_copy(path);
        self.append(|r| RecordOp::DrawTextOnPath {
            paint: paint.into_owned(),
            text: copy_bytes(r, text),
            path: path.into_owned(),
            matrix: copy(r, matrix),
        });
    }

    fn draw_text_blob(&mut self, blob: &Arc<TextBlob>, x: f64, y: f64, paint: &Paint) {
        let paint = delay_copy(paint);
        self.append(|_| RecordOp::DrawTextBlob {
            paint: paint.into_owned(),
            blob: Arc::clone(blob),
            x,
            y,
        });
    }

    fn draw_picture(
        &mut self,
        picture: &Arc<Picture>,
        matrix: Option<&Affine>,
        paint: Option<&Paint>,
    ) {
        self.append(|r| RecordOp::DrawPicture {
            paint: copy(r, paint),
            picture: Arc::clone(picture),
            matrix: copy(r, matrix),
        });
    }

    fn draw_vertices(
        &mut self,
        mode: VertexMode,
        vertices: &[Point],
        texs: Option<&[Point]>,
        colors: Option<&[Color]>,
        blend: Option<BlendMode>,
        indices: Option<&[u16]>,
        paint: &Paint,
    ) {
        debug_assert!(
            texs.is_none_or(|t| t.len() == vertices.len()),
            "Recorder: one texture coordinate per vertex"
        );
        debug_assert!(
            colors.is_none_or(|c| c.len() == vertices.len()),
            "Recorder: one color per vertex"
        );
        let paint = delay_copy(paint);
        self.append(|r| RecordOp::DrawVertices {
            paint: paint.into_owned(),
            mode,
            vertices: r.alloc_slice(vertices),
            texs: copy_slice(r, texs),
            colors: copy_slice(r, colors),
            blend,
            indices: copy_slice(r, indices),
        });
    }

    fn draw_patch(
        &mut self,
        cubics: Option<&[Point; PATCH_CONTROL_POINTS]>,
        colors: Option<&[Color; PATCH_CORNERS]>,
        tex_coords: Option<&[Point; PATCH_CORNERS]>,
        blend: Option<BlendMode>,
        paint: &Paint,
    ) {
        let paint = delay_copy(paint);
        self.append(|r| RecordOp::DrawPatch {
            paint: paint.into_owned(),
            cubics: copy(r, cubics),
            colors: copy(r, colors),
            tex_coords: copy(r, tex_coords),
            blend,
        });
    }

    fn draw_drawable(&mut self, drawable: &Arc<dyn Drawable>) {
        if self.record.is_none() {
            report_detached();
            return;
        }
        let index = self.drawables.push(drawable);
        let bounds = drawable.bounds();
        self.append(|_| RecordOp::DrawDrawable { bounds, index });
    }

    fn push_cull(&mut self, rect: &Rect) {
        let rect = *rect;
        self.append(|_| RecordOp::PushCull { rect });
    }

    fn pop_cull(&mut self) {
        self.append(|_| RecordOp::PopCull);
    }

    fn begin_comment_group(&mut self, description: &CStr) {
        self.append(|r| RecordOp::BeginCommentGroup {
            description: copy_cstr(r, description),
        });
    }

    fn add_comment(&mut self, key: &CStr, value: &CStr) {
        self.append(|r| RecordOp::AddComment {
            key: copy_cstr(r, key),
            value: copy_cstr(r, value),
        });
    }

    fn end_comment_group(&mut self) {
        self.append(|_| RecordOp::EndCommentGroup);
    }

    fn draw_data(&mut self, data: &[u8]) {
        self.append(|r| RecordOp::DrawData {
            data: copy_bytes(r, data),
        });
    }
}

fn report_detached() {
    warn!("drawing call on a recorder that forgot its record");
    debug_assert!(false, "Recorder: drawing after forget_record");
}

/// Coefficient-wise bit equality, so NaN entries compare equal to themselves.
fn same_bits(a: Affine, b: Affine) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs())
        .all(|(x, y)| x.to_bits() == y.to_bits())
}

/// The first `count` per-glyph positions.
fn glyph_prefix<T>(positions: &[T], count: usize) -> &[T] {
    debug_assert!(
        positions.len() >= count,
        "Recorder: {count} glyphs but only {} positions",
        positions.len()
    );
    &positions[..count.min(positions.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn new_uses_size_as_device_bounds() {
        let mut record = Record::new();
        let recorder = Recorder::new(&mut record, 640, 480);
        assert_eq!(recorder.device_clip_bounds(), IRect::new(0, 0, 640, 480));
        assert_eq!(recorder.save_count(), 1);
        assert_eq!(recorder.save_depth(), 0);
    }

    #[test]
    fn new_saturates_oversized_dimensions() {
        let mut record = Record::new();
        let recorder = Recorder::new(&mut record, u32::MAX, 1);
        assert_eq!(recorder.device_clip_bounds().x1, i32::MAX);
    }

    #[test]
    fn from_bounds_rounds_outward() {
        let mut record = Record::new();
        let recorder = Recorder::from_bounds(&mut record, Rect::new(-0.5, 1.2, 10.1, 20.0))
            .expect("finite bounds");
        assert_eq!(recorder.device_clip_bounds(), IRect::new(-1, 1, 11, 20));
    }

    #[test]
    fn from_bounds_rejects_non_finite() {
        let mut record = Record::new();
        let bounds = Rect::new(0.0, 0.0, f64::INFINITY, 10.0);
        let err = Recorder::from_bounds(&mut record, bounds).unwrap_err();
        assert_eq!(err.bounds.x1, f64::INFINITY);
        assert!(err.to_string().contains("not finite"));
    }

    #[test]
    fn save_returns_count_before_push() {
        let mut record = Record::new();
        let mut recorder = Recorder::new(&mut record, 10, 10);
        assert_eq!(recorder.save(), 1);
        assert_eq!(recorder.save_layer(None, None, SaveLayerFlags::empty()), 2);
        assert_eq!(recorder.save_count(), 3);
        assert_eq!(recorder.active_layer_count(), 1);
    }

    #[test]
    fn save_layer_does_not_push_a_surface_layer() {
        let mut record = Record::new();
        let mut recorder = Recorder::new(&mut record, 10, 10);
        recorder.save_layer(None, None, SaveLayerFlags::CLIP_TO_LAYER);
        // The surface saw only a plain save, so its clip is untouched.
        assert_eq!(recorder.surface().device_clip_bounds(), IRect::from_wh(10, 10));
        assert_eq!(recorder.surface().save_count(), 2);
    }

    #[test]
    fn forget_record_is_idempotent() {
        let mut record = Record::new();
        let mut recorder = Recorder::new(&mut record, 10, 10);
        recorder.clear(Color::WHITE);
        recorder.forget_record();
        recorder.forget_record();
        assert_eq!(recorder.drawable_count(), 0);
        drop(recorder);
        assert_eq!(record.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "drawing after forget_record")]
    fn drawing_after_forget_panics_in_debug() {
        let mut record = Record::new();
        let mut recorder = Recorder::new(&mut record, 10, 10);
        recorder.forget_record();
        recorder.clear(Color::BLACK);
    }

    /// Keeps only the linear part of matrices passed to `set_matrix`.
    #[derive(Debug)]
    struct DropsTranslation(ConservativeClip);

    impl SurfaceState for DropsTranslation {
        fn save(&mut self) {
            self.0.save();
        }

        fn restore(&mut self) {
            self.0.restore();
        }

        fn save_count(&self) -> usize {
            self.0.save_count()
        }

        fn concat(&mut self, matrix: &Affine) {
            self.0.concat(matrix);
        }

        fn set_matrix(&mut self, matrix: &Affine) {
            let [a, b, c, d, _, _] = matrix.as_coeffs();
            self.0.set_matrix(&Affine::new([a, b, c, d, 0.0, 0.0]));
        }

        fn total_matrix(&self) -> Affine {
            self.0.total_matrix()
        }

        fn clip_rect(&mut self, rect: &Rect, op: RegionOp, edge_style: ClipEdgeStyle) {
            self.0.clip_rect(rect, op, edge_style);
        }

        fn clip_rrect(&mut self, rrect: &RoundedRect, op: RegionOp, edge_style: ClipEdgeStyle) {
            self.0.clip_rrect(rrect, op, edge_style);
        }

        fn clip_path(&mut self, path: &Path, op: RegionOp, edge_style: ClipEdgeStyle) {
            self.0.clip_path(path, op, edge_style);
        }

        fn clip_region(&mut self, region: &Region, op: RegionOp) {
            self.0.clip_region(region, op);
        }

        fn device_clip_bounds(&self) -> IRect {
            self.0.device_clip_bounds()
        }
    }

    fn drops_translation() -> DropsTranslation {
        DropsTranslation(ConservativeClip::new(IRect::from_wh(50, 40)))
    }

    #[derive(Debug)]
    struct Dot;

    impl Drawable for Dot {
        fn bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 1.0, 1.0)
        }

        fn new_picture_snapshot(
            &self,
            _factory: Option<&dyn BBoxHierarchyFactory>,
            _flags: RecordFlags,
        ) -> Arc<Picture> {
            Arc::new(Picture::new(Record::new(), self.bounds()))
        }
    }

    #[test]
    fn with_surface_records_through_the_injected_surface() {
        let mut record = Record::new();
        {
            let mut recorder = Recorder::with_surface(&mut record, drops_translation());
            assert_eq!(recorder.device_clip_bounds(), IRect::from_wh(50, 40));
            recorder.set_matrix(&Affine::scale(2.0));
            recorder.translate(3.0, 0.0);
            recorder.clip_rect(
                &Rect::new(0.0, 0.0, 10.0, 10.0),
                RegionOp::Intersect,
                ClipEdgeStyle::Hard,
            );
            assert_eq!(recorder.surface().device_clip_bounds(), IRect::new(6, 0, 26, 20));
        }

        let matrices: alloc::vec::Vec<_> = record
            .iter()
            .filter_map(|op| match op {
                RecordOp::SetMatrix { matrix } => Some(*matrix),
                _ => None,
            })
            .collect();
        assert_eq!(
            matrices,
            [
                Affine::scale(2.0),
                Affine::scale(2.0) * Affine::translate((3.0, 0.0)),
            ]
        );
        let Some(RecordOp::ClipRect { dev_bounds, .. }) = record.get(2) else {
            panic!("expected clip_rect");
        };
        assert_eq!(*dev_bounds, Rect::new(6.0, 0.0, 26.0, 20.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "matrix out of sync")]
    fn surface_rewriting_the_matrix_is_caught() {
        let mut record = Record::new();
        let mut recorder = Recorder::with_surface(&mut record, drops_translation());
        recorder.set_matrix(&Affine::translate((3.0, 4.0)));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn surface_rewriting_the_matrix_still_records_the_call() {
        let mut record = Record::new();
        {
            let mut recorder = Recorder::with_surface(&mut record, drops_translation());
            recorder.set_matrix(&Affine::translate((3.0, 4.0)));
        }
        assert!(matches!(
            record.get(0),
            Some(RecordOp::SetMatrix { matrix }) if *matrix == Affine::translate((3.0, 4.0))
        ));
    }

    #[test]
    fn nan_matrix_matches_itself() {
        let mut record = Record::new();
        {
            let mut recorder = Recorder::new(&mut record, 10, 10);
            recorder.set_matrix(&Affine::scale(f64::NAN));
        }
        let Some(RecordOp::SetMatrix { matrix }) = record.get(0) else {
            panic!("expected set_matrix");
        };
        assert!(matrix.as_coeffs()[0].is_nan());
        assert!(same_bits(*matrix, Affine::scale(f64::NAN)));
        assert!(!same_bits(Affine::IDENTITY, Affine::scale(2.0)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "drawing after forget_record")]
    fn draw_drawable_after_forget_panics_in_debug() {
        let mut record = Record::new();
        let mut recorder = Recorder::new(&mut record, 10, 10);
        let dot: Arc<dyn Drawable> = Arc::new(Dot);
        recorder.forget_record();
        recorder.draw_drawable(&dot);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn draw_drawable_after_forget_retains_nothing() {
        let mut record = Record::new();
        let dot: Arc<dyn Drawable> = Arc::new(Dot);
        {
            let mut recorder = Recorder::new(&mut record, 10, 10);
            recorder.forget_record();
            recorder.draw_drawable(&dot);
            assert_eq!(recorder.drawable_count(), 0);
            assert!(recorder.new_drawable_snapshot(None, RecordFlags::empty()).is_none());
        }
        assert_eq!(Arc::strong_count(&dot), 1);
        assert!(record.is_empty());
    }

    #[test]
    fn glyph_prefix_truncates_to_count() {
        let xs = [1.0, 2.0, 3.0];
        assert_eq!(glyph_prefix(&xs, 2), &[1.0, 2.0]);
        assert_eq!(glyph_prefix(&xs, 0), &[] as &[f64]);
    }
}
