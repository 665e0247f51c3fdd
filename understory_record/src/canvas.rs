// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::ffi::CStr;

use kurbo::{Affine, Point, Rect, RoundedRect};
use peniko::{BlendMode, Color};

use crate::{
    Bitmap, BitmapRectFlags, ClipEdgeStyle, Drawable, IRect, Image, PATCH_CONTROL_POINTS,
    PATCH_CORNERS, Paint, Path, Picture, PointMode, Region, RegionOp, SaveLayerFlags, TextBlob,
    VertexMode,
};

/// Immediate-mode 2D drawing surface.
///
/// This is the capability a rasterizer or a recorder implements. Clip and
/// matrix calls mutate persistent surface state that is scoped by
/// [`Canvas::save`] / [`Canvas::restore`]; draw calls use that state.
///
/// Borrowed arguments are only valid for the duration of the call. Shared
/// objects (`Arc` arguments) may be retained.
pub trait Canvas {
    /// Push a save frame and return the save count before the push.
    fn save(&mut self) -> usize;

    /// Push a save frame that also redirects drawing into a layer, composited
    /// on the matching restore. Returns the save count before the push.
    fn save_layer(
        &mut self,
        bounds: Option<&Rect>,
        paint: Option<&Paint>,
        flags: SaveLayerFlags,
    ) -> usize;

    /// Pop the most recent save frame.
    fn restore(&mut self);

    /// Number of save frames, including the base frame.
    fn save_count(&self) -> usize;

    /// Pre-multiply the total matrix by `matrix`.
    fn concat(&mut self, matrix: &Affine);

    /// Replace the total matrix.
    fn set_matrix(&mut self, matrix: &Affine);

    /// The current total matrix.
    fn total_matrix(&self) -> Affine;

    /// Bounds of the current clip in device pixels.
    fn device_clip_bounds(&self) -> IRect;

    /// Combine the clip with a rectangle.
    fn clip_rect(&mut self, rect: &Rect, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a rounded rectangle.
    fn clip_rrect(&mut self, rrect: &RoundedRect, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a path.
    fn clip_path(&mut self, path: &Path, op: RegionOp, edge_style: ClipEdgeStyle);

    /// Combine the clip with a device-space region.
    fn clip_region(&mut self, region: &Region, op: RegionOp);

    /// Fill the clip with `color`.
    fn clear(&mut self, color: Color);

    /// Fill the clip with `paint`.
    fn draw_paint(&mut self, paint: &Paint);

    /// Draw points, line segments, or a polyline.
    fn draw_points(&mut self, mode: PointMode, points: &[Point], paint: &Paint);

    /// Draw a rectangle.
    fn draw_rect(&mut self, rect: &Rect, paint: &Paint);

    /// Draw an oval inscribed in `oval`.
    fn draw_oval(&mut self, oval: &Rect, paint: &Paint);

    /// Draw a rounded rectangle.
    fn draw_rrect(&mut self, rrect: &RoundedRect, paint: &Paint);

    /// Draw the area between `outer` and `inner`.
    fn draw_drrect(&mut self, outer: &RoundedRect, inner: &RoundedRect, paint: &Paint);

    /// Draw a path.
    fn draw_path(&mut self, path: &Path, paint: &Paint);

    /// Draw a bitmap with its top-left corner at (`left`, `top`).
    fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f64, top: f64, paint: Option<&Paint>);

    /// Draw `src` of a bitmap (all of it if `None`) scaled into `dst`.
    fn draw_bitmap_rect_to_rect(
        &mut self,
        bitmap: &Bitmap,
        src: Option<&Rect>,
        dst: &Rect,
        paint: Option<&Paint>,
        flags: BitmapRectFlags,
    );

    /// Draw a bitmap under an extra transform.
    fn draw_bitmap_matrix(&mut self, bitmap: &Bitmap, matrix: &Affine, paint: Option<&Paint>);

    /// Draw a bitmap as a nine-patch with stretchable `center`.
    fn draw_bitmap_nine(
        &mut self,
        bitmap: &Bitmap,
        center: &IRect,
        dst: &Rect,
        paint: Option<&Paint>,
    );

    /// Draw an image with its top-left corner at (`left`, `top`).
    fn draw_image(&mut self, image: &Arc<Image>, left: f64, top: f64, paint: Option<&Paint>);

    /// Draw `src` of an image (all of it if `None`) scaled into `dst`.
    fn draw_image_rect(
        &mut self,
        image: &Arc<Image>,
        src: Option<&Rect>,
        dst: &Rect,
        paint: Option<&Paint>,
    );

    /// Draw a bitmap in device space at (`left`, `top`), ignoring the matrix.
    fn draw_sprite(&mut self, bitmap: &Bitmap, left: i32, top: i32, paint: Option<&Paint>);

    /// Draw encoded text at a baseline origin.
    fn draw_text(&mut self, text: &[u8], x: f64, y: f64, paint: &Paint);

    /// Draw encoded text with one position per glyph.
    fn draw_pos_text(&mut self, text: &[u8], pos: &[Point], paint: &Paint);

    /// Draw encoded text with one X position per glyph on baseline `const_y`.
    fn draw_pos_text_h(&mut self, text: &[u8], xpos: &[f64], const_y: f64, paint: &Paint);

    /// Draw encoded text along a path.
    fn draw_text_on_path(
        &mut self,
        text: &[u8],
        path: &Path,
        matrix: Option<&Affine>,
        paint: &Paint,
    );

    /// Draw a text blob at (`x`, `y`).
    fn draw_text_blob(&mut self, blob: &Arc<TextBlob>, x: f64, y: f64, paint: &Paint);

    /// Draw a nested picture.
    fn draw_picture(
        &mut self,
        picture: &Arc<Picture>,
        matrix: Option<&Affine>,
        paint: Option<&Paint>,
    );

    /// Draw a triangle mesh.
    ///
    /// `texs` and `colors`, when present, hold one entry per vertex.
    fn draw_vertices(
        &mut self,
        mode: VertexMode,
        vertices: &[Point],
        texs: Option<&[Point]>,
        colors: Option<&[Color]>,
        blend: Option<BlendMode>,
        indices: Option<&[u16]>,
        paint: &Paint,
    );

    /// Draw a Coons patch.
    fn draw_patch(
        &mut self,
        cubics: Option<&[Point; PATCH_CONTROL_POINTS]>,
        colors: Option<&[Color; PATCH_CORNERS]>,
        tex_coords: Option<&[Point; PATCH_CORNERS]>,
        blend: Option<BlendMode>,
        paint: &Paint,
    );

    /// Draw a drawable. The canvas may retain it.
    fn draw_drawable(&mut self, drawable: &Arc<dyn Drawable>);

    /// Begin a region that playback may skip if it lies outside the clip.
    fn push_cull(&mut self, rect: &Rect);

    /// End the most recent cull region.
    fn pop_cull(&mut self);

    /// Open a comment group.
    fn begin_comment_group(&mut self, description: &CStr);

    /// Add a key/value comment to the open group.
    fn add_comment(&mut self, key: &CStr, value: &CStr);

    /// Close the open comment group.
    fn end_comment_group(&mut self);

    /// Pass opaque bytes through to the playback target.
    fn draw_data(&mut self, data: &[u8]);

    /// Pre-translate the matrix.
    #[inline]
    fn translate(&mut self, dx: f64, dy: f64) {
        self.concat(&Affine::translate((dx, dy)));
    }

    /// Pre-scale the matrix.
    #[inline]
    fn scale(&mut self, sx: f64, sy: f64) {
        self.concat(&Affine::scale_non_uniform(sx, sy));
    }

    /// Pre-rotate the matrix by `radians`.
    #[inline]
    fn rotate(&mut self, radians: f64) {
        self.concat(&Affine::rotate(radians));
    }
}

/// Scoped helpers for [`Canvas`] implementations and callers.
///
/// Separate from [`Canvas`] so that `&mut dyn Canvas` stays usable.
pub trait CanvasExt: Canvas {
    /// Run `f` inside a save frame, restoring afterwards.
    ///
    /// Note: if `f` panics, the frame will not be restored.
    #[inline]
    fn with_save<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let out = f(self);
        self.restore();
        out
    }

    /// Run `f` inside a layer save frame, restoring afterwards.
    ///
    /// Note: if `f` panics, the layer will not be restored.
    #[inline]
    fn with_save_layer<R>(
        &mut self,
        bounds: Option<&Rect>,
        paint: Option<&Paint>,
        flags: SaveLayerFlags,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.save_layer(bounds, paint, flags);
        let out = f(self);
        self.restore();
        out
    }

    /// Restore until at most `count` save frames remain.
    ///
    /// Counts below 1 are treated as 1; the base frame is never popped.
    fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.save_count() > count {
            self.restore();
        }
    }
}

impl<C: Canvas + ?Sized> CanvasExt for C {}
