// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record entries.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::ffi::CStr;

use kurbo::{Affine, Point, Rect, RoundedRect};
use peniko::{BlendMode, Color};

use crate::{Bitmap, IRect, Image, Paint, Path, Picture, Region, TextBlob};

/// Number of control points in a Coons patch.
pub const PATCH_CONTROL_POINTS: usize = 12;

/// Number of corners in a Coons patch.
pub const PATCH_CORNERS: usize = 4;

/// How [`RecordOp::DrawPoints`] interprets its points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointMode {
    /// Draw each point separately.
    #[default]
    Points,
    /// Draw each pair of points as a line segment.
    Lines,
    /// Draw the points as a connected polyline.
    Polygon,
}

/// Primitive topology of a vertex mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexMode {
    /// Every three vertices form a triangle.
    #[default]
    Triangles,
    /// Each vertex after the first two forms a triangle with the previous two.
    TriangleStrip,
    /// Each vertex after the first two forms a triangle with the first and previous.
    TriangleFan,
}

/// Boolean operation combining a new clip shape with the current clip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegionOp {
    /// Current clip minus the shape.
    Difference = 0,
    /// Current clip intersected with the shape.
    #[default]
    Intersect = 1,
    /// Current clip united with the shape.
    Union = 2,
    /// Pixels in exactly one of current clip and shape.
    Xor = 3,
    /// Shape minus the current clip.
    ReverseDifference = 4,
    /// Replace the current clip with the shape.
    Replace = 5,
}

impl RegionOp {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Difference,
            1 => Self::Intersect,
            2 => Self::Union,
            3 => Self::Xor,
            4 => Self::ReverseDifference,
            _ => Self::Replace,
        }
    }
}

/// Whether a clip edge is snapped to pixels or anti-aliased.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipEdgeStyle {
    /// Pixel-aligned edge.
    #[default]
    Hard,
    /// Anti-aliased edge.
    Soft,
}

/// A [`RegionOp`] and an anti-alias flag packed into a single byte.
///
/// The low seven bits hold the operation and the high bit holds the flag.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClipOpAndAa(u8);

impl ClipOpAndAa {
    const AA_BIT: u8 = 0x80;

    /// Pack `op` and `anti_alias`.
    #[inline]
    pub const fn new(op: RegionOp, anti_alias: bool) -> Self {
        let aa = if anti_alias { Self::AA_BIT } else { 0 };
        Self(op as u8 | aa)
    }

    /// Pack `op` with the anti-alias flag implied by `edge_style`.
    #[inline]
    pub const fn from_edge_style(op: RegionOp, edge_style: ClipEdgeStyle) -> Self {
        Self::new(op, matches!(edge_style, ClipEdgeStyle::Soft))
    }

    /// The region operation.
    #[inline]
    pub fn op(self) -> RegionOp {
        RegionOp::from_bits(self.0 & !Self::AA_BIT)
    }

    /// Whether the clip edge is anti-aliased.
    #[inline]
    pub const fn anti_alias(self) -> bool {
        self.0 & Self::AA_BIT != 0
    }

    /// The packed byte.
    #[inline]
    pub const fn to_bits(self) -> u8 {
        self.0
    }
}

impl core::fmt::Debug for ClipOpAndAa {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClipOpAndAa")
            .field("op", &self.op())
            .field("anti_alias", &self.anti_alias())
            .finish()
    }
}

bitflags::bitflags! {
    /// Which state a layer save preserves and how its buffer is allocated.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SaveLayerFlags: u32 {
        /// Save the matrix.
        const MATRIX = 1 << 0;
        /// Save the clip.
        const CLIP = 1 << 1;
        /// The layer needs an alpha channel.
        const HAS_ALPHA_LAYER = 1 << 2;
        /// The layer needs full 8-bit-per-channel precision.
        const FULL_COLOR_LAYER = 1 << 3;
        /// Clip to the layer bounds.
        const CLIP_TO_LAYER = 1 << 4;

        /// The usual flags for a clipped layer with alpha.
        const ARGB_CLIP_LAYER = Self::MATRIX.bits()
            | Self::CLIP.bits()
            | Self::HAS_ALPHA_LAYER.bits()
            | Self::FULL_COLOR_LAYER.bits()
            | Self::CLIP_TO_LAYER.bits();
        /// As [`SaveLayerFlags::ARGB_CLIP_LAYER`] without clipping to the layer bounds.
        const ARGB_NO_CLIP_LAYER = Self::MATRIX.bits()
            | Self::CLIP.bits()
            | Self::HAS_ALPHA_LAYER.bits()
            | Self::FULL_COLOR_LAYER.bits();
    }
}

bitflags::bitflags! {
    /// Options for [`RecordOp::DrawBitmapRectToRect`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BitmapRectFlags: u32 {
        /// Allow filtering to sample pixels outside the source rectangle.
        const BLEED = 1 << 0;
    }
}

/// One recorded drawing operation.
///
/// Optional arguments are `None` when the caller passed nothing; this is
/// distinct from `Some` of an empty array. Shared objects are held by `Arc`
/// and are never copied.
#[derive(Clone, Debug)]
pub enum RecordOp {
    /// Fill the whole clip with a color.
    Clear {
        /// Fill color.
        color: Color,
    },
    /// Fill the whole clip with a paint.
    DrawPaint {
        /// Paint to fill with.
        paint: Paint,
    },
    /// Draw points, lines, or a polyline.
    DrawPoints {
        /// Paint used for drawing.
        paint: Paint,
        /// How points are interpreted.
        mode: PointMode,
        /// The points, in call order.
        points: Box<[Point]>,
    },
    /// Draw a rectangle.
    DrawRect {
        /// Paint used for drawing.
        paint: Paint,
        /// Rectangle in local coordinates.
        rect: Rect,
    },
    /// Draw an oval inscribed in a rectangle.
    DrawOval {
        /// Paint used for drawing.
        paint: Paint,
        /// Bounds of the oval.
        oval: Rect,
    },
    /// Draw a rounded rectangle.
    DrawRRect {
        /// Paint used for drawing.
        paint: Paint,
        /// The rounded rectangle.
        rrect: RoundedRect,
    },
    /// Draw the area between two rounded rectangles.
    DrawDRRect {
        /// Paint used for drawing.
        paint: Paint,
        /// Outer boundary.
        outer: RoundedRect,
        /// Inner boundary, excluded from the drawn area.
        inner: RoundedRect,
    },
    /// Draw a drawable retained by the recorder.
    DrawDrawable {
        /// Bounds reported by the drawable when it was recorded.
        bounds: Rect,
        /// Position of the drawable in the recorder's drawable table.
        index: usize,
    },
    /// Draw a path.
    DrawPath {
        /// Paint used for drawing.
        paint: Paint,
        /// The path.
        path: Path,
    },
    /// Draw a bitmap with its top-left corner at a point.
    DrawBitmap {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The bitmap.
        bitmap: Bitmap,
        /// Left edge in local coordinates.
        left: f64,
        /// Top edge in local coordinates.
        top: f64,
    },
    /// Draw a bitmap, or part of it, scaled into a destination rectangle.
    DrawBitmapRectToRect {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The bitmap.
        bitmap: Bitmap,
        /// Optional source rectangle in bitmap pixels; the whole bitmap if `None`.
        src: Option<Box<Rect>>,
        /// Destination rectangle in local coordinates.
        dst: Rect,
        /// Sampling flags.
        flags: BitmapRectFlags,
    },
    /// Draw a bitmap under an extra transform.
    DrawBitmapMatrix {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The bitmap.
        bitmap: Bitmap,
        /// Transform applied to the bitmap.
        matrix: Affine,
    },
    /// Draw a bitmap as a nine-patch.
    DrawBitmapNine {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The bitmap.
        bitmap: Bitmap,
        /// Stretchable center, in bitmap pixels.
        center: IRect,
        /// Destination rectangle in local coordinates.
        dst: Rect,
    },
    /// Draw an image with its top-left corner at a point.
    DrawImage {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The shared image.
        image: Arc<Image>,
        /// Left edge in local coordinates.
        left: f64,
        /// Top edge in local coordinates.
        top: f64,
    },
    /// Draw an image, or part of it, scaled into a destination rectangle.
    DrawImageRect {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The shared image.
        image: Arc<Image>,
        /// Optional source rectangle in image pixels.
        src: Option<Box<Rect>>,
        /// Destination rectangle in local coordinates.
        dst: Rect,
    },
    /// Draw a bitmap in device space, ignoring the matrix.
    DrawSprite {
        /// Optional paint.
        paint: Option<Box<Paint>>,
        /// The bitmap.
        bitmap: Bitmap,
        /// Left edge in device pixels.
        left: i32,
        /// Top edge in device pixels.
        top: i32,
    },
    /// Draw text at a baseline origin.
    DrawText {
        /// Paint used for drawing; also defines the text encoding.
        paint: Paint,
        /// Encoded text bytes.
        text: Box<[u8]>,
        /// Baseline origin X.
        x: f64,
        /// Baseline origin Y.
        y: f64,
    },
    /// Draw text with one position per glyph.
    DrawPosText {
        /// Paint used for drawing.
        paint: Paint,
        /// Encoded text bytes.
        text: Box<[u8]>,
        /// Glyph positions.
        pos: Box<[Point]>,
    },
    /// Draw text with one X position per glyph on a shared baseline.
    DrawPosTextH {
        /// Paint used for drawing.
        paint: Paint,
        /// Encoded text bytes.
        text: Box<[u8]>,
        /// Glyph X positions.
        xpos: Box<[f64]>,
        /// Shared baseline Y.
        const_y: f64,
    },
    /// Draw text along a path.
    DrawTextOnPath {
        /// Paint used for drawing.
        paint: Paint,
        /// Encoded text bytes.
        text: Box<[u8]>,
        /// Path the text follows.
        path: Path,
        /// Optional extra transform applied to each glyph.
        matrix: Option<Box<Affine>>,
    },
    /// Draw a shared text blob at an origin.
    DrawTextBlob {
        /// Paint used for drawing.
        paint: Paint,
        /// The shared blob.
        blob: Arc<TextBlob>,
        /// Origin X.
        x: f64,
        /// Origin Y.
        y: f64,
    },
    /// Draw a nested picture.
    DrawPicture {
        /// Optional paint applied as a layer around the picture.
        paint: Option<Box<Paint>>,
        /// The shared picture.
        picture: Arc<Picture>,
        /// Optional transform concatenated before drawing.
        matrix: Option<Box<Affine>>,
    },
    /// Draw a triangle mesh.
    DrawVertices {
        /// Paint used for drawing.
        paint: Paint,
        /// Mesh topology.
        mode: VertexMode,
        /// Vertex positions.
        vertices: Box<[Point]>,
        /// Optional texture coordinates, one per vertex.
        texs: Option<Box<[Point]>>,
        /// Optional colors, one per vertex.
        colors: Option<Box<[Color]>>,
        /// Optional blend mode combining vertex colors with the paint.
        blend: Option<BlendMode>,
        /// Optional vertex indices.
        indices: Option<Box<[u16]>>,
    },
    /// Draw a Coons patch.
    DrawPatch {
        /// Paint used for drawing.
        paint: Paint,
        /// Cubic control points, clockwise from the top-left corner.
        cubics: Option<Box<[Point; PATCH_CONTROL_POINTS]>>,
        /// Optional corner colors.
        colors: Option<Box<[Color; PATCH_CORNERS]>>,
        /// Optional corner texture coordinates.
        tex_coords: Option<Box<[Point; PATCH_CORNERS]>>,
        /// Optional blend mode combining patch colors with the paint.
        blend: Option<BlendMode>,
    },
    /// Push a plain save frame.
    Save,
    /// Push a layer save frame.
    SaveLayer {
        /// Optional bounds hint for the layer.
        bounds: Option<Box<Rect>>,
        /// Optional paint used when compositing the layer.
        paint: Option<Box<Paint>>,
        /// Requested layer flags.
        flags: SaveLayerFlags,
    },
    /// Pop the most recent save frame.
    Restore {
        /// Device clip bounds after the restore.
        dev_bounds: Rect,
        /// Total matrix after the restore.
        matrix: Affine,
    },
    /// Begin a region that playback may skip when it lies outside the clip.
    PushCull {
        /// Bounds of the culled region.
        rect: Rect,
    },
    /// End the region started by the matching [`RecordOp::PushCull`].
    PopCull,
    /// Replace the total matrix.
    SetMatrix {
        /// The new total matrix.
        matrix: Affine,
    },
    /// Clip to a rectangle.
    ClipRect {
        /// Device clip bounds after applying the clip.
        dev_bounds: Rect,
        /// Clip rectangle in local coordinates.
        rect: Rect,
        /// Operation and edge style.
        op: ClipOpAndAa,
    },
    /// Clip to a rounded rectangle.
    ClipRRect {
        /// Device clip bounds after applying the clip.
        dev_bounds: Rect,
        /// Clip shape in local coordinates.
        rrect: RoundedRect,
        /// Operation and edge style.
        op: ClipOpAndAa,
    },
    /// Clip to a path.
    ClipPath {
        /// Device clip bounds after applying the clip.
        dev_bounds: Rect,
        /// Clip path in local coordinates.
        path: Path,
        /// Operation and edge style.
        op: ClipOpAndAa,
    },
    /// Clip to a device-space region.
    ClipRegion {
        /// Device clip bounds after applying the clip.
        dev_bounds: Rect,
        /// Clip region in device coordinates.
        region: Region,
        /// Operation.
        op: RegionOp,
    },
    /// Open a named group of comments.
    BeginCommentGroup {
        /// Group description.
        description: Box<CStr>,
    },
    /// Attach a key/value comment to the current group.
    AddComment {
        /// Comment key.
        key: Box<CStr>,
        /// Comment value.
        value: Box<CStr>,
    },
    /// Close the current comment group.
    EndCommentGroup,
    /// Opaque data for the playback target.
    DrawData {
        /// Payload bytes.
        data: Box<[u8]>,
    },
}

impl RecordOp {
    /// Short tag name of this entry, stable across releases.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::DrawPaint { .. } => "draw_paint",
            Self::DrawPoints { .. } => "draw_points",
            Self::DrawRect { .. } => "draw_rect",
            Self::DrawOval { .. } => "draw_oval",
            Self::DrawRRect { .. } => "draw_rrect",
            Self::DrawDRRect { .. } => "draw_drrect",
            Self::DrawDrawable { .. } => "draw_drawable",
            Self::DrawPath { .. } => "draw_path",
            Self::DrawBitmap { .. } => "draw_bitmap",
            Self::DrawBitmapRectToRect { .. } => "draw_bitmap_rect_to_rect",
            Self::DrawBitmapMatrix { .. } => "draw_bitmap_matrix",
            Self::DrawBitmapNine { .. } => "draw_bitmap_nine",
            Self::DrawImage { .. } => "draw_image",
            Self::DrawImageRect { .. } => "draw_image_rect",
            Self::DrawSprite { .. } => "draw_sprite",
            Self::DrawText { .. } => "draw_text",
            Self::DrawPosText { .. } => "draw_pos_text",
            Self::DrawPosTextH { .. } => "draw_pos_text_h",
            Self::DrawTextOnPath { .. } => "draw_text_on_path",
            Self::DrawTextBlob { .. } => "draw_text_blob",
            Self::DrawPicture { .. } => "draw_picture",
            Self::DrawVertices { .. } => "draw_vertices",
            Self::DrawPatch { .. } => "draw_patch",
            Self::Save => "save",
            Self::SaveLayer { .. } => "save_layer",
            Self::Restore { .. } => "restore",
            Self::PushCull { .. } => "push_cull",
            Self::PopCull => "pop_cull",
            Self::SetMatrix { .. } => "set_matrix",
            Self::ClipRect { .. } => "clip_rect",
            Self::ClipRRect { .. } => "clip_rrect",
            Self::ClipPath { .. } => "clip_path",
            Self::ClipRegion { .. } => "clip_region",
            Self::BeginCommentGroup { .. } => "begin_comment_group",
            Self::AddComment { .. } => "add_comment",
            Self::EndCommentGroup => "end_comment_group",
            Self::DrawData { .. } => "draw_data",
        }
    }
}
