// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Record: append-only drawing command logs.
//!
//! This crate defines the data a drawing recorder produces and the surface
//! capability it implements:
//!
//! - [`RecordOp`]: one immutable entry per drawing, clip, matrix, or save
//!   operation.
//! - [`Record`]: the ordered, append-only log of entries, plus the storage
//!   entries copy their arguments into.
//! - [`Canvas`]: the immediate-mode drawing interface. A rasterizer would
//!   implement it by drawing; `understory_recorder` implements it by
//!   appending to a [`Record`].
//! - [`Picture`] and [`Drawable`]: finished records and the objects that
//!   snapshot themselves into them.
//!
//! # Argument ownership in entries
//!
//! Canvas arguments are borrowed for the duration of a call, while entries
//! outlive the call. Each field of a [`RecordOp`] is therefore one of:
//!
//! - a by-value copy of a cheap type ([`Rect`], [`Affine`], [`Color`], ...);
//! - an owned copy of an expensive value ([`Paint`], [`Path`], [`Bitmap`],
//!   [`Region`]);
//! - an optional copy in record storage, `None` when the caller passed nothing;
//! - an owned array or byte copy, where `None` is distinct from an empty copy;
//! - an `Arc` to a shared object ([`Image`], [`TextBlob`], [`Picture`]).
//!
//! # Example
//!
//! ```
//! use understory_record::{Color, Record, RecordOp};
//!
//! let mut record = Record::new();
//! record.append(RecordOp::Clear { color: Color::WHITE });
//! record.append(RecordOp::Save);
//!
//! let names: Vec<_> = record.iter().map(RecordOp::name).collect();
//! assert_eq!(names, ["clear", "save"]);
//! ```

#![no_std]

extern crate alloc;

mod canvas;
mod geometry;
mod op;
mod paint;
mod picture;
mod record;
mod resource;

pub use canvas::{Canvas, CanvasExt};
pub use geometry::{IRect, Path, Region};
pub use op::{
    BitmapRectFlags, ClipEdgeStyle, ClipOpAndAa, PATCH_CONTROL_POINTS, PATCH_CORNERS, PointMode,
    RecordOp, RegionOp, SaveLayerFlags, VertexMode,
};
pub use paint::{Paint, PaintStyle, TextEncoding};
pub use picture::{BBoxHierarchy, BBoxHierarchyFactory, Drawable, Picture, RecordFlags};
pub use record::Record;
pub use resource::{Bitmap, Image, TextBlob};

pub use kurbo::{Affine, BezPath, Point, Rect, RoundedRect};
pub use peniko::{BlendMode, Brush, Color, Fill as FillRule, ImageAlphaType, ImageFormat};

/// Stroke parameters carried by [`Paint`].
///
/// This is a re-export of [`kurbo::Stroke`], which captures width, joins,
/// caps, dashes, and related stroke parameters.
pub type StrokeStyle = kurbo::Stroke;
