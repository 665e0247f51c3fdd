// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Recorder: a [`Canvas`] that records instead of drawing.
//!
//! [`Recorder`] borrows an [`understory_record::Record`] and appends exactly
//! one [`RecordOp`] for each canvas call it receives. Arguments are copied
//! into the entry according to their kind (see [`materialize`]), so the
//! caller's values may be dropped or reused as soon as a call returns.
//!
//! State-changing calls are forwarded to a [`SurfaceState`] before the entry
//! is built. Entries for clips and restores therefore carry the device clip
//! bounds and matrix in effect after the call, which lets a player skip
//! clipped-out work without replaying the whole state machine.
//!
//! Layer saves are recorded but never materialized on the surface; the
//! recorder tracks which saves are layers in a small [`SaveStack`] so callers
//! can ask [`Recorder::is_drawing_to_layer`].
//!
//! Drawables are retained in a side table indexed by call order. Use
//! [`Recorder::new_drawable_snapshot`] to turn them into pictures at the end
//! of recording.
//!
//! # Example
//!
//! ```
//! use understory_record::{Canvas, Color, Paint, Rect, Record, RecordOp, SaveLayerFlags};
//! use understory_recorder::Recorder;
//!
//! let mut record = Record::new();
//! {
//!     let mut recorder = Recorder::new(&mut record, 100, 100);
//!     recorder.save_layer(None, None, SaveLayerFlags::empty());
//!     assert!(recorder.is_drawing_to_layer());
//!     recorder.draw_rect(&Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::from_color(Color::WHITE));
//!     recorder.restore();
//!     assert!(!recorder.is_drawing_to_layer());
//! }
//!
//! let names: Vec<_> = record.iter().map(RecordOp::name).collect();
//! assert_eq!(names, ["save_layer", "draw_rect", "restore"]);
//! ```
//!
//! # Logging
//!
//! The recorder emits [`tracing`] events: `debug` when it attaches to or
//! detaches from a record, `trace` for every appended entry, and `warn` for
//! misuse that debug builds also assert on.
//!
//! [`Canvas`]: understory_record::Canvas
//! [`RecordOp`]: understory_record::RecordOp

#![no_std]

extern crate alloc;

pub mod drawables;
pub mod materialize;
mod recorder;
pub mod save_stack;
pub mod surface;

pub use drawables::{DrawableList, DrawableSnapshot};
pub use materialize::{Deferred, delay_copy};
pub use recorder::{InvalidBounds, Recorder, SaveLayerStrategy};
pub use save_stack::SaveStack;
pub use surface::{ConservativeClip, SurfaceState};
