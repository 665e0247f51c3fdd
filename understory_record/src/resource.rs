// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster and text resources referenced by draw entries.

use alloc::boxed::Box;
use alloc::sync::Arc;

use kurbo::{Point, Rect};

use crate::{ImageAlphaType, ImageFormat};

/// A raster surface whose pixels are shared between copies.
///
/// Cloning a bitmap bumps the reference count of its pixel storage rather
/// than copying pixels, so it is cheaper than a deep copy but still not free.
#[derive(Clone, Debug)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: ImageFormat,
    alpha_type: ImageAlphaType,
    pixels: Arc<[u8]>,
}

impl Bitmap {
    /// Wrap tightly packed, row-major pixel data.
    pub fn new(
        width: u32,
        height: u32,
        format: ImageFormat,
        alpha_type: ImageAlphaType,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            width,
            height,
            format,
            alpha_type,
            pixels: pixels.into(),
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Alpha encoding of the pixels.
    #[inline]
    pub fn alpha_type(&self) -> ImageAlphaType {
        self.alpha_type
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns `true` if both bitmaps share the same pixel storage.
    #[inline]
    pub fn shares_pixels_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Bounds of the bitmap at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// An immutable image, shared by reference.
///
/// Entries that draw images hold an `Arc<Image>` and never copy pixels.
#[derive(Debug)]
pub struct Image {
    /// The image's pixels.
    pub bitmap: Bitmap,
}

impl Image {
    /// Create an image from a bitmap.
    #[inline]
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// A run of shaped glyphs bound to a font, shared by reference.
#[derive(Debug)]
pub struct TextBlob {
    glyphs: Box<[u16]>,
    positions: Box<[Point]>,
    bounds: Rect,
}

impl TextBlob {
    /// Create a blob from glyph ids and their positions.
    ///
    /// Returns `None` if the two slices differ in length.
    pub fn new(glyphs: &[u16], positions: &[Point], bounds: Rect) -> Option<Self> {
        if glyphs.len() != positions.len() {
            return None;
        }
        Some(Self {
            glyphs: glyphs.into(),
            positions: positions.into(),
            bounds,
        })
    }

    /// Glyph ids.
    #[inline]
    pub fn glyphs(&self) -> &[u16] {
        &self.glyphs
    }

    /// Glyph origins, relative to the blob origin.
    #[inline]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Conservative bounds relative to the blob origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn bitmap_clones_share_pixels() {
        let bitmap = Bitmap::new(
            2,
            1,
            ImageFormat::Rgba8,
            ImageAlphaType::Alpha,
            vec![0_u8; 8],
        );
        let copy = bitmap.clone();
        assert!(copy.shares_pixels_with(&bitmap));
        assert_eq!(copy.bounds(), Rect::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn text_blob_rejects_mismatched_lengths() {
        let pos = [Point::ZERO, Point::new(4.0, 0.0)];
        assert!(TextBlob::new(&[1, 2, 3], &pos, Rect::ZERO).is_none());
        let blob = TextBlob::new(&[1, 2], &pos, Rect::ZERO).expect("lengths match");
        assert_eq!(blob.glyphs(), &[1, 2]);
    }
}
