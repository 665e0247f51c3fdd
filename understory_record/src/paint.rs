// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::{BlendMode, Brush, Color};

use crate::StrokeStyle;

/// Which parts of a shape a [`Paint`] covers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaintStyle {
    /// Fill the interior.
    #[default]
    Fill,
    /// Stroke the outline using [`Paint::stroke`].
    Stroke,
    /// Fill the interior and stroke the outline.
    StrokeAndFill,
}

/// How the bytes passed to text drawing calls are interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 code units.
    #[default]
    Utf8,
    /// Native-endian UTF-16 code units.
    Utf16,
    /// Native-endian UTF-32 code points.
    Utf32,
    /// Native-endian 16-bit glyph ids.
    GlyphId,
}

/// Style descriptor for drawing calls.
///
/// A paint owns heap data (gradient stops, dash patterns), so copying one is
/// not free. The recorder copies each paint it records exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Brush used to shade covered pixels.
    pub brush: Brush,
    /// Fill, stroke, or both.
    pub style: PaintStyle,
    /// Stroke parameters, used when `style` strokes.
    pub stroke: StrokeStyle,
    /// Blend mode used when drawing with this paint.
    pub blend: BlendMode,
    /// Whether edges are anti-aliased.
    pub anti_alias: bool,
    /// Text size in user-space units.
    pub text_size: f32,
    /// Encoding of text passed alongside this paint.
    pub text_encoding: TextEncoding,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            brush: Brush::Solid(Color::BLACK),
            style: PaintStyle::Fill,
            stroke: StrokeStyle::new(1.0),
            blend: BlendMode::default(),
            anti_alias: false,
            text_size: 12.0,
            text_encoding: TextEncoding::Utf8,
        }
    }
}

impl Paint {
    /// Create a fill paint with the given brush.
    pub fn new(brush: impl Into<Brush>) -> Self {
        Self {
            brush: brush.into(),
            ..Self::default()
        }
    }

    /// Create a solid-color fill paint.
    #[inline]
    pub fn from_color(color: Color) -> Self {
        Self::new(Brush::Solid(color))
    }

    /// Switch to stroking with the given stroke parameters.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.style = PaintStyle::Stroke;
        self.stroke = stroke;
        self
    }

    /// Replace the text encoding.
    #[inline]
    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = encoding;
        self
    }

    /// Enable or disable anti-aliasing.
    #[inline]
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Number of glyphs `text` produces under this paint's encoding.
    ///
    /// Positioned-text calls carry one position per glyph, so this is also the
    /// number of positions they consume. Trailing partial code units are not
    /// counted.
    pub fn count_text(&self, text: &[u8]) -> usize {
        match self.text_encoding {
            TextEncoding::Utf8 => text.iter().filter(|b| (**b & 0xC0) != 0x80).count(),
            TextEncoding::Utf16 => {
                let units = text
                    .chunks_exact(2)
                    .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]));
                char::decode_utf16(units).count()
            }
            TextEncoding::Utf32 => text.len() / 4,
            TextEncoding::GlyphId => text.len() / 2,
        }
    }
}
