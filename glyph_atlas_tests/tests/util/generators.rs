// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A bitmap generator whose output is easy to predict.

use glyph_atlas::{BitmapGenerator, BitmapMut, GeneratorAttributes, GlyphBox, GlyphError};

/// The value the [`PatternGenerator`] writes at `(x, y)` of `glyph`'s bitmap.
///
/// Never zero, so untouched atlas pixels can be told apart.
pub(crate) fn pattern(glyph: &GlyphBox, x: u32, y: u32, channel: usize) -> u8 {
    let mixed = glyph.index().wrapping_mul(31)
        ^ x.wrapping_mul(7)
        ^ y.wrapping_mul(13)
        ^ (channel as u32).wrapping_mul(101);
    (mixed % 255 + 1) as u8
}

/// Fills every glyph bitmap with [`pattern`], failing for a chosen set of glyph indices.
#[derive(Debug, Default)]
pub(crate) struct PatternGenerator {
    failing: Vec<u32>,
}

impl PatternGenerator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A generator that fails for every glyph index in `indices`.
    pub(crate) fn failing(indices: &[u32]) -> Self {
        Self {
            failing: indices.to_vec(),
        }
    }

    fn check(&self, glyph: &GlyphBox) -> Result<(), GlyphError> {
        if self.failing.contains(&glyph.index()) {
            return Err(GlyphError::Generation(format!(
                "glyph {} refuses to render",
                glyph.index()
            )));
        }
        Ok(())
    }
}

impl BitmapGenerator<u8> for PatternGenerator {
    fn generate(
        &self,
        glyph: &GlyphBox,
        _: &GeneratorAttributes,
        mut output: BitmapMut<'_, u8>,
    ) -> Result<(), GlyphError> {
        self.check(glyph)?;
        for y in 0..output.height() {
            for x in 0..output.width() {
                let pixel = output.pixel_mut(x, y).unwrap();
                for (channel, value) in pixel.iter_mut().enumerate() {
                    *value = pattern(glyph, x, y, channel);
                }
            }
        }
        Ok(())
    }
}

impl BitmapGenerator<f32> for PatternGenerator {
    fn generate(
        &self,
        glyph: &GlyphBox,
        _: &GeneratorAttributes,
        mut output: BitmapMut<'_, f32>,
    ) -> Result<(), GlyphError> {
        self.check(glyph)?;
        for y in 0..output.height() {
            for x in 0..output.width() {
                let pixel = output.pixel_mut(x, y).unwrap();
                for (channel, value) in pixel.iter_mut().enumerate() {
                    *value = f32::from(pattern(glyph, x, y, channel)) / 255.0;
                }
            }
        }
        Ok(())
    }
}
