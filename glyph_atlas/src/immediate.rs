// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generating glyphs one at a time into a growing atlas.

use crate::bitmap::{BitmapRef, Pixel};
use crate::dynamic_atlas::DynamicAtlas;
use crate::error::{AtlasError, GlyphError};
use crate::generator::{BitmapGenerator, GenerationReport, GeneratorAttributes, scratch_bitmap};
use crate::glyph_box::{GlyphBox, GlyphStatus};
use crate::storage::AtlasStorage;

/// Places and generates glyphs as they arrive.
///
/// Each inserted glyph gets a region in the [`DynamicAtlas`], which grows when full, and is
/// generated immediately on the calling thread. Regions of earlier glyphs never move.
#[derive(Debug)]
pub struct ImmediateAtlasGenerator<T, G> {
    atlas: DynamicAtlas<T>,
    generator: G,
    attributes: GeneratorAttributes,
    scratch: Vec<T>,
}

impl<T: Pixel, G: BitmapGenerator<T>> ImmediateAtlasGenerator<T, G> {
    /// Creates a generator filling `atlas`.
    pub fn new(atlas: DynamicAtlas<T>, generator: G) -> Self {
        Self {
            atlas,
            generator,
            attributes: GeneratorAttributes::default(),
            scratch: Vec::new(),
        }
    }

    /// Sets the attributes passed to the bitmap generator.
    #[must_use]
    pub fn with_attributes(mut self, attributes: GeneratorAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The atlas being filled.
    pub fn atlas(&self) -> &DynamicAtlas<T> {
        &self.atlas
    }

    /// Takes the atlas out of the generator.
    pub fn into_atlas(self) -> DynamicAtlas<T> {
        self.atlas
    }

    /// Places and generates a wrapped glyph, and records the outcome on it.
    ///
    /// Glyphs with an empty box are marked [`GlyphStatus::Empty`] without taking space. A
    /// failing bitmap generator only fails the glyph, whose region stays reserved and
    /// blank.
    ///
    /// A glyph that already has a position is rejected with [`AtlasError::AlreadyPlaced`].
    /// Wrapping it again with [`GlyphBox::wrap_box`] clears the position. If the atlas cannot
    /// make room, the error is returned and the glyph stays unplaced.
    pub fn insert(&mut self, glyph: &mut GlyphBox) -> Result<GlyphStatus, AtlasError> {
        let channels = self.attributes.image_type.channels();
        if self.atlas.channels() != channels {
            return Err(AtlasError::ChannelMismatch {
                expected: self.atlas.channels(),
                actual: channels,
            });
        }
        if glyph.region().is_some() {
            return Err(AtlasError::AlreadyPlaced {
                glyph: glyph.index(),
            });
        }
        if glyph.is_empty() {
            glyph.set_status(GlyphStatus::Empty);
            return Ok(GlyphStatus::Empty);
        }

        let (width, height) = (glyph.rect().width(), glyph.rect().height());
        let region = self.atlas.allocate(width, height)?;
        glyph.place(region.page, region.x, region.y);

        let status = match self.render(glyph, width, height, channels) {
            Ok(()) => {
                let bitmap = BitmapRef::from_slice(&self.scratch, width, height, channels)
                    .ok_or(AtlasError::SizeMismatch {
                        expected: (width, height),
                        actual: (0, 0),
                    })?;
                self.atlas.put(region, bitmap)?;
                GlyphStatus::Generated
            }
            Err(err) => {
                log::warn!("glyph {} failed to generate: {err}", glyph.index());
                GlyphStatus::Failed(err)
            }
        };
        glyph.set_status(status.clone());
        Ok(status)
    }

    /// Inserts every glyph in order.
    ///
    /// Stops at the first error, leaving earlier glyphs in the atlas.
    pub fn insert_all(&mut self, glyphs: &mut [GlyphBox]) -> Result<GenerationReport, AtlasError> {
        let statuses = glyphs
            .iter_mut()
            .map(|glyph| self.insert(glyph))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GenerationReport::new(statuses))
    }

    fn render(
        &mut self,
        glyph: &GlyphBox,
        width: u32,
        height: u32,
        channels: usize,
    ) -> Result<(), GlyphError> {
        let output = scratch_bitmap(&mut self.scratch, width, height, channels)
            .ok_or(GlyphError::OutOfMemory { width, height })?;
        self.generator.generate(glyph, &self.attributes, output)
    }
}
