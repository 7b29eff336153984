// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk generation of packed glyphs.

use crate::bitmap::{BitmapMut, BitmapRef, Pixel};
use crate::error::{AtlasError, GlyphError};
use crate::glyph_box::{GlyphBox, GlyphStatus};
use crate::region_writer::{RegionToken, RegionWriter};
use crate::storage::{AtlasStorage, PageRegion};
use crate::types::ImageType;
use crate::workload::Workload;

/// Parameters passed through to the bitmap generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeneratorAttributes {
    /// Kind of bitmap to produce.
    pub image_type: ImageType,
    /// Whether overlapping contours should be resolved.
    pub overlap_support: bool,
    /// Whether to run an extra scanline pass to fix the sign of ambiguous pixels.
    pub scanline_pass: bool,
}

impl Default for GeneratorAttributes {
    fn default() -> Self {
        Self {
            image_type: ImageType::default(),
            overlap_support: true,
            scanline_pass: false,
        }
    }
}

/// Renders a single glyph into a bitmap.
///
/// Implementations compute the glyph's pixels from its outline using the scale, translation
/// and range stored in the [`GlyphBox`]. `output` always has exactly the size of the glyph's
/// atlas rectangle, the channel count of the storage, and zeroed contents. Row `0` is the
/// bottom row.
///
/// Generators are called from several threads at once and must not depend on call order.
pub trait BitmapGenerator<T: Pixel>: Sync {
    /// Fills `output` with the bitmap of `glyph`.
    fn generate(
        &self,
        glyph: &GlyphBox,
        attributes: &GeneratorAttributes,
        output: BitmapMut<'_, T>,
    ) -> Result<(), GlyphError>;
}

impl<T, F> BitmapGenerator<T> for F
where
    T: Pixel,
    F: Fn(&GlyphBox, &GeneratorAttributes, BitmapMut<'_, T>) -> Result<(), GlyphError> + Sync,
{
    fn generate(
        &self,
        glyph: &GlyphBox,
        attributes: &GeneratorAttributes,
        output: BitmapMut<'_, T>,
    ) -> Result<(), GlyphError> {
        self(glyph, attributes, output)
    }
}

/// Per-glyph outcome of a generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    statuses: Vec<GlyphStatus>,
}

impl GenerationReport {
    pub(crate) fn new(statuses: Vec<GlyphStatus>) -> Self {
        Self { statuses }
    }

    /// Status of every glyph, in input order.
    pub fn statuses(&self) -> &[GlyphStatus] {
        &self.statuses
    }

    /// Number of glyphs whose bitmap was written.
    pub fn generated(&self) -> usize {
        self.statuses
            .iter()
            .filter(|status| matches!(status, GlyphStatus::Generated))
            .count()
    }

    /// Glyphs whose generation failed, by input index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &GlyphError)> + '_ {
        self.statuses
            .iter()
            .enumerate()
            .filter_map(|(index, status)| match status {
                GlyphStatus::Failed(err) => Some((index, err)),
                _ => None,
            })
    }

    /// Whether every glyph is usable.
    pub fn is_complete(&self) -> bool {
        self.statuses.iter().all(GlyphStatus::is_ok)
    }
}

/// Fills an atlas storage with the bitmaps of already packed glyphs.
///
/// Glyphs are distributed over a [`Workload`]. Every worker renders into its own scratch
/// bitmap and copies the result straight into the glyph's region of the storage. Packed
/// regions are disjoint, which [`RegionWriter`] verifies up front, so those copies happen
/// without locks.
///
/// The result does not depend on the number of workers.
#[derive(Clone, Debug)]
pub struct AtlasGenerator<G> {
    generator: G,
    attributes: GeneratorAttributes,
    workload: Workload,
}

impl<G> AtlasGenerator<G> {
    /// Creates a generator running on all available cores.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            attributes: GeneratorAttributes::default(),
            workload: Workload::default(),
        }
    }

    /// Sets the attributes passed to the bitmap generator.
    #[must_use]
    pub fn with_attributes(mut self, attributes: GeneratorAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the number of workers. Zero selects the hardware concurrency.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.workload = Workload::new(threads);
        self
    }

    /// Attributes passed to the bitmap generator.
    pub fn attributes(&self) -> &GeneratorAttributes {
        &self.attributes
    }

    /// The wrapped bitmap generator.
    pub fn bitmap_generator(&self) -> &G {
        &self.generator
    }

    /// Generates every glyph into `storage` and records each outcome on its glyph.
    ///
    /// All glyphs with a non-empty box must have been packed into `storage`. The call fails
    /// before generating anything if a glyph is unpacked, a region falls outside its page,
    /// two regions overlap, or the storage channel count does not match the image type.
    /// Failures of individual glyphs are not errors. They are logged and reported.
    pub fn generate<T, S>(
        &self,
        glyphs: &mut [GlyphBox],
        storage: &mut S,
    ) -> Result<GenerationReport, AtlasError>
    where
        T: Pixel,
        G: BitmapGenerator<T>,
        S: AtlasStorage<T> + ?Sized,
    {
        let channels = storage.channels();
        if channels != self.attributes.image_type.channels() {
            return Err(AtlasError::ChannelMismatch {
                expected: channels,
                actual: self.attributes.image_type.channels(),
            });
        }

        let mut work = Vec::new();
        let mut regions = Vec::new();
        for (index, glyph) in glyphs.iter().enumerate() {
            if glyph.is_empty() {
                continue;
            }
            let region = glyph.region().ok_or(AtlasError::NotPacked { index })?;
            work.push(index);
            regions.push(region);
        }

        let outcomes = {
            let (writer, tokens) = RegionWriter::new(storage.pages_mut(), &regions)?;
            let glyphs: &[GlyphBox] = glyphs;
            let items: Vec<(usize, RegionToken)> = work.iter().copied().zip(tokens).collect();
            self.workload.run(items, Vec::new, |scratch: &mut Vec<T>, (index, token)| {
                let outcome = self.generate_one(&glyphs[index], scratch, &writer, token);
                (index, outcome)
            })
        };

        let mut statuses: Vec<GlyphStatus> = glyphs
            .iter()
            .map(|glyph| {
                if glyph.is_empty() {
                    GlyphStatus::Empty
                } else {
                    GlyphStatus::Pending
                }
            })
            .collect();
        for (index, outcome) in outcomes {
            statuses[index] = match outcome? {
                Ok(()) => GlyphStatus::Generated,
                Err(err) => {
                    log::warn!("glyph {} failed to generate: {err}", glyphs[index].index());
                    GlyphStatus::Failed(err)
                }
            };
        }
        for (glyph, status) in glyphs.iter_mut().zip(&statuses) {
            glyph.set_status(status.clone());
        }

        let report = GenerationReport::new(statuses);
        log::debug!(
            "generated {} of {} glyphs, {} failed",
            report.generated(),
            work.len(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Renders one glyph into `scratch` and copies it into its region.
    ///
    /// The outer error aborts the run, the inner one only fails the glyph.
    fn generate_one<T>(
        &self,
        glyph: &GlyphBox,
        scratch: &mut Vec<T>,
        writer: &RegionWriter<'_, T>,
        token: RegionToken,
    ) -> Result<Result<(), GlyphError>, AtlasError>
    where
        T: Pixel,
        G: BitmapGenerator<T>,
    {
        let PageRegion { width, height, .. } = token.region();
        let channels = self.attributes.image_type.channels();
        let Some(output) = scratch_bitmap(scratch, width, height, channels) else {
            return Ok(Err(GlyphError::OutOfMemory { width, height }));
        };
        if let Err(err) = self.generator.generate(glyph, &self.attributes, output) {
            return Ok(Err(err));
        }
        let Some(bitmap) = BitmapRef::from_slice(scratch, width, height, channels) else {
            return Ok(Err(GlyphError::OutOfMemory { width, height }));
        };
        writer.write(token, bitmap)?;
        Ok(Ok(()))
    }
}

/// Resets `scratch` to a zeroed `width` × `height` bitmap.
pub(crate) fn scratch_bitmap<T: Pixel>(
    scratch: &mut Vec<T>,
    width: u32,
    height: u32,
    channels: usize,
) -> Option<BitmapMut<'_, T>> {
    let len = usize::try_from(u64::from(width) * u64::from(height))
        .ok()?
        .checked_mul(channels)?;
    scratch.clear();
    scratch.try_reserve(len).ok()?;
    scratch.resize(len, T::zeroed());
    BitmapMut::from_slice(scratch, width, height, channels)
}
