// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading glyph boxes and font metrics from a shape source.

use std::collections::BTreeSet;
use std::ops::Range;

use hashbrown::HashMap;
use serde::Serialize;

use crate::glyph_box::GlyphBox;
use crate::types::{Bounds, GlyphIdentifierType};

/// Shape-space metrics of a single glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphShape {
    /// Bounds of the outline. Empty for glyphs without an outline.
    pub bounds: Bounds,
    /// Horizontal advance.
    pub advance: f64,
}

/// Font-wide vertical metrics in shape units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    /// Size of the em square.
    pub em_size: f64,
    /// Distance between consecutive baselines.
    pub line_height: f64,
    /// Baseline to top of the tallest glyphs.
    #[serde(rename = "ascender")]
    pub ascender_y: f64,
    /// Baseline to bottom of the lowest glyphs, usually negative.
    #[serde(rename = "descender")]
    pub descender_y: f64,
    /// Vertical position of the underline.
    pub underline_y: f64,
    /// Thickness of the underline.
    pub underline_thickness: f64,
}

impl FontMetrics {
    /// Every metric multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            em_size: factor * self.em_size,
            line_height: factor * self.line_height,
            ascender_y: factor * self.ascender_y,
            descender_y: factor * self.descender_y,
            underline_y: factor * self.underline_y,
            underline_thickness: factor * self.underline_thickness,
        }
    }
}

/// Kerning adjustment between two glyphs, by glyph index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KerningPair {
    /// Left glyph.
    pub left: u32,
    /// Right glyph.
    pub right: u32,
    /// Advance adjustment in shape units.
    pub advance: f64,
}

/// Access to a font's glyph outlines and metrics.
///
/// Only sizes and metrics are needed here. The outlines themselves are consumed by the
/// [`BitmapGenerator`](crate::BitmapGenerator), which is free to get them from the same
/// source.
pub trait ShapeSource {
    /// Font-wide metrics.
    fn metrics(&self) -> FontMetrics;

    /// Maps a codepoint to a glyph index.
    fn glyph_index(&self, codepoint: char) -> Option<u32>;

    /// Bounds and advance of a glyph, or `None` if the font has no such glyph.
    fn glyph_shape(&self, index: u32) -> Option<GlyphShape>;

    /// Number of glyphs in the font.
    fn glyph_count(&self) -> u32;

    /// All kerning pairs of the font.
    fn kerning_pairs(&self) -> Vec<KerningPair> {
        Vec::new()
    }
}

/// An ordered set of Unicode codepoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Charset {
    codepoints: BTreeSet<char>,
}

impl Charset {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Printable ASCII, `0x20` through `0x7e`.
    pub fn ascii() -> Self {
        (' '..='~').collect()
    }

    /// Every distinct character of `text`.
    pub fn from_text(text: &str) -> Self {
        text.chars().collect()
    }

    /// Adds a codepoint.
    pub fn add(&mut self, codepoint: char) {
        self.codepoints.insert(codepoint);
    }

    /// Removes a codepoint.
    pub fn remove(&mut self, codepoint: char) {
        self.codepoints.remove(&codepoint);
    }

    /// Whether the set holds `codepoint`.
    pub fn contains(&self, codepoint: char) -> bool {
        self.codepoints.contains(&codepoint)
    }

    /// Number of codepoints.
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    /// Codepoints in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.codepoints.iter().copied()
    }
}

impl FromIterator<char> for Charset {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            codepoints: iter.into_iter().collect(),
        }
    }
}

impl Extend<char> for Charset {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        self.codepoints.extend(iter);
    }
}

/// The glyphs loaded from one font, together with its metrics and kerning.
///
/// Glyph boxes of several fonts are usually packed into one atlas, so they live in a single
/// list shared by every `FontGeometry`. Each font remembers the range of that list it
/// loaded and looks its glyphs up by index into it.
#[derive(Clone, Debug)]
pub struct FontGeometry {
    name: Option<String>,
    group: usize,
    geometry_scale: f64,
    metrics: FontMetrics,
    preferred_identifier: GlyphIdentifierType,
    range: Range<usize>,
    by_index: HashMap<u32, usize>,
    by_codepoint: HashMap<char, usize>,
    kerning: HashMap<(u32, u32), f64>,
}

impl FontGeometry {
    /// Creates an empty font geometry that keeps shape units unscaled.
    pub fn new() -> Self {
        Self {
            name: None,
            group: 0,
            geometry_scale: 1.0,
            metrics: FontMetrics::default(),
            preferred_identifier: GlyphIdentifierType::UnicodeCodepoint,
            range: 0..0,
            by_index: HashMap::new(),
            by_codepoint: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// Sets the name reported in exported layouts.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the scale group of the glyphs loaded from now on.
    #[must_use]
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Font name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Scale group of the loaded glyphs.
    pub fn group(&self) -> usize {
        self.group
    }

    /// Factor from shape units to layout units.
    pub fn geometry_scale(&self) -> f64 {
        self.geometry_scale
    }

    /// Metrics in layout units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics.scaled(self.geometry_scale)
    }

    /// How glyphs of this font are identified in exported layouts.
    pub fn preferred_identifier(&self) -> GlyphIdentifierType {
        self.preferred_identifier
    }

    /// Range of the shared glyph list holding this font's glyphs.
    pub fn glyph_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// This font's glyphs within the shared glyph list.
    pub fn glyphs<'a>(&self, all: &'a [GlyphBox]) -> &'a [GlyphBox] {
        all.get(self.range.clone()).unwrap_or_default()
    }

    /// Position in the shared glyph list of the glyph with font index `index`.
    pub fn find_index(&self, index: u32) -> Option<usize> {
        self.by_index.get(&index).copied()
    }

    /// Position in the shared glyph list of the glyph loaded for `codepoint`.
    pub fn find_codepoint(&self, codepoint: char) -> Option<usize> {
        self.by_codepoint.get(&codepoint).copied()
    }

    /// Kerning in layout units, keyed by glyph indices.
    pub fn kerning(&self) -> impl Iterator<Item = KerningPair> + '_ {
        let mut pairs: Vec<KerningPair> = self
            .kerning
            .iter()
            .map(|(&(left, right), &advance)| KerningPair {
                left,
                right,
                advance: self.geometry_scale * advance,
            })
            .collect();
        pairs.sort_by_key(|pair| (pair.left, pair.right));
        pairs.into_iter()
    }

    /// Loads the glyphs of every codepoint in `charset` and appends them to `glyphs`.
    ///
    /// Codepoints the font cannot map are skipped. When `normalize` is set, layout units are
    /// ems. Returns the number of glyphs loaded.
    ///
    /// The glyphs of one font must be loaded by a single call, since the font tracks one
    /// contiguous range of `glyphs`.
    pub fn load_charset(
        &mut self,
        glyphs: &mut Vec<GlyphBox>,
        source: &dyn ShapeSource,
        charset: &Charset,
        normalize: bool,
    ) -> usize {
        self.begin(glyphs.len(), source, normalize);
        let mut missing = 0_usize;
        for codepoint in charset.iter() {
            let Some(index) = source.glyph_index(codepoint) else {
                missing += 1;
                continue;
            };
            let Some(shape) = source.glyph_shape(index) else {
                missing += 1;
                continue;
            };
            let position = glyphs.len();
            glyphs.push(
                GlyphBox::new(index, Some(codepoint), shape, self.geometry_scale)
                    .with_group(self.group),
            );
            self.by_index.entry(index).or_insert(position);
            self.by_codepoint.insert(codepoint, position);
        }
        if missing > 0 {
            log::debug!("{missing} codepoints are not covered by the font");
        }
        self.preferred_identifier = GlyphIdentifierType::UnicodeCodepoint;
        self.finish(glyphs.len(), source)
    }

    /// Loads the glyphs with font indices in `indices` and appends them to `glyphs`.
    ///
    /// Indices beyond the font's glyph count are ignored. Returns the number of glyphs loaded.
    pub fn load_glyph_range(
        &mut self,
        glyphs: &mut Vec<GlyphBox>,
        source: &dyn ShapeSource,
        indices: Range<u32>,
        normalize: bool,
    ) -> usize {
        self.begin(glyphs.len(), source, normalize);
        let end = indices.end.min(source.glyph_count());
        for index in indices.start..end {
            let Some(shape) = source.glyph_shape(index) else {
                continue;
            };
            let position = glyphs.len();
            glyphs.push(
                GlyphBox::new(index, None, shape, self.geometry_scale).with_group(self.group),
            );
            self.by_index.insert(index, position);
        }
        self.preferred_identifier = GlyphIdentifierType::GlyphIndex;
        self.finish(glyphs.len(), source)
    }

    fn begin(&mut self, start: usize, source: &dyn ShapeSource, normalize: bool) {
        self.metrics = source.metrics();
        self.geometry_scale = if normalize && self.metrics.em_size > 0.0 {
            1.0 / self.metrics.em_size
        } else {
            1.0
        };
        self.range = start..start;
        self.by_index.clear();
        self.by_codepoint.clear();
        self.kerning.clear();
    }

    fn finish(&mut self, end: usize, source: &dyn ShapeSource) -> usize {
        self.range.end = end;
        for pair in source.kerning_pairs() {
            if pair.advance != 0.0
                && self.by_index.contains_key(&pair.left)
                && self.by_index.contains_key(&pair.right)
            {
                self.kerning.insert((pair.left, pair.right), pair.advance);
            }
        }
        self.range.len()
    }
}

impl Default for FontGeometry {
    fn default() -> Self {
        Self::new()
    }
}
