// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A synthetic font with deterministic glyph shapes.

use glyph_atlas::{
    AtlasSettings, Bounds, Charset, FontGeometry, FontMetrics, GlyphBox, GlyphShape,
    KerningPair, ShapeSource,
};

/// Printable ASCII mapped to glyph indices `0..95`, with glyph `0` (space) blank.
///
/// Every other glyph is a box whose size and offset vary with its index, so that packing
/// sees many distinct rectangle sizes.
pub(crate) struct BlockFont;

impl BlockFont {
    pub(crate) const GLYPH_COUNT: u32 = 95;
}

impl ShapeSource for BlockFont {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            em_size: 1000.0,
            line_height: 1200.0,
            ascender_y: 800.0,
            descender_y: -200.0,
            underline_y: -100.0,
            underline_thickness: 50.0,
        }
    }

    fn glyph_index(&self, codepoint: char) -> Option<u32> {
        matches!(codepoint, ' '..='~').then(|| u32::from(codepoint) - 0x20)
    }

    fn glyph_shape(&self, index: u32) -> Option<GlyphShape> {
        if index >= Self::GLYPH_COUNT {
            return None;
        }
        if index == 0 {
            return Some(GlyphShape {
                bounds: Bounds::default(),
                advance: 250.0,
            });
        }
        let width = f64::from(150 + index * 37 % 450);
        let height = f64::from(300 + index * 53 % 500);
        let left = f64::from(index % 7 * 10);
        let bottom = -f64::from(index % 5 * 40);
        Some(GlyphShape {
            bounds: Bounds::new(left, bottom, left + width, bottom + height),
            advance: width + 2.0 * left,
        })
    }

    fn glyph_count(&self) -> u32 {
        Self::GLYPH_COUNT
    }

    fn kerning_pairs(&self) -> Vec<KerningPair> {
        // AV, To
        vec![
            KerningPair {
                left: 33,
                right: 54,
                advance: -80.0,
            },
            KerningPair {
                left: 52,
                right: 79,
                advance: -60.0,
            },
        ]
    }
}

/// Loads printable ASCII from [`BlockFont`] in em units.
pub(crate) fn load_ascii() -> (FontGeometry, Vec<GlyphBox>) {
    let mut glyphs = Vec::new();
    let mut font = FontGeometry::new().with_name("Blocks");
    let loaded = font.load_charset(&mut glyphs, &BlockFont, &Charset::ascii(), true);
    assert_eq!(loaded, 95);
    (font, glyphs)
}

/// Parses a settings document, panicking on errors.
pub(crate) fn settings(json: &str) -> AtlasSettings {
    AtlasSettings::from_json_str(json).unwrap()
}
