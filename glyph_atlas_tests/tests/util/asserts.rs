// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers to check atlas pages against the expected glyph bitmaps.

use glyph_atlas::{BitmapRef, GlyphBox, PageRegion};

use super::pattern;

/// Assert that the region of `glyph` on `page` holds exactly what the pattern generator
/// produces for it.
pub(crate) fn assert_glyph_pixels(page: BitmapRef<'_, u8>, glyph: &GlyphBox) {
    let region = glyph.region().expect("glyph must be placed");
    for y in 0..region.height {
        for x in 0..region.width {
            let actual = page.pixel(region.x + x, region.y + y).unwrap();
            for (channel, &value) in actual.iter().enumerate() {
                assert_eq!(
                    value,
                    pattern(glyph, x, y, channel),
                    "glyph {} pixel ({x}, {y}) channel {channel}",
                    glyph.index()
                );
            }
        }
    }
}

/// Assert that every pixel of `page` outside `regions` is zero.
pub(crate) fn assert_blank_outside(page: BitmapRef<'_, u8>, regions: &[PageRegion]) {
    for y in 0..page.height() {
        for x in 0..page.width() {
            let covered = regions.iter().any(|r| {
                (r.x..r.x + r.width).contains(&x) && (r.y..r.y + r.height).contains(&y)
            });
            if !covered {
                assert!(
                    page.pixel(x, y).unwrap().iter().all(|&v| v == 0),
                    "pixel ({x}, {y}) lies outside every glyph but is not blank"
                );
            }
        }
    }
}
