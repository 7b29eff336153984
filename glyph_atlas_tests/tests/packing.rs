// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing the synthetic font under different settings.

use atlas_packer::find_overlap;
use glyph_atlas::{AtlasError, GlyphBox, PackError, Rectangle};

use crate::util::{load_ascii, settings};

fn assert_layout_valid(glyphs: &[GlyphBox], width: u32, height: u32, padding: u32) {
    let mut rects = Vec::new();
    for glyph in glyphs.iter().filter(|glyph| !glyph.is_empty()) {
        let region = glyph.region().expect("every visible glyph is placed");
        assert!(region.x + region.width + padding <= width, "{region:?}");
        assert!(region.y + region.height + padding <= height, "{region:?}");
        rects.push(*glyph.rect());
    }
    assert_eq!(find_overlap(&rects, padding), None);
}

#[test]
fn packing_constraints_shape_dimensions() {
    let cases: [(&str, fn(u32, u32) -> bool); 6] = [
        (r#""powerOfTwoSquare""#, |w, h| {
            w == h && w.is_power_of_two()
        }),
        (r#""powerOfTwoRectangle""#, |w, h| {
            w.is_power_of_two() && h.is_power_of_two() && (w == h || w == 2 * h)
        }),
        (r#""multipleOfFourSquare""#, |w, h| w == h && w % 4 == 0),
        (r#""evenSquare""#, |w, h| w == h && w % 2 == 0),
        (r#""square""#, |w, h| w == h),
        (r#"{ "aspectRatio": { "width": 2, "height": 1 } }"#, |w, h| {
            w == 2 * h
        }),
    ];
    for (constraint, holds) in cases {
        let settings = settings(&format!(
            r#"{{ "scale": 24, "padding": 1, "constraint": {constraint} }}"#
        ));
        let (_, mut glyphs) = load_ascii();
        let layout = settings.packer().pack(&mut glyphs).unwrap();
        let (width, height) = layout.dimensions();
        assert!(holds(width, height), "{constraint}: {width}x{height}");
        assert_layout_valid(&glyphs, width, height, 1);
    }
}

#[test]
fn packing_maximized_scale_fills_fixed_atlas() {
    let settings = settings(r#"{ "dimensions": { "width": 256, "height": 256 }, "padding": 1 }"#);
    let (_, mut glyphs) = load_ascii();
    let layout = settings.packer().pack(&mut glyphs).unwrap();
    let scale = layout.scale().unwrap();
    assert!(scale > 8.0, "{scale}");
    assert_eq!(layout.dimensions(), (256, 256));
    assert_eq!(layout.pixel_range(0), Some(2.0));
    assert_layout_valid(&glyphs, 256, 256, 1);
    // Shapes are in font units of a 1000 unit em.
    assert!(glyphs
        .iter()
        .all(|glyph| (glyph.scale() * 1000.0 - scale).abs() < 1e-9));
}

#[test]
fn packing_overflow_reports_unplaced_glyphs() {
    let settings = settings(r#"{ "dimensions": { "width": 64, "height": 64 }, "scale": 32 }"#);
    let (_, mut glyphs) = load_ascii();
    match settings.packer().pack(&mut glyphs) {
        Err(AtlasError::Packing(PackError::Overflow { unplaced, total })) => {
            assert_eq!(total, 94);
            assert!(unplaced > 0 && unplaced < total, "{unplaced}");
        }
        other => panic!("expected an overflow, got {other:?}"),
    }
}

#[test]
fn packing_bounded_search_is_exhausted() {
    let settings = settings(r#"{ "scale": 64, "maxDimension": 128, "constraint": "square" }"#);
    let (_, mut glyphs) = load_ascii();
    assert_eq!(
        settings.packer().pack(&mut glyphs),
        Err(AtlasError::Packing(PackError::SizeSearchExhausted {
            max_width: 128,
            max_height: 128
        }))
    );
}

#[test]
fn packing_rectangles_match_glyph_boxes() {
    let settings = settings(r#"{ "scale": 40, "pxRange": 4 }"#);
    let (_, mut glyphs) = load_ascii();
    settings.packer().pack(&mut glyphs).unwrap();
    // 'A' is 471 x 549 units at (50, -120), grown by 0.1 em of range:
    // (0.471 + 0.1) * 40 = 22.84 and (0.549 + 0.1) * 40 = 25.96.
    let a = &glyphs[33];
    let rect: Rectangle = *a.rect();
    assert_eq!((rect.width(), rect.height()), (24, 27));
    let plane = a.quad_plane_bounds();
    assert!(plane.l < 0.05 && plane.b < -0.12, "{plane:?}");
    assert!(plane.r > 0.521 && plane.t > 0.429, "{plane:?}");
}
