// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Failing glyphs and invalid layouts.

use glyph_atlas::{
    AtlasError, AtlasStorage, BitmapAtlasStorage, GlyphBox, GlyphError, GlyphStatus, PageRegion,
};

use crate::util::{PatternGenerator, assert_blank_outside, assert_glyph_pixels, load_ascii, settings};

#[test]
fn failures_do_not_abort_siblings() {
    let settings = settings(r#"{ "type": "sdf", "scale": 24, "threads": 4 }"#);
    let (_, mut glyphs) = load_ascii();
    let layout = settings.packer().pack(&mut glyphs).unwrap();
    let mut storage = BitmapAtlasStorage::new(layout.width(), layout.height(), 1).unwrap();
    let report = settings
        .generator(PatternGenerator::failing(&[5, 17, 94]))
        .generate(&mut glyphs, &mut storage)
        .unwrap();

    let failed: Vec<u32> = report.failures().map(|(i, _)| glyphs[i].index()).collect();
    assert_eq!(failed, [5, 17, 94]);
    assert_eq!(report.generated(), 91);
    assert!(!report.is_complete());

    let page = storage.page(0).unwrap();
    let mut generated = Vec::new();
    for glyph in &glyphs {
        match glyph.status() {
            GlyphStatus::Generated => {
                assert_glyph_pixels(page, glyph);
                generated.push(glyph.region().unwrap());
            }
            GlyphStatus::Failed(GlyphError::Generation(message)) => {
                assert!(message.contains("refuses"), "{message}");
            }
            GlyphStatus::Empty => assert_eq!(glyph.index(), 0),
            other => panic!("glyph {} has unexpected status {other:?}", glyph.index()),
        }
    }
    // Failed glyphs keep their reserved space, but nothing is written there.
    assert_blank_outside(page, &generated);
}

fn packed_ascii() -> (Vec<GlyphBox>, BitmapAtlasStorage<u8>) {
    let settings = settings(r#"{ "type": "sdf", "scale": 24 }"#);
    let (_, mut glyphs) = load_ascii();
    let layout = settings.packer().pack(&mut glyphs).unwrap();
    let storage = BitmapAtlasStorage::new(layout.width(), layout.height(), 1).unwrap();
    (glyphs, storage)
}

#[test]
fn failures_unpacked_glyph_stops_before_writing() {
    let (mut glyphs, mut storage) = packed_ascii();
    // Rewrapping forgets the position.
    glyphs[10].wrap_box(24.0, 2.0 / 24.0);
    let generator = settings(r#"{ "type": "sdf", "scale": 24 }"#).generator(PatternGenerator::new());

    assert_eq!(
        generator.generate(&mut glyphs, &mut storage),
        Err(AtlasError::NotPacked { index: 10 })
    );
    assert!(storage.bitmap().data().iter().all(|&value| value == 0));
}

#[test]
fn failures_overlapping_layout_is_rejected() {
    let (mut glyphs, mut storage) = packed_ascii();
    // Glyph 1 is smaller than glyph 2 on both axes, so it stays inside the page.
    let PageRegion { x, y, .. } = glyphs[2].region().unwrap();
    glyphs[1].place(0, x, y);
    let generator = settings(r#"{ "type": "sdf", "scale": 24 }"#).generator(PatternGenerator::new());

    assert!(matches!(
        generator.generate(&mut glyphs, &mut storage),
        Err(AtlasError::OverlappingRegions { .. })
    ));
    assert!(storage.bitmap().data().iter().all(|&value| value == 0));
}

#[test]
fn failures_wrong_storage_channels() {
    let (mut glyphs, _) = packed_ascii();
    let mut rgb = BitmapAtlasStorage::<u8>::new(512, 512, 3).unwrap();
    let generator = settings(r#"{ "type": "sdf", "scale": 24 }"#).generator(PatternGenerator::new());
    assert!(matches!(
        generator.generate(&mut glyphs, &mut rgb),
        Err(AtlasError::ChannelMismatch { .. })
    ));
}
