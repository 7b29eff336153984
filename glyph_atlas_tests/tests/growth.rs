// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental insertion into a growing atlas.

use atlas_packer::find_overlap;
use glyph_atlas::{
    AtlasError, AtlasSettings, AtlasState, AtlasStorage, Bitmap, Bounds, GlyphBox, GlyphShape,
    GlyphStatus, GrowthPolicy, ImmediateAtlasGenerator, Rectangle,
};

use crate::util::{PatternGenerator, assert_glyph_pixels, load_ascii, settings};

/// Printable ASCII, wrapped at 32 pixels per em and not yet placed.
fn wrapped_ascii(settings: &AtlasSettings) -> Vec<GlyphBox> {
    let (_, mut glyphs) = load_ascii();
    for glyph in &mut glyphs {
        glyph.wrap_box(32.0, settings.px_range / 32.0);
    }
    glyphs
}

/// A glyph far larger than any page can hold.
fn huge_glyph() -> GlyphBox {
    let shape = GlyphShape {
        bounds: Bounds::new(0.0, 0.0, 3.0e9, 3.0e9),
        advance: 3.0e9,
    };
    let mut glyph = GlyphBox::new(200, None, shape, 1.0);
    glyph.wrap_box(1.0, 0.0);
    glyph
}

#[test]
fn growth_inserts_never_move_earlier_glyphs() {
    let settings = settings(
        r#"{
            "type": "sdf",
            "scale": 32,
            "padding": 1,
            "initialSize": 32,
            "growth": { "enlarge": { "maxSize": 1024 } }
        }"#,
    );
    let mut glyphs = wrapped_ascii(&settings);
    let mut generator =
        ImmediateAtlasGenerator::new(settings.dynamic_atlas::<u8>(), PatternGenerator::new())
            .with_attributes(settings.generator_attributes());

    for inserted in 1..=glyphs.len() {
        let done = &mut glyphs[..inserted];
        generator.insert(done.last_mut().unwrap()).unwrap();
        // Everything inserted so far still reads back, wherever the atlas has grown.
        for glyph in done.iter().filter(|glyph| !glyph.is_empty()) {
            let page = generator.atlas().page(glyph.page()).unwrap();
            assert_glyph_pixels(page, glyph);
        }
    }

    let atlas = generator.atlas();
    assert_eq!(atlas.page_count(), 1);
    assert!(atlas.page_size(0).unwrap().0 > 64);
    assert!(atlas.growth_count() >= 2, "{}", atlas.growth_count());
    assert_ne!(atlas.state(), AtlasState::Empty);
}

#[test]
fn growth_enlarge_never_exceeds_max_size() {
    let settings = settings(
        r#"{
            "type": "sdf",
            "scale": 32,
            "padding": 1,
            "initialSize": 256,
            "growth": { "enlarge": { "maxSize": 64 } }
        }"#,
    );
    let mut glyphs = wrapped_ascii(&settings);
    let mut generator =
        ImmediateAtlasGenerator::new(settings.dynamic_atlas::<u8>(), PatternGenerator::new())
            .with_attributes(settings.generator_attributes());
    assert!(generator.insert_all(&mut glyphs).unwrap().is_complete());

    let atlas = generator.atlas();
    assert!(atlas.page_count() > 1);
    for page in 0..atlas.page_count() {
        let (width, height) = atlas.page_size(page).unwrap();
        assert!(width <= 64 && height <= 64, "page {page} is {width}x{height}");
    }

    let pages = atlas.page_count();
    let mut huge = huge_glyph();
    assert!(matches!(
        generator.insert(&mut huge),
        Err(AtlasError::RegionTooLarge { max_size: 64, .. })
    ));
    assert_eq!(huge.region(), None);
    assert_eq!(generator.atlas().page_count(), pages);
}

#[test]
fn growth_failure_keeps_filled_pages() {
    let settings = settings(
        r#"{ "type": "mtsdf", "scale": 32, "initialSize": 64, "growth": "addPage" }"#,
    );
    let mut glyphs = wrapped_ascii(&settings);
    let mut generator =
        ImmediateAtlasGenerator::new(settings.dynamic_atlas::<u8>(), PatternGenerator::new())
            .with_attributes(settings.generator_attributes());
    generator.insert_all(&mut glyphs).unwrap();

    let atlas = generator.atlas();
    let (pages, state, growths) = (atlas.page_count(), atlas.state(), atlas.growth_count());
    let before: Vec<Bitmap<u8>> = (0..pages)
        .map(|page| atlas.page_bitmap(page).unwrap().clone())
        .collect();

    // The page needed for this glyph cannot even be addressed.
    let mut huge = huge_glyph();
    assert!(matches!(
        generator.insert(&mut huge),
        Err(AtlasError::StorageAllocation { channels: 4, .. })
    ));
    assert_eq!(huge.region(), None);
    assert_eq!(huge.status(), &GlyphStatus::Pending);

    let atlas = generator.atlas();
    assert_eq!(atlas.page_count(), pages);
    assert_eq!(atlas.state(), state);
    assert_eq!(atlas.growth_count(), growths);
    for (page, bitmap) in before.iter().enumerate() {
        assert!(atlas.page_bitmap(page) == Some(bitmap), "page {page} changed");
    }
    for glyph in glyphs.iter().filter(|glyph| !glyph.is_empty()) {
        assert_glyph_pixels(atlas.page(glyph.page()).unwrap(), glyph);
    }

    // The atlas keeps working after the failure.
    let mut again = glyphs[33].clone();
    again.wrap_box(32.0, settings.px_range / 32.0);
    assert_eq!(generator.insert(&mut again), Ok(GlyphStatus::Generated));
    assert_glyph_pixels(generator.atlas().page(again.page()).unwrap(), &again);
}

#[test]
fn growth_add_page_keeps_pages_disjoint() {
    let settings = settings(r#"{ "type": "sdf", "scale": 32, "initialSize": 64, "growth": "addPage" }"#);
    assert_eq!(settings.growth, GrowthPolicy::AddPage);
    let mut glyphs = wrapped_ascii(&settings);
    let mut generator =
        ImmediateAtlasGenerator::new(settings.dynamic_atlas::<u8>(), PatternGenerator::new())
            .with_attributes(settings.generator_attributes());
    let report = generator.insert_all(&mut glyphs).unwrap();
    assert!(report.is_complete());

    let atlas = generator.into_atlas();
    assert!(atlas.page_count() > 1);
    for page_index in 0..atlas.page_count() {
        assert_eq!(atlas.page_size(page_index), Some((64, 64)));
        let on_page: Vec<Rectangle> = glyphs
            .iter()
            .filter(|glyph| !glyph.is_empty() && glyph.page() == page_index)
            .map(|glyph| *glyph.rect())
            .collect();
        assert!(!on_page.is_empty());
        assert_eq!(find_overlap(&on_page, 0), None);
    }
    for glyph in glyphs.iter().filter(|glyph| !glyph.is_empty()) {
        assert_glyph_pixels(atlas.page(glyph.page()).unwrap(), glyph);
    }
}
