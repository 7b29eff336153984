// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON description of a packed atlas.
//!
//! The document has an `atlas` section describing the page, followed by the metrics, glyphs
//! and kerning of the font. Several fonts are listed under `variants` instead:
//!
//! ```json
//! {
//!   "atlas": { "type": "msdf", "distanceRange": 2, "size": 32, "width": 256, "height": 256, "yOrigin": "bottom" },
//!   "metrics": { "emSize": 1, "lineHeight": 1.2, "ascender": 0.8, "descender": -0.2, "underlineY": -0.1, "underlineThickness": 0.05 },
//!   "glyphs": [ { "unicode": 65, "advance": 0.6, "planeBounds": { ... }, "atlasBounds": { ... } } ],
//!   "kerning": [ { "unicode1": 65, "unicode2": 86, "advance": -0.05 } ]
//! }
//! ```
//!
//! With [`YOrigin::Top`], vertical coordinates are flipped: plane bounds and metrics are
//! negated and atlas bounds are measured from the top edge.

use std::io::Write;

use serde::Serialize;

use crate::font_geometry::{FontGeometry, FontMetrics};
use crate::glyph_box::GlyphBox;
use crate::tight_packer::AtlasLayout;
use crate::types::{Bounds, GlyphIdentifierType, ImageType, YOrigin};

/// What to include in the exported layout and how.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Image type reported for the atlas.
    pub image_type: ImageType,
    /// Vertical origin of all coordinates.
    pub y_origin: YOrigin,
    /// Whether to include kerning pairs.
    pub kerning: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            image_type: ImageType::default(),
            y_origin: YOrigin::default(),
            kerning: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AtlasSection {
    #[serde(rename = "type")]
    image_type: ImageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_range: Option<f64>,
    size: f64,
    width: u32,
    height: u32,
    y_origin: YOrigin,
}

#[derive(Serialize)]
struct FontSection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    metrics: FontMetrics,
    glyphs: Vec<GlyphEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kerning: Option<Vec<KerningEntry>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GlyphEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    unicode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<u32>,
    advance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    plane_bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    atlas_bounds: Option<Bounds>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum KerningEntry {
    Unicode {
        unicode1: u32,
        unicode2: u32,
        advance: f64,
    },
    Index {
        index1: u32,
        index2: u32,
        advance: f64,
    },
}

#[derive(Serialize)]
struct Document<'a> {
    atlas: AtlasSection,
    #[serde(flatten)]
    font: Option<FontSection<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<Vec<FontSection<'a>>>,
}

/// Serializes the layout of `glyphs`, as loaded by `fonts` and packed into `layout`.
pub fn layout_json(
    fonts: &[FontGeometry],
    glyphs: &[GlyphBox],
    layout: &AtlasLayout,
    options: &ExportOptions,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&document(fonts, glyphs, layout, options))
}

/// Like [`layout_json`], but writes into `writer`.
pub fn write_layout_json<W: Write>(
    writer: W,
    fonts: &[FontGeometry],
    glyphs: &[GlyphBox],
    layout: &AtlasLayout,
    options: &ExportOptions,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer(writer, &document(fonts, glyphs, layout, options))
}

fn document<'a>(
    fonts: &'a [FontGeometry],
    glyphs: &[GlyphBox],
    layout: &AtlasLayout,
    options: &ExportOptions,
) -> Document<'a> {
    let group = fonts.first().map_or(0, FontGeometry::group);
    let atlas = AtlasSection {
        image_type: options.image_type,
        distance_range: if options.image_type.is_distance_field() {
            layout.pixel_range(group)
        } else {
            None
        },
        size: layout.scale_for(group).unwrap_or_default(),
        width: layout.width(),
        height: layout.height(),
        y_origin: options.y_origin,
    };

    let mut sections: Vec<FontSection<'a>> = fonts
        .iter()
        .map(|font| font_section(font, glyphs, layout.height(), options))
        .collect();
    if sections.len() == 1 {
        Document {
            atlas,
            font: sections.pop(),
            variants: None,
        }
    } else {
        Document {
            atlas,
            font: None,
            variants: Some(sections),
        }
    }
}

fn font_section<'a>(
    font: &'a FontGeometry,
    all: &[GlyphBox],
    atlas_height: u32,
    options: &ExportOptions,
) -> FontSection<'a> {
    let flip = options.y_origin == YOrigin::Top;
    let mut metrics = font.metrics();
    if flip {
        metrics.ascender_y = -metrics.ascender_y;
        metrics.descender_y = -metrics.descender_y;
        metrics.underline_y = -metrics.underline_y;
    }
    let by_index = font.preferred_identifier() == GlyphIdentifierType::GlyphIndex;
    let glyphs = font.glyphs(all);

    let entries = glyphs
        .iter()
        .map(|glyph| {
            let plane = glyph.quad_plane_bounds();
            let atlas = glyph.quad_atlas_bounds();
            let height = f64::from(atlas_height);
            GlyphEntry {
                unicode: (!by_index).then(|| glyph.codepoint().map_or(0, u32::from)),
                index: by_index.then(|| glyph.index()),
                advance: glyph.advance(),
                plane_bounds: (!plane.is_zero()).then(|| {
                    if flip {
                        Bounds::new(plane.l, -plane.b, plane.r, -plane.t)
                    } else {
                        plane
                    }
                }),
                atlas_bounds: (!atlas.is_zero()).then(|| {
                    if flip {
                        Bounds::new(atlas.l, height - atlas.t, atlas.r, height - atlas.b)
                    } else {
                        atlas
                    }
                }),
            }
        })
        .collect();

    let kerning = options.kerning.then(|| {
        font.kerning()
            .filter_map(|pair| {
                if by_index {
                    return Some(KerningEntry::Index {
                        index1: pair.left,
                        index2: pair.right,
                        advance: pair.advance,
                    });
                }
                let codepoint = |index| {
                    let position = font.find_index(index)?;
                    all.get(position)?.codepoint().map(u32::from)
                };
                Some(KerningEntry::Unicode {
                    unicode1: codepoint(pair.left)?,
                    unicode2: codepoint(pair.right)?,
                    advance: pair.advance,
                })
            })
            .collect()
    });

    FontSection {
        name: font.name(),
        metrics,
        glyphs: entries,
        kerning,
    }
}
