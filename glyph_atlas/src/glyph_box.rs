// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-glyph placement and generation parameters.

use atlas_packer::Rectangle;

use crate::error::GlyphError;
use crate::font_geometry::GlyphShape;
use crate::storage::PageRegion;
use crate::types::{Bounds, Vector2};

/// Outcome of generating a glyph's bitmap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GlyphStatus {
    /// Not generated yet.
    #[default]
    Pending,
    /// The glyph has no visible area, so nothing is generated.
    Empty,
    /// The bitmap was generated and written into the atlas.
    Generated,
    /// The bitmap generator failed. The glyph's region is left untouched.
    Failed(GlyphError),
}

impl GlyphStatus {
    /// Whether the glyph is usable: generated, or empty and therefore needing no pixels.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Generated | Self::Empty)
    }
}

/// A glyph's shape-space bounds tied to its reserved atlas rectangle.
///
/// The shape-space values are fixed when the box is loaded. [`wrap_box`](Self::wrap_box)
/// derives the pixel size of the atlas rectangle and the transformation that maps the shape
/// into it, and packing assigns the position.
#[derive(Clone, Debug)]
pub struct GlyphBox {
    index: u32,
    codepoint: Option<char>,
    group: usize,
    geometry_scale: f64,
    advance: f64,
    bounds: Bounds,
    scale: f64,
    range: f64,
    translate: Vector2,
    rect: Rectangle,
    page: usize,
    status: GlyphStatus,
}

impl GlyphBox {
    /// Creates an unwrapped box for glyph `index` with the given shape metrics.
    ///
    /// `geometry_scale` converts shape units into the units used for layout, which is
    /// typically `1 / em_size` to express everything in ems.
    pub fn new(index: u32, codepoint: Option<char>, shape: GlyphShape, geometry_scale: f64) -> Self {
        Self {
            index,
            codepoint,
            group: 0,
            geometry_scale,
            advance: shape.advance,
            bounds: shape.bounds,
            scale: 1.0,
            range: 0.0,
            translate: Vector2::default(),
            rect: Rectangle::new(0, 0, 0),
            page: 0,
            status: GlyphStatus::Pending,
        }
    }

    /// Sets the group, used to select a scale when scaling per group.
    #[must_use]
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Glyph index within its font.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Unicode codepoint the glyph was loaded for, if any.
    pub fn codepoint(&self) -> Option<char> {
        self.codepoint
    }

    /// Scale group.
    pub fn group(&self) -> usize {
        self.group
    }

    /// Horizontal advance in layout units.
    pub fn advance(&self) -> f64 {
        self.geometry_scale * self.advance
    }

    /// Outline bounds in shape units.
    pub fn shape_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Factor from shape units to layout units.
    pub fn geometry_scale(&self) -> f64 {
        self.geometry_scale
    }

    /// Pixels per shape unit, as set by the last [`wrap_box`](Self::wrap_box).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Width of the distance-field range in shape units.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Offset applied to the shape, in shape units, before scaling into the box.
    pub fn translate(&self) -> Vector2 {
        self.translate
    }

    /// The reserved atlas rectangle.
    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    /// Atlas page holding the rectangle.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Generation status.
    pub fn status(&self) -> &GlyphStatus {
        &self.status
    }

    /// Whether the glyph has no visible outline, such as a space.
    pub fn is_whitespace(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Whether the atlas rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    /// The page region reserved for this glyph, if it has been placed.
    pub fn region(&self) -> Option<PageRegion> {
        let (x, y) = self.rect.position()?;
        Some(PageRegion {
            page: self.page,
            x,
            y,
            width: self.rect.width(),
            height: self.rect.height(),
        })
    }

    /// Sizes the atlas rectangle for `scale` pixels per layout unit and a distance-field
    /// range of `range` layout units.
    ///
    /// The outline bounds are grown by half the range on every side, scaled, rounded up and
    /// given one extra pixel. The translation centers the outline within the result. Boxes of
    /// whitespace glyphs become empty. Any previous position is discarded.
    pub fn wrap_box(&mut self, scale: f64, range: f64) {
        let scale = scale * self.geometry_scale;
        let range = range / self.geometry_scale;
        self.scale = scale;
        self.range = range;
        self.status = GlyphStatus::Pending;

        if self.bounds.is_empty() || scale.is_nan() || scale <= 0.0 {
            self.rect = Rectangle::new(self.rect.id, 0, 0);
            self.translate = Vector2::default();
            return;
        }

        let l = self.bounds.l - 0.5 * range;
        let b = self.bounds.b - 0.5 * range;
        let r = self.bounds.r + 0.5 * range;
        let t = self.bounds.t + 0.5 * range;
        let w = scale * (r - l);
        let h = scale * (t - b);
        let box_w = pixel_extent(w);
        let box_h = pixel_extent(h);
        self.rect = Rectangle::new(self.rect.id, box_w, box_h);
        self.translate = Vector2::new(
            -l + 0.5 * (f64::from(box_w) - w) / scale,
            -b + 0.5 * (f64::from(box_h) - h) / scale,
        );
    }

    /// Assigns the atlas position.
    pub fn place(&mut self, page: usize, x: u32, y: u32) {
        self.page = page;
        self.rect.place(x, y);
    }

    pub(crate) fn set_status(&mut self, status: GlyphStatus) {
        self.status = status;
    }

    /// Bounds of the textured quad in layout units, relative to the glyph origin.
    ///
    /// The quad is inset by half a texel so that it samples texel centers only. Empty boxes
    /// yield zero bounds.
    pub fn quad_plane_bounds(&self) -> Bounds {
        if self.rect.is_empty() {
            return Bounds::default();
        }
        let texel = 1.0 / self.scale;
        let gs = self.geometry_scale;
        Bounds {
            l: gs * (-self.translate.x + 0.5 * texel),
            b: gs * (-self.translate.y + 0.5 * texel),
            r: gs * (-self.translate.x + (f64::from(self.rect.width()) - 0.5) * texel),
            t: gs * (-self.translate.y + (f64::from(self.rect.height()) - 0.5) * texel),
        }
    }

    /// Bounds of the textured quad in atlas pixels, measured from the bottom left corner.
    ///
    /// Inset by half a texel like [`quad_plane_bounds`](Self::quad_plane_bounds). Empty or
    /// unplaced boxes yield zero bounds.
    pub fn quad_atlas_bounds(&self) -> Bounds {
        let Some((x, y)) = self.rect.position() else {
            return Bounds::default();
        };
        if self.rect.is_empty() {
            return Bounds::default();
        }
        let (x, y) = (f64::from(x), f64::from(y));
        Bounds {
            l: x + 0.5,
            b: y + 0.5,
            r: x + f64::from(self.rect.width()) - 0.5,
            t: y + f64::from(self.rect.height()) - 0.5,
        }
    }
}

/// `ceil(extent) + 1`, saturating at the largest representable size.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to the u32 range first"
)]
fn pixel_extent(extent: f64) -> u32 {
    (extent.ceil() + 1.0).clamp(0.0, f64::from(u32::MAX)) as u32
}
