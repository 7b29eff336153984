// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing glyph boxes and packing them into a single atlas page.

use atlas_packer::{
    AspectRatioSizeSelector, PowerOfTwoSizeSelector, Rectangle, RectanglePacker, SizeSelector,
    SquarePowerOfTwoSizeSelector, SquareSizeSelector,
};
use serde::{Deserialize, Serialize};

use crate::error::AtlasError;
use crate::glyph_box::GlyphBox;

/// Shape requirement for atlas dimensions chosen by the packer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionsConstraint {
    /// A square whose side is a power of two.
    #[default]
    PowerOfTwoSquare,
    /// A power-of-two rectangle, at most twice as wide as it is high.
    PowerOfTwoRectangle,
    /// A square whose side is a multiple of four.
    MultipleOfFourSquare,
    /// A square whose side is even.
    EvenSquare,
    /// Any square.
    Square,
    /// A fixed `width` : `height` ratio, rounded up to whole pixels.
    AspectRatio {
        /// Width part of the ratio.
        width: u32,
        /// Height part of the ratio.
        height: u32,
    },
}

impl DimensionsConstraint {
    /// The size selector enumerating candidate dimensions for this constraint.
    pub fn selector(self) -> Box<dyn SizeSelector> {
        match self {
            Self::PowerOfTwoSquare => Box::new(SquarePowerOfTwoSizeSelector),
            Self::PowerOfTwoRectangle => Box::new(PowerOfTwoSizeSelector),
            Self::MultipleOfFourSquare => Box::new(SquareSizeSelector::new(4)),
            Self::EvenSquare => Box::new(SquareSizeSelector::new(2)),
            Self::Square => Box::new(SquareSizeSelector::new(1)),
            Self::AspectRatio { width, height } => {
                Box::new(AspectRatioSizeSelector::new(width, height))
            }
        }
    }
}

/// How glyphs are scaled from layout units to pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleMode {
    /// One scale for every glyph.
    ///
    /// `None` lets the packer pick the largest scale that fits the fixed dimensions.
    Uniform(Option<f64>),
    /// An independent scale for each glyph group, indexed by [`GlyphBox::group`].
    PerGroup(Vec<f64>),
}

impl Default for ScaleMode {
    fn default() -> Self {
        Self::Uniform(None)
    }
}

/// The result of [`TightAtlasPacker::pack`].
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasLayout {
    width: u32,
    height: u32,
    scales: Vec<f64>,
    per_group: bool,
    px_range: f64,
    unit_range: f64,
}

impl AtlasLayout {
    /// Atlas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Atlas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The uniform scale in pixels per layout unit, or `None` when scaling per group.
    pub fn scale(&self) -> Option<f64> {
        if self.per_group {
            None
        } else {
            self.scales.first().copied()
        }
    }

    /// The scale applied to glyphs of `group`.
    pub fn scale_for(&self, group: usize) -> Option<f64> {
        if self.per_group {
            self.scales.get(group).copied()
        } else {
            self.scales.first().copied()
        }
    }

    /// Width of the distance-field range in pixels for glyphs of `group`.
    pub fn pixel_range(&self, group: usize) -> Option<f64> {
        self.scale_for(group)
            .map(|scale| self.px_range + self.unit_range * scale)
    }
}

/// Sizes every glyph's atlas rectangle and packs them all into one page.
///
/// The distance-field range of a glyph is `unit_range` layout units plus `px_range`
/// pixels. With fixed [`dimensions`](Self::with_dimensions) and no scale, the packer
/// searches for the largest uniform scale that still fits. Without fixed dimensions, the
/// smallest dimensions satisfying the [`DimensionsConstraint`] are searched for instead.
#[derive(Clone, Debug, PartialEq)]
pub struct TightAtlasPacker {
    dimensions: Option<(u32, u32)>,
    constraint: DimensionsConstraint,
    max_dimension: Option<u32>,
    padding: u32,
    scale: ScaleMode,
    min_scale: Option<f64>,
    px_range: f64,
    unit_range: f64,
    tolerance: f64,
}

impl Default for TightAtlasPacker {
    fn default() -> Self {
        Self {
            dimensions: None,
            constraint: DimensionsConstraint::default(),
            max_dimension: None,
            padding: 0,
            scale: ScaleMode::default(),
            min_scale: None,
            px_range: 2.0,
            unit_range: 0.0,
            tolerance: 0.001,
        }
    }
}

impl TightAtlasPacker {
    /// Creates a packer with a 2 pixel range, no padding and no scale set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Packs into exactly `width` × `height` pixels.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Sets the constraint used when searching for dimensions.
    #[must_use]
    pub fn with_constraint(mut self, constraint: DimensionsConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Limits searched dimensions to `max` pixels on each side.
    #[must_use]
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = Some(max);
        self
    }

    /// Sets the gutter between glyph rectangles.
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Uses `scale` pixels per layout unit for every glyph.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = ScaleMode::Uniform(Some(scale));
        self
    }

    /// Sets the scaling mode.
    #[must_use]
    pub fn with_scale_mode(mut self, mode: ScaleMode) -> Self {
        self.scale = mode;
        self
    }

    /// Sets the scale used to search for dimensions when no scale is given.
    #[must_use]
    pub fn with_min_scale(mut self, scale: f64) -> Self {
        self.min_scale = Some(scale);
        self
    }

    /// Sets the part of the distance-field range measured in pixels.
    #[must_use]
    pub fn with_pixel_range(mut self, range: f64) -> Self {
        self.px_range = range;
        self
    }

    /// Sets the part of the distance-field range measured in layout units.
    #[must_use]
    pub fn with_unit_range(mut self, range: f64) -> Self {
        self.unit_range = range;
        self
    }

    /// Sets the relative precision of the scale search.
    #[must_use]
    pub fn with_scale_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Fixed dimensions, if any.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// The dimensions constraint.
    pub fn constraint(&self) -> DimensionsConstraint {
        self.constraint
    }

    /// Padding gutter.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// The scaling mode.
    pub fn scale_mode(&self) -> &ScaleMode {
        &self.scale
    }

    /// Wraps and packs `glyphs`, leaving each non-empty glyph placed on page 0.
    ///
    /// Fails with [`AtlasError::NoScale`] when neither a scale nor fixed dimensions are
    /// set, and with [`AtlasError::Packing`] when the glyphs do not fit. Glyphs with an
    /// empty box are never placed.
    pub fn pack(&self, glyphs: &mut [GlyphBox]) -> Result<AtlasLayout, AtlasError> {
        let (dimensions, scales) = match &self.scale {
            ScaleMode::PerGroup(scales) => {
                for &scale in scales {
                    check_scale(scale)?;
                }
                (self.try_pack(glyphs, self.dimensions, 1.0)?, scales.clone())
            }
            ScaleMode::Uniform(fixed) => {
                let initial = fixed.or(self.min_scale);
                let mut dimensions = self.dimensions;
                if let Some(scale) = initial {
                    check_scale(scale)?;
                    dimensions = Some(self.try_pack(glyphs, dimensions, scale)?);
                }
                let Some(dimensions) = dimensions else {
                    return Err(AtlasError::NoScale);
                };
                let scale = match fixed {
                    Some(scale) => *scale,
                    None => self.maximize_scale(glyphs, dimensions)?,
                };
                (dimensions, vec![scale])
            }
        };

        let layout = AtlasLayout {
            width: dimensions.0,
            height: dimensions.1,
            scales,
            per_group: matches!(self.scale, ScaleMode::PerGroup(_)),
            px_range: self.px_range,
            unit_range: self.unit_range,
        };
        log::debug!(
            "packed {} glyphs into {}x{}, scale {:?}",
            glyphs.len(),
            layout.width,
            layout.height,
            layout.scales
        );
        Ok(layout)
    }

    /// Wraps every glyph at `scale` and packs them, into `dimensions` if given.
    ///
    /// Returns the dimensions used.
    fn try_pack(
        &self,
        glyphs: &mut [GlyphBox],
        dimensions: Option<(u32, u32)>,
        scale: f64,
    ) -> Result<(u32, u32), AtlasError> {
        let mut rects = Vec::with_capacity(glyphs.len());
        for (index, glyph) in glyphs.iter_mut().enumerate() {
            let scale = match &self.scale {
                ScaleMode::PerGroup(scales) => {
                    *scales.get(glyph.group()).ok_or_else(|| {
                        AtlasError::InvalidSettings(format!(
                            "no scale for glyph group {}",
                            glyph.group()
                        ))
                    })?
                }
                ScaleMode::Uniform(_) => scale,
            };
            glyph.wrap_box(scale, self.unit_range + self.px_range / scale);
            if !glyph.is_empty() {
                rects.push(Rectangle::new(index, glyph.rect().width(), glyph.rect().height()));
            }
        }

        let dimensions = match dimensions {
            Some((width, height)) => {
                RectanglePacker::new(width, height)
                    .with_padding(self.padding)
                    .try_pack(&mut rects)?;
                (width, height)
            }
            None => RectanglePacker::pack_with_selector(
                &mut rects,
                self.padding,
                &*self.constraint.selector(),
                self.max_dimension.map(|max| (max, max)),
            )?,
        };

        for rect in &rects {
            if let Some((x, y)) = rect.position() {
                glyphs[rect.id].place(0, x, y);
            }
        }
        Ok(dimensions)
    }

    /// Whether every glyph fits into `dimensions` at `scale`.
    fn fits(
        &self,
        glyphs: &mut [GlyphBox],
        dimensions: (u32, u32),
        scale: f64,
    ) -> Result<bool, AtlasError> {
        let fits = match self.try_pack(glyphs, Some(dimensions), scale) {
            Ok(_) => true,
            Err(AtlasError::Packing(_)) => false,
            Err(err) => return Err(err),
        };
        log::trace!("scale search: {scale} fits = {fits}");
        Ok(fits)
    }

    /// Finds the largest scale at which `glyphs` fit into `dimensions`.
    ///
    /// Doubles or halves from 1 until the answer is bracketed, then bisects. On return, the
    /// glyphs are packed at the returned scale.
    fn maximize_scale(
        &self,
        glyphs: &mut [GlyphBox],
        dimensions: (u32, u32),
    ) -> Result<f64, AtlasError> {
        if glyphs.iter().all(GlyphBox::is_whitespace) {
            self.try_pack(glyphs, Some(dimensions), 1.0)?;
            return Ok(1.0);
        }

        let (mut min, mut max) = (1.0_f64, 1.0_f64);
        let mut last_fit = self.fits(glyphs, dimensions, 1.0)?;
        let bracketed = if last_fit {
            loop {
                if max >= 1e32 {
                    break false;
                }
                max = 2.0 * min;
                last_fit = self.fits(glyphs, dimensions, max)?;
                if !last_fit {
                    break true;
                }
                min = max;
            }
        } else {
            loop {
                if min <= 1e-32 {
                    break false;
                }
                min = 0.5 * max;
                last_fit = self.fits(glyphs, dimensions, min)?;
                if last_fit {
                    break true;
                }
                max = min;
            }
        };
        if !bracketed {
            return Err(AtlasError::NoScale);
        }

        let tolerance = self.tolerance.clamp(1e-9, 0.5);
        while min / max < 1.0 - tolerance {
            let mid = 0.5 * (min + max);
            last_fit = self.fits(glyphs, dimensions, mid)?;
            if last_fit {
                min = mid;
            } else {
                max = mid;
            }
        }
        if !last_fit {
            self.try_pack(glyphs, Some(dimensions), min)?;
        }
        log::debug!(
            "largest scale fitting {}x{} is {min}",
            dimensions.0,
            dimensions.1
        );
        Ok(min)
    }
}

fn check_scale(scale: f64) -> Result<(), AtlasError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(AtlasError::InvalidSettings(format!(
            "scale must be positive, got {scale}"
        )))
    }
}
