// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A serializable description of an atlas build.

use serde::{Deserialize, Serialize};

use crate::bitmap::Pixel;
use crate::dynamic_atlas::{DynamicAtlas, GrowthPolicy};
use crate::error::AtlasError;
use crate::export::ExportOptions;
use crate::generator::{AtlasGenerator, GeneratorAttributes};
use crate::tight_packer::{DimensionsConstraint, ScaleMode, TightAtlasPacker};
use crate::types::{ImageType, YOrigin};

/// Fixed atlas dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Settings for packing and generating an atlas.
///
/// Every field is optional in the serialized form, using camelCase keys:
///
/// ```
/// use glyph_atlas::{AtlasSettings, ImageType};
///
/// let settings = AtlasSettings::from_json_str(
///     r#"{ "type": "sdf", "scale": 32, "pxRange": 4, "padding": 1 }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.image_type, ImageType::Sdf);
/// assert_eq!(settings.packer().padding(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AtlasSettings {
    /// Kind of bitmap, which also fixes the channel count.
    #[serde(rename = "type")]
    pub image_type: ImageType,
    /// Fixed atlas dimensions. When absent, dimensions are searched for.
    pub dimensions: Option<Dimensions>,
    /// Shape of searched dimensions.
    pub constraint: DimensionsConstraint,
    /// Largest searched side length.
    pub max_dimension: Option<u32>,
    /// Gutter between glyph rectangles.
    pub padding: u32,
    /// Uniform scale in pixels per em. When absent with fixed dimensions, the largest
    /// fitting scale is used.
    pub scale: Option<f64>,
    /// Scales per glyph group. Takes precedence over `scale` when not empty.
    pub group_scales: Vec<f64>,
    /// Scale used to search for dimensions when `scale` is absent.
    pub min_scale: Option<f64>,
    /// Distance-field range in pixels.
    pub px_range: f64,
    /// Distance-field range in ems.
    pub unit_range: f64,
    /// Relative precision of the scale search.
    pub scale_tolerance: f64,
    /// Worker threads. Zero uses the hardware concurrency.
    pub threads: usize,
    /// Whether the bitmap generator should resolve overlapping contours.
    pub overlap_support: bool,
    /// Whether the bitmap generator should run a scanline sign pass.
    pub scanline_pass: bool,
    /// Vertical origin of exported coordinates.
    pub y_origin: YOrigin,
    /// Whether exported layouts include kerning.
    pub kerning: bool,
    /// Side of the first page of a dynamic atlas.
    pub initial_size: u32,
    /// How a dynamic atlas grows.
    pub growth: GrowthPolicy,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            image_type: ImageType::default(),
            dimensions: None,
            constraint: DimensionsConstraint::default(),
            max_dimension: None,
            padding: 0,
            scale: None,
            group_scales: Vec::new(),
            min_scale: None,
            px_range: 2.0,
            unit_range: 0.0,
            scale_tolerance: 0.001,
            threads: 0,
            overlap_support: true,
            scanline_pass: false,
            y_origin: YOrigin::default(),
            kerning: true,
            initial_size: 256,
            growth: GrowthPolicy::default(),
        }
    }
}

impl AtlasSettings {
    /// Parses and validates a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, AtlasError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|err| AtlasError::InvalidSettings(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings for values no component can work with.
    pub fn validate(&self) -> Result<(), AtlasError> {
        let invalid = |message: String| Err(AtlasError::InvalidSettings(message));

        let scales = self.scale.iter().chain(&self.min_scale).chain(&self.group_scales);
        for &scale in scales {
            if !(scale.is_finite() && scale > 0.0) {
                return invalid(format!("scales must be positive, got {scale}"));
            }
        }
        for (name, range) in [("pxRange", self.px_range), ("unitRange", self.unit_range)] {
            if !(range.is_finite() && range >= 0.0) {
                return invalid(format!("{name} must not be negative, got {range}"));
            }
        }
        if self.image_type.is_distance_field() && self.px_range + self.unit_range <= 0.0 {
            return invalid(format!(
                "{:?} atlases need a positive distance range",
                self.image_type
            ));
        }
        if !(self.scale_tolerance > 0.0 && self.scale_tolerance < 1.0) {
            return invalid(format!(
                "scaleTolerance must be between 0 and 1, got {}",
                self.scale_tolerance
            ));
        }
        if let Some(Dimensions { width, height }) = self.dimensions {
            if width == 0 || height == 0 {
                return invalid(format!("dimensions must not be zero, got {width}x{height}"));
            }
        }
        if self.max_dimension == Some(0) {
            return invalid("maxDimension must not be zero".into());
        }
        if let DimensionsConstraint::AspectRatio { width: 0, .. }
        | DimensionsConstraint::AspectRatio { height: 0, .. } = self.constraint
        {
            return invalid("aspect ratio parts must not be zero".into());
        }
        if self.initial_size == 0 {
            return invalid("initialSize must not be zero".into());
        }
        let has_scale =
            self.scale.is_some() || self.min_scale.is_some() || !self.group_scales.is_empty();
        if self.dimensions.is_none() && !has_scale {
            return Err(AtlasError::NoScale);
        }
        Ok(())
    }

    /// The scaling mode described by `scale` and `group_scales`.
    pub fn scale_mode(&self) -> ScaleMode {
        if self.group_scales.is_empty() {
            ScaleMode::Uniform(self.scale)
        } else {
            ScaleMode::PerGroup(self.group_scales.clone())
        }
    }

    /// A packer configured from these settings.
    pub fn packer(&self) -> TightAtlasPacker {
        let mut packer = TightAtlasPacker::new()
            .with_constraint(self.constraint)
            .with_padding(self.padding)
            .with_scale_mode(self.scale_mode())
            .with_pixel_range(self.px_range)
            .with_unit_range(self.unit_range)
            .with_scale_tolerance(self.scale_tolerance);
        if let Some(Dimensions { width, height }) = self.dimensions {
            packer = packer.with_dimensions(width, height);
        }
        if let Some(max) = self.max_dimension {
            packer = packer.with_max_dimension(max);
        }
        if let Some(scale) = self.min_scale {
            packer = packer.with_min_scale(scale);
        }
        packer
    }

    /// Attributes handed to the bitmap generator.
    pub fn generator_attributes(&self) -> GeneratorAttributes {
        GeneratorAttributes {
            image_type: self.image_type,
            overlap_support: self.overlap_support,
            scanline_pass: self.scanline_pass,
        }
    }

    /// Wraps `generator` in an [`AtlasGenerator`] using these attributes and thread count.
    pub fn generator<G>(&self, generator: G) -> AtlasGenerator<G> {
        AtlasGenerator::new(generator)
            .with_attributes(self.generator_attributes())
            .with_threads(self.threads)
    }

    /// Options for [`layout_json`](crate::export::layout_json).
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            image_type: self.image_type,
            y_origin: self.y_origin,
            kerning: self.kerning,
        }
    }

    /// An empty dynamic atlas with the channel count of the image type.
    pub fn dynamic_atlas<T: Pixel>(&self) -> DynamicAtlas<T> {
        DynamicAtlas::new(self.initial_size, self.image_type.channels())
            .with_padding(self.padding)
            .with_growth_policy(self.growth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AtlasStorage;

    #[test]
    fn defaults_fill_missing_fields() {
        let settings =
            AtlasSettings::from_json_str(r#"{ "dimensions": { "width": 512, "height": 256 } }"#)
                .unwrap();
        assert_eq!(settings.image_type, ImageType::Msdf);
        assert_eq!(settings.px_range, 2.0);
        assert_eq!(settings.scale_mode(), ScaleMode::Uniform(None));
        assert_eq!(settings.packer().dimensions(), Some((512, 256)));
        assert_eq!(settings.growth, GrowthPolicy::Enlarge { max_size: 4096 });
    }

    #[test]
    fn parses_camel_case() {
        let settings = AtlasSettings::from_json_str(
            r#"{
                "type": "mtsdf",
                "constraint": { "aspectRatio": { "width": 2, "height": 1 } },
                "maxDimension": 1024,
                "groupScales": [32, 48],
                "unitRange": 0.1,
                "pxRange": 0,
                "yOrigin": "top",
                "growth": "addPage",
                "threads": 3
            }"#,
        )
        .unwrap();
        assert_eq!(
            settings.constraint,
            DimensionsConstraint::AspectRatio {
                width: 2,
                height: 1
            }
        );
        assert_eq!(settings.scale_mode(), ScaleMode::PerGroup(vec![32.0, 48.0]));
        assert_eq!(settings.export_options().y_origin, YOrigin::Top);

        let generator = settings.generator(());
        assert_eq!(generator.attributes().image_type, ImageType::Mtsdf);

        let mut atlas = settings.dynamic_atlas::<f32>();
        assert_eq!(atlas.channels(), 4);
        assert_eq!(atlas.growth_policy(), GrowthPolicy::AddPage);
        atlas.allocate(8, 8).unwrap();
        assert_eq!(atlas.page_size(0), Some((256, 256)));
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{ "scale": -1 }"#,
            r#"{ "scale": 32, "pxRange": -2 }"#,
            r#"{ "scale": 32, "pxRange": 0 }"#,
            r#"{ "scale": 32, "scaleTolerance": 1.5 }"#,
            r#"{ "dimensions": { "width": 0, "height": 64 } }"#,
            r#"{ "scale": 32, "constraint": { "aspectRatio": { "width": 0, "height": 1 } } }"#,
            r#"{ "scale": 32, "colour": "red" }"#,
            r#"{ "scale": "big" }"#,
        ] {
            assert!(
                matches!(
                    AtlasSettings::from_json_str(json),
                    Err(AtlasError::InvalidSettings(_))
                ),
                "{json}"
            );
        }
        assert_eq!(AtlasSettings::from_json_str("{}"), Err(AtlasError::NoScale));
        // Masks do not need a distance range.
        let mask = r#"{ "type": "softmask", "scale": 8, "pxRange": 0 }"#;
        assert!(AtlasSettings::from_json_str(mask).is_ok());
    }
}
