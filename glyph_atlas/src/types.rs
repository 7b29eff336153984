// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// The kind of bitmap stored in the atlas.
///
/// The atlas does not compute any of these itself. The type only fixes the channel count of
/// the storage and what gets reported to consumers of the layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Rasterized glyph with binary coverage.
    HardMask,
    /// Rasterized glyph with anti-aliased coverage.
    SoftMask,
    /// Single-channel signed distance field.
    Sdf,
    /// Single-channel pseudo-distance field.
    Psdf,
    /// Multi-channel signed distance field.
    #[default]
    Msdf,
    /// Multi-channel signed distance field with a true distance field in alpha.
    Mtsdf,
}

impl ImageType {
    /// Channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::HardMask | Self::SoftMask | Self::Sdf | Self::Psdf => 1,
            Self::Msdf => 3,
            Self::Mtsdf => 4,
        }
    }

    /// Whether pixels encode distances, in which case the distance range is meaningful.
    pub const fn is_distance_field(self) -> bool {
        !matches!(self, Self::HardMask | Self::SoftMask)
    }
}

/// Where the vertical axis of exported coordinates starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YOrigin {
    /// Y grows upward from the bottom edge, like the glyph outlines.
    #[default]
    Bottom,
    /// Y grows downward from the top edge, like most image formats.
    Top,
}

/// How glyphs are identified in exported layouts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GlyphIdentifierType {
    /// By glyph index within the font.
    GlyphIndex,
    /// By Unicode codepoint.
    #[default]
    UnicodeCodepoint,
}

/// An axis-aligned box in a y-up coordinate system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    #[serde(rename = "left")]
    pub l: f64,
    /// Bottom edge.
    #[serde(rename = "bottom")]
    pub b: f64,
    /// Right edge.
    #[serde(rename = "right")]
    pub r: f64,
    /// Top edge.
    #[serde(rename = "top")]
    pub t: f64,
}

impl Bounds {
    /// Creates bounds from edge coordinates.
    pub const fn new(l: f64, b: f64, r: f64, t: f64) -> Self {
        Self { l, b, r, t }
    }

    /// Whether the box encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.l < self.r && self.b < self.t)
    }

    /// Whether every edge is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.r - self.l
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.t - self.b
    }
}

/// A 2D vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector2 {
    /// Creates a vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
