// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use atlas_packer::PackError;

use crate::storage::PageRegion;

/// Errors that stop an atlas operation.
///
/// Packing and sizing errors are reported before any glyph is generated. Failures of single
/// glyphs are not errors of this kind; see [`GlyphError`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum AtlasError {
    /// The glyph rectangles could not be packed.
    #[error(transparent)]
    Packing(#[from] PackError),

    /// Neither a scale nor fixed atlas dimensions were configured.
    #[error("either a scale or fixed atlas dimensions must be specified")]
    NoScale,

    /// A pixel buffer could not be allocated.
    #[error("cannot allocate a {width}x{height} page with {channels} channels")]
    StorageAllocation {
        /// Requested page width.
        width: u32,
        /// Requested page height.
        height: u32,
        /// Channels per pixel.
        channels: usize,
    },

    /// Source and destination disagree on the number of channels per pixel.
    #[error("expected {expected} channels per pixel, got {actual}")]
    ChannelMismatch {
        /// Channels of the destination.
        expected: usize,
        /// Channels of the source.
        actual: usize,
    },

    /// A bitmap does not match the size of the region it is written to.
    #[error("expected a {}x{} bitmap, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    SizeMismatch {
        /// Size of the region.
        expected: (u32, u32),
        /// Size of the bitmap.
        actual: (u32, u32),
    },

    /// A region does not lie within its page.
    #[error("region {region:?} lies outside of its page")]
    RegionOutOfBounds {
        /// The offending region.
        region: PageRegion,
    },

    /// Two regions scheduled for concurrent writes share pixels.
    #[error("regions {first} and {second} overlap")]
    OverlappingRegions {
        /// Index of the first region.
        first: usize,
        /// Index of the second region.
        second: usize,
    },

    /// A region token was presented to a writer that did not issue it.
    #[error("region token belongs to a different writer")]
    ForeignToken,

    /// A glyph with a non-empty box has not been assigned a position.
    #[error("glyph {index} has not been packed")]
    NotPacked {
        /// Index of the glyph in the slice passed to the generator.
        index: usize,
    },

    /// A glyph passed for insertion already has a position.
    #[error("glyph {glyph} is already placed")]
    AlreadyPlaced {
        /// Font index of the glyph.
        glyph: u32,
    },

    /// A region, with its padding, is larger than the largest page the atlas may create.
    #[error("a {width}x{height} region does not fit a page of at most {max_size}x{max_size}")]
    RegionTooLarge {
        /// Region width.
        width: u32,
        /// Region height.
        height: u32,
        /// Largest page side.
        max_size: u32,
    },

    /// The configuration is inconsistent.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Failure to generate the bitmap of a single glyph.
///
/// These never abort a run. They are recorded against the glyph and reported alongside the
/// partially filled atlas.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GlyphError {
    /// The bitmap generator has no outline for the glyph.
    #[error("no outline available for glyph {0}")]
    MissingShape(u32),

    /// The bitmap generator rejected the glyph.
    #[error("bitmap generation failed: {0}")]
    Generation(String),

    /// The scratch buffer for the glyph bitmap could not be allocated.
    #[error("cannot allocate a {width}x{height} scratch bitmap")]
    OutOfMemory {
        /// Bitmap width.
        width: u32,
        /// Bitmap height.
        height: u32,
    },
}
