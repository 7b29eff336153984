// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph Atlas packs glyphs into atlas pages and drives the generation of their
//! distance-field bitmaps.
//!
//! The typical flow is:
//!
//! 1. Load glyph boxes from a [`ShapeSource`] into a [`FontGeometry`], either for a
//!    [`Charset`] or for a range of glyph indices.
//! 2. Size and position them with a [`TightAtlasPacker`], which either packs into fixed
//!    dimensions (optionally maximizing the scale) or searches for the smallest atlas
//!    satisfying a [`DimensionsConstraint`].
//! 3. Fill a [`BitmapAtlasStorage`] with an [`AtlasGenerator`]. Each glyph is rendered by an
//!    external [`BitmapGenerator`] on a worker pool and copied straight into its own region of
//!    the atlas. Regions never overlap, so those copies need no locking.
//! 4. Describe the result with [`export::layout_json`].
//!
//! When the glyph set is not known upfront, [`ImmediateAtlasGenerator`] inserts glyphs one at a
//! time into a [`DynamicAtlas`], which grows without moving anything already placed.
//!
//! Computing distance fields and parsing fonts are left to the caller. Finished pages are
//! plain pixel buffers that can be handed to any image encoder.
//!
//! ## Features
//!
//! - `parallel` (enabled by default): Run bulk generation on a [rayon] thread pool. Without it,
//!   every glyph is generated on the calling thread.
//!
//! [rayon]: https://docs.rs/rayon

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bitmap;
mod dynamic_atlas;
mod error;
mod font_geometry;
mod generator;
mod glyph_box;
mod immediate;
mod region_writer;
mod settings;
mod storage;
mod tight_packer;
mod types;
mod workload;

pub mod export;

pub use atlas_packer::{PackError, Rectangle};

pub use bitmap::{Bitmap, BitmapMut, BitmapRef, Pixel, blit};
pub use dynamic_atlas::{AtlasState, DynamicAtlas, GrowthPolicy};
pub use error::{AtlasError, GlyphError};
pub use font_geometry::{Charset, FontGeometry, FontMetrics, GlyphShape, KerningPair, ShapeSource};
pub use generator::{AtlasGenerator, BitmapGenerator, GenerationReport, GeneratorAttributes};
pub use glyph_box::{GlyphBox, GlyphStatus};
pub use immediate::ImmediateAtlasGenerator;
pub use region_writer::{RegionToken, RegionWriter};
pub use settings::{AtlasSettings, Dimensions};
pub use storage::{AtlasStorage, BitmapAtlasStorage, PageRegion};
pub use tight_packer::{AtlasLayout, DimensionsConstraint, ScaleMode, TightAtlasPacker};
pub use types::{Bounds, GlyphIdentifierType, ImageType, Vector2, YOrigin};
pub use workload::Workload;
