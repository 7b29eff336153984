// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas Packer places sized rectangles into fixed-size containers and searches for the
//! smallest container that holds a whole set.
//!
//! The crate has three layers:
//!
//! - [`RectanglePacker`] packs a batch of [`Rectangle`]s into a container of known size and
//!   reports how many did not fit.
//! - [`SizeSelector`] implementations describe families of candidate container sizes
//!   (exact squares, powers of two, fixed aspect ratios). [`RectanglePacker::pack_with_selector`]
//!   searches them for the smallest admissible size.
//! - [`ShelfAllocator`] places rectangles one at a time and can be grown in place, which is
//!   what incremental atlases need.
//!
//! Packing is deterministic: the same input always yields the same positions, independent of
//! platform or caller. Placed rectangles never overlap, including their padding, which lets
//! callers fill the placed regions concurrently without synchronization.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.

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
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod error;
mod packer;
mod rectangle;
mod shelf;
mod size_selector;

pub use crate::error::PackError;
pub use crate::packer::{RectanglePacker, find_overlap};
pub use crate::rectangle::Rectangle;
pub use crate::shelf::ShelfAllocator;
pub use crate::size_selector::{
    AspectRatioSizeSelector, PowerOfTwoSizeSelector, SizeSelector, SquarePowerOfTwoSizeSelector,
    SquareSizeSelector,
};
