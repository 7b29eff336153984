// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error returned when a rectangle set cannot be packed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackError {
    /// Some rectangles did not fit into a fixed-size container.
    ///
    /// The rectangles that did not fit are the ones left without a position.
    Overflow {
        /// Number of rectangles left without a position.
        unplaced: usize,
        /// Total number of rectangles in the set.
        total: usize,
    },

    /// No candidate size within the configured bounds holds every rectangle.
    SizeSearchExhausted {
        /// Largest admissible container width.
        max_width: u32,
        /// Largest admissible container height.
        max_height: u32,
    },
}

impl PackError {
    /// The number of rectangles that could not be placed, if this is an overflow.
    pub fn unplaced(&self) -> Option<usize> {
        match self {
            Self::Overflow { unplaced, .. } => Some(*unplaced),
            Self::SizeSearchExhausted { .. } => None,
        }
    }
}

impl core::fmt::Display for PackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Overflow { unplaced, total } => {
                write!(f, "{unplaced} of {total} rectangles do not fit the container")
            }
            Self::SizeSearchExhausted {
                max_width,
                max_height,
            } => write!(
                f,
                "no container up to {max_width}x{max_height} holds all rectangles"
            ),
        }
    }
}

impl core::error::Error for PackError {}
