// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Families of candidate container sizes.

/// An ordered family of candidate container sizes.
///
/// Candidates are indexed by a step number. Both dimensions must be non-decreasing in the
/// step, so that a search can treat "fits at step `n`" as a monotonic predicate.
pub trait SizeSelector {
    /// The container size for `step`, or `None` if it is not representable.
    fn dimensions(&self, step: u32) -> Option<(u32, u32)>;

    /// The smallest step whose container area is at least `min_area`.
    ///
    /// Smaller steps cannot hold rectangles of that total area and are never probed.
    fn first_step(&self, min_area: u64) -> u32;
}

/// Square containers whose side is a multiple of a fixed value.
///
/// A multiple of `1` yields the exact minimal square. `2` and `4` yield even and
/// multiple-of-four squares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SquareSizeSelector {
    multiple: u32,
}

impl SquareSizeSelector {
    /// Creates a selector for squares with sides divisible by `multiple`.
    ///
    /// A `multiple` of zero is treated as one.
    pub fn new(multiple: u32) -> Self {
        Self {
            multiple: multiple.max(1),
        }
    }
}

impl Default for SquareSizeSelector {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SizeSelector for SquareSizeSelector {
    fn dimensions(&self, step: u32) -> Option<(u32, u32)> {
        let side = step.checked_mul(self.multiple)?;
        Some((side, side))
    }

    fn first_step(&self, min_area: u64) -> u32 {
        let side = ceil_sqrt(min_area);
        saturate(side.div_ceil(u64::from(self.multiple))).max(1)
    }
}

/// Square containers with power-of-two sides.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SquarePowerOfTwoSizeSelector;

impl SizeSelector for SquarePowerOfTwoSizeSelector {
    fn dimensions(&self, step: u32) -> Option<(u32, u32)> {
        let side = 1_u32.checked_shl(step)?;
        Some((side, side))
    }

    fn first_step(&self, min_area: u64) -> u32 {
        // Area of step `k` is `4^k`.
        ceil_log2(min_area).div_ceil(2)
    }
}

/// Power-of-two containers that are either square or twice as wide as they are tall.
///
/// Candidates alternate between doubling the width and doubling the height:
/// `1x1, 2x1, 2x2, 4x2, 4x4, ...`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerOfTwoSizeSelector;

impl SizeSelector for PowerOfTwoSizeSelector {
    fn dimensions(&self, step: u32) -> Option<(u32, u32)> {
        let width = 1_u32.checked_shl(step.div_ceil(2))?;
        let height = 1_u32.checked_shl(step / 2)?;
        Some((width, height))
    }

    fn first_step(&self, min_area: u64) -> u32 {
        // Area of step `k` is `2^k`.
        ceil_log2(min_area)
    }
}

/// Containers with a fixed `width : height` ratio.
///
/// The step is the height; the width is the height scaled by the ratio, rounded up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AspectRatioSizeSelector {
    width_ratio: u32,
    height_ratio: u32,
}

impl AspectRatioSizeSelector {
    /// Creates a selector for containers shaped `width_ratio : height_ratio`.
    ///
    /// Zero terms are treated as one.
    pub fn new(width_ratio: u32, height_ratio: u32) -> Self {
        Self {
            width_ratio: width_ratio.max(1),
            height_ratio: height_ratio.max(1),
        }
    }

    fn area(&self, step: u32) -> Option<u64> {
        let (w, h) = self.dimensions(step)?;
        Some(u64::from(w) * u64::from(h))
    }
}

impl SizeSelector for AspectRatioSizeSelector {
    fn dimensions(&self, step: u32) -> Option<(u32, u32)> {
        let width = (u64::from(step) * u64::from(self.width_ratio))
            .div_ceil(u64::from(self.height_ratio));
        Some((u32::try_from(width).ok()?, step))
    }

    fn first_step(&self, min_area: u64) -> u32 {
        // Estimate from the real-valued solution, then settle on the exact step.
        let scaled = u128::from(min_area) * u128::from(self.height_ratio)
            / u128::from(self.width_ratio);
        let mut step = saturate(ceil_sqrt(u64::try_from(scaled).unwrap_or(u64::MAX)))
            .saturating_sub(1)
            .max(1);
        while step > 1 && self.area(step - 1).is_some_and(|area| area >= min_area) {
            step -= 1;
        }
        while self.area(step).is_some_and(|area| area < min_area) && step < u32::MAX {
            step += 1;
        }
        step
    }
}

/// Smallest `r` with `r * r >= n`.
fn ceil_sqrt(n: u64) -> u64 {
    let root = n.isqrt();
    if root * root < n { root + 1 } else { root }
}

/// Smallest `k` with `2^k >= n`.
fn ceil_log2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        u64::BITS - (n - 1).leading_zeros()
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
