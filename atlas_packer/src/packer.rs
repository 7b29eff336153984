// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch packing into fixed-size containers.

use alloc::vec::Vec;
use core::cmp::Reverse;

use crate::{PackError, Rectangle, SizeSelector};

/// Packs batches of rectangles into a container of fixed size.
///
/// Rectangles are visited tallest first (ties broken by width, then by their index in the
/// input slice) and laid out left to right on horizontal shelves. A new shelf is opened
/// below the current one when the next rectangle no longer fits on it.
///
/// Each rectangle occupies its own size plus `padding` to the right and below. Those padded
/// footprints never overlap and always lie inside the container. A rectangle whose
/// footprint alone exceeds the container is never placed.
///
/// Because shelves are filled strictly in order, a set that fits `(w, h)` also fits every
/// `(w', h')` with `w' >= w` and `h' >= h`. The size search in
/// [`pack_with_selector`](Self::pack_with_selector) relies on that.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RectanglePacker {
    width: u32,
    height: u32,
    padding: u32,
}

/// The currently open shelf during a batch pack.
#[derive(Copy, Clone, Debug)]
struct OpenShelf {
    y: u64,
    height: u64,
    cursor: u64,
}

impl RectanglePacker {
    /// Creates a packer for a `width` × `height` container without padding.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: 0,
        }
    }

    /// Sets the gutter reserved to the right of and below every rectangle.
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Container width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Container height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Padding gutter.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Places as many rectangles as possible and returns how many were left unplaced.
    ///
    /// Previous positions are discarded. Unplaced rectangles end up with no position.
    pub fn pack(&self, rectangles: &mut [Rectangle]) -> usize {
        for rect in rectangles.iter_mut() {
            rect.clear_position();
        }

        let width = u64::from(self.width);
        let height = u64::from(self.height);
        let mut shelf: Option<OpenShelf> = None;
        let mut unplaced = 0;

        for index in packing_order(rectangles) {
            let rect = &mut rectangles[index];
            let (fw, fh) = rect.footprint(self.padding);
            if fw > width || fh > height {
                unplaced += 1;
                continue;
            }

            // Visiting order is by descending height, so `fh` never exceeds the open shelf.
            if let Some(open) = shelf.as_mut() {
                if open.cursor + fw <= width {
                    place(rect, open.cursor, open.y);
                    open.cursor += fw;
                    continue;
                }
            }

            let next_y = shelf.map_or(0, |open| open.y + open.height);
            if next_y + fh <= height {
                place(rect, 0, next_y);
                shelf = Some(OpenShelf {
                    y: next_y,
                    height: fh,
                    cursor: fw,
                });
            } else {
                unplaced += 1;
            }
        }

        debug_assert!(
            find_overlap(rectangles, self.padding).is_none(),
            "packed rectangles must not overlap"
        );
        unplaced
    }

    /// Like [`pack`](Self::pack), but reports any unplaced rectangle as an error.
    pub fn try_pack(&self, rectangles: &mut [Rectangle]) -> Result<(), PackError> {
        match self.pack(rectangles) {
            0 => Ok(()),
            unplaced => Err(PackError::Overflow {
                unplaced,
                total: rectangles.len(),
            }),
        }
    }

    /// Finds the smallest container offered by `selector` that holds every rectangle.
    ///
    /// Candidates larger than `max_dimensions` in either axis are not considered. On success
    /// every rectangle carries its position in the returned `(width, height)` container.
    /// An empty set packs into `(0, 0)`.
    ///
    /// The search starts at the first candidate whose area covers the padded rectangles,
    /// gallops upward until a candidate fits, and then bisects between the last failure and
    /// the first fit.
    pub fn pack_with_selector<S: SizeSelector + ?Sized>(
        rectangles: &mut [Rectangle],
        padding: u32,
        selector: &S,
        max_dimensions: Option<(u32, u32)>,
    ) -> Result<(u32, u32), PackError> {
        if rectangles.is_empty() {
            return Ok((0, 0));
        }

        let (max_width, max_height) = max_dimensions.unwrap_or((u32::MAX, u32::MAX));
        let exhausted = PackError::SizeSearchExhausted {
            max_width,
            max_height,
        };
        let admissible = |step: u32| {
            selector
                .dimensions(step)
                .filter(|&(w, h)| w <= max_width && h <= max_height)
        };
        let fits = |rectangles: &mut [Rectangle], (w, h): (u32, u32)| {
            let unplaced = Self::new(w, h).with_padding(padding).pack(rectangles);
            log::trace!("size search: {w}x{h} leaves {unplaced} unplaced");
            unplaced == 0
        };

        let min_area = rectangles.iter().fold(0_u64, |area, rect| {
            let (fw, fh) = rect.footprint(padding);
            area.saturating_add(fw.saturating_mul(fh))
        });
        let first = selector.first_step(min_area);

        // Gallop upward. `lower` is the smallest step not yet known to fail.
        let mut lower = first;
        let mut step = first;
        let mut stride = 1_u32;
        let (mut upper, mut best) = loop {
            match admissible(step) {
                Some(dimensions) => {
                    if fits(rectangles, dimensions) {
                        break (step, dimensions);
                    }
                    lower = step.checked_add(1).ok_or(exhausted)?;
                    step = step.checked_add(stride).ok_or(exhausted)?;
                    stride = stride.saturating_mul(2);
                }
                None => {
                    // Past the bounds: close in on the largest admissible step.
                    if step <= lower {
                        return Err(exhausted);
                    }
                    stride = 1;
                    step = lower + (step - lower) / 2;
                }
            }
        };

        // Bisect in `[lower, upper)`.
        while lower < upper {
            let mid = lower + (upper - lower) / 2;
            let dimensions = admissible(mid).ok_or(exhausted)?;
            if fits(rectangles, dimensions) {
                upper = mid;
                best = dimensions;
            } else {
                lower = mid + 1;
            }
        }

        // The last probe may have been a failure; restore the winning layout.
        Self::new(best.0, best.1)
            .with_padding(padding)
            .try_pack(rectangles)?;
        log::debug!(
            "size search settled on {}x{} for {} rectangles",
            best.0,
            best.1,
            rectangles.len()
        );
        Ok(best)
    }
}

/// Returns the first pair of placed rectangles whose padded footprints intersect.
///
/// The pair is reported as indices into `rectangles`, smaller index first. Unplaced
/// rectangles and footprints without area are ignored.
pub fn find_overlap(rectangles: &[Rectangle], padding: u32) -> Option<(usize, usize)> {
    let mut spans: Vec<(u64, u64, u64, u64, usize)> = rectangles
        .iter()
        .enumerate()
        .filter_map(|(index, rect)| {
            let (x, y) = rect.position()?;
            let (fw, fh) = rect.footprint(padding);
            if fw == 0 || fh == 0 {
                return None;
            }
            let (x, y) = (u64::from(x), u64::from(y));
            Some((x, y, x + fw, y + fh, index))
        })
        .collect();
    spans.sort_unstable();

    for (i, a) in spans.iter().enumerate() {
        for b in &spans[i + 1..] {
            if b.0 >= a.2 {
                break;
            }
            if b.1 < a.3 && a.1 < b.3 {
                return Some((a.4.min(b.4), a.4.max(b.4)));
            }
        }
    }
    None
}

/// Indices sorted by descending height, then descending width, then ascending index.
fn packing_order(rectangles: &[Rectangle]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rectangles.len()).collect();
    order.sort_by_key(|&i| {
        let rect = &rectangles[i];
        (Reverse(rect.height()), Reverse(rect.width()), i)
    });
    order
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "positions are bounded by the u32 container size"
)]
fn place(rect: &mut Rectangle, x: u64, y: u64) {
    rect.place(x as u32, y as u32);
}
