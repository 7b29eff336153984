// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental shelf allocation.

use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Shelf {
    y: u32,
    height: u32,
    /// Next free x coordinate.
    cursor: u32,
}

/// Places rectangles one at a time into horizontal shelves.
///
/// Unlike [`RectanglePacker`](crate::RectanglePacker), the allocator never moves a rectangle
/// once it has been placed. The region can be enlarged with [`grow`](Self::grow), which
/// widens existing shelves and makes room for new ones below, but leaves every previous
/// allocation where it is.
///
/// Each allocation reserves `padding` extra pixels to the right and below, like the batch
/// packer does.
#[derive(Clone, Debug)]
pub struct ShelfAllocator {
    width: u32,
    height: u32,
    padding: u32,
    shelves: Vec<Shelf>,
    /// Bottom edge of the lowest shelf.
    top: u32,
    allocated: usize,
}

impl ShelfAllocator {
    /// Creates an empty allocator for a `width` × `height` region.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: 0,
            shelves: Vec::new(),
            top: 0,
            allocated: 0,
        }
    }

    /// Sets the gutter reserved to the right of and below every allocation.
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Current region width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current region height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Padding gutter.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Number of successful allocations.
    pub fn allocation_count(&self) -> usize {
        self.allocated
    }

    /// Whether nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Height that is still free below the lowest shelf.
    pub fn remaining_height(&self) -> u32 {
        self.height - self.top
    }

    /// Reserves a `width` × `height` rectangle and returns its top-left corner.
    ///
    /// The shelf whose height wastes the least space is preferred, the topmost one on a tie.
    /// A new shelf is opened when no existing one has room. Returns `None` when the region
    /// is full.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let fw = width.checked_add(self.padding)?;
        let fh = height.checked_add(self.padding)?;
        if fw > self.width || fh > self.height {
            return None;
        }

        let region_width = self.width;
        let best = self
            .shelves
            .iter_mut()
            .filter(|shelf| shelf.height >= fh && region_width - shelf.cursor >= fw)
            .min_by_key(|shelf| (shelf.height - fh, shelf.y));
        let position = if let Some(shelf) = best {
            let position = (shelf.cursor, shelf.y);
            shelf.cursor += fw;
            position
        } else {
            if self.height - self.top < fh {
                return None;
            }
            let y = self.top;
            self.shelves.push(Shelf {
                y,
                height: fh,
                cursor: fw,
            });
            self.top += fh;
            (0, y)
        };
        self.allocated += 1;
        Some(position)
    }

    /// Enlarges the region. Dimensions smaller than the current ones are ignored.
    ///
    /// Every previous allocation keeps its position.
    pub fn grow(&mut self, width: u32, height: u32) {
        self.width = self.width.max(width);
        self.height = self.height.max(height);
    }

    /// Forgets every allocation, keeping the region size.
    pub fn clear(&mut self) {
        self.shelves.clear();
        self.top = 0;
        self.allocated = 0;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{Rectangle, find_overlap};

    #[test]
    fn fills_shelves_left_to_right() {
        let mut shelves = ShelfAllocator::new(32, 32).with_padding(1);
        assert_eq!(shelves.allocate(9, 9), Some((0, 0)));
        assert_eq!(shelves.allocate(9, 9), Some((10, 0)));
        assert_eq!(shelves.allocate(9, 9), Some((20, 0)));
        // 30 + 10 > 32
        assert_eq!(shelves.allocate(9, 9), Some((0, 10)));
        assert_eq!(shelves.allocation_count(), 4);
        assert_eq!(shelves.remaining_height(), 12);
    }

    #[test]
    fn prefers_tightest_shelf() {
        let mut shelves = ShelfAllocator::new(64, 64);
        assert_eq!(shelves.allocate(10, 20), Some((0, 0)));
        assert_eq!(shelves.allocate(60, 8), Some((0, 20)));
        // Both shelves have room; the 8 high shelf wastes less.
        assert_eq!(shelves.allocate(4, 6), Some((60, 20)));
        // Only the tall shelf holds this one.
        assert_eq!(shelves.allocate(10, 12), Some((10, 0)));
    }

    #[test]
    fn full_region_rejects() {
        let mut shelves = ShelfAllocator::new(16, 16);
        assert_eq!(shelves.allocate(17, 1), None);
        assert_eq!(shelves.allocate(16, 16), Some((0, 0)));
        assert_eq!(shelves.allocate(1, 1), None);
        assert_eq!(shelves.allocation_count(), 1);
    }

    #[test]
    fn growth_keeps_positions() {
        let mut shelves = ShelfAllocator::new(16, 16).with_padding(1);
        let mut placed = Vec::new();
        for id in 0..4 {
            let (x, y) = shelves.allocate(7, 7).unwrap();
            let mut rect = Rectangle::new(id, 7, 7);
            rect.place(x, y);
            placed.push(rect);
        }
        assert_eq!(shelves.allocate(7, 7), None);

        shelves.grow(32, 32);
        shelves.grow(8, 8);
        assert_eq!((shelves.width(), shelves.height()), (32, 32));
        for id in 4..16 {
            let (x, y) = shelves.allocate(7, 7).unwrap();
            let mut rect = Rectangle::new(id, 7, 7);
            rect.place(x, y);
            placed.push(rect);
        }
        assert_eq!(placed[0].position(), Some((0, 0)));
        assert_eq!(placed[3].position(), Some((8, 8)));
        assert_eq!(find_overlap(&placed, 1), None);
    }

    #[test]
    fn clear_resets() {
        let mut shelves = ShelfAllocator::new(8, 8);
        shelves.allocate(8, 8).unwrap();
        shelves.clear();
        assert!(shelves.is_empty());
        assert_eq!(shelves.allocate(8, 8), Some((0, 0)));
    }
}
