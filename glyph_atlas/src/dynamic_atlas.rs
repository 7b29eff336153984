// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas storage that grows as glyphs are added.

use atlas_packer::ShelfAllocator;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bitmap::{Bitmap, BitmapMut, BitmapRef, Pixel};
use crate::error::AtlasError;
use crate::storage::{AtlasStorage, PageRegion};

/// How a [`DynamicAtlas`] makes room once its pages are full.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GrowthPolicy {
    /// Double the last page, keeping its origin fixed, until it reaches `max_size` on both
    /// sides. After that, start a new page.
    ///
    /// No page is ever larger than `max_size`, the first one included. A region that does not
    /// fit such a page with its padding is rejected with [`AtlasError::RegionTooLarge`].
    Enlarge {
        /// Largest side length of a page.
        max_size: u32,
    },
    /// Start a new page of the initial size, doubled as long as the region does not fit it.
    AddPage,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::Enlarge { max_size: 4096 }
    }
}

/// Lifecycle of a [`DynamicAtlas`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AtlasState {
    /// Nothing has been allocated.
    #[default]
    Empty,
    /// At least one region is allocated and the last allocation fit the existing pages.
    PartiallyFilled,
    /// The last allocation only fit after a page was enlarged or added.
    ///
    /// The next allocation that fits the existing pages returns to
    /// [`PartiallyFilled`](Self::PartiallyFilled).
    Growing,
}

#[derive(Clone, Debug)]
struct Page<T> {
    bitmap: Bitmap<T>,
    shelves: ShelfAllocator,
}

/// Multi-page storage whose capacity grows with incremental allocations.
///
/// Regions are allocated one at a time on shelves. When no page has room, the atlas grows
/// according to its [`GrowthPolicy`]: either the last page is enlarged to the right and
/// upward, which keeps every existing pixel at the same coordinates, or a new page is
/// appended. Pages are never removed or reordered, so a [`PageRegion`] stays valid, and its
/// pixels unchanged, for the lifetime of the atlas.
#[derive(Clone, Debug)]
pub struct DynamicAtlas<T> {
    pages: SmallVec<[Page<T>; 1]>,
    channels: usize,
    initial_size: u32,
    padding: u32,
    policy: GrowthPolicy,
    state: AtlasState,
    growth_count: usize,
}

impl<T: Pixel> DynamicAtlas<T> {
    /// Creates an empty atlas whose first page will be `initial_size` pixels square.
    ///
    /// No memory is allocated until the first region is.
    pub fn new(initial_size: u32, channels: usize) -> Self {
        Self {
            pages: SmallVec::new(),
            channels,
            initial_size: initial_size.max(1),
            padding: 0,
            policy: GrowthPolicy::default(),
            state: AtlasState::Empty,
            growth_count: 0,
        }
    }

    /// Sets the growth policy.
    #[must_use]
    pub fn with_growth_policy(mut self, policy: GrowthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the gutter reserved to the right of and above every region.
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AtlasState {
        self.state
    }

    /// The growth policy.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Number of allocations that had to enlarge or add a page.
    ///
    /// Creating the first page does not count.
    pub fn growth_count(&self) -> usize {
        self.growth_count
    }

    /// Dimensions of a page.
    pub fn page_size(&self, index: usize) -> Option<(u32, u32)> {
        self.pages
            .get(index)
            .map(|page| (page.bitmap.width(), page.bitmap.height()))
    }

    /// The bitmap of a page.
    pub fn page_bitmap(&self, index: usize) -> Option<&Bitmap<T>> {
        self.pages.get(index).map(|page| &page.bitmap)
    }

    /// Reserves a `width` × `height` region, growing the atlas if necessary.
    ///
    /// Existing regions are never moved. Fails if the region is larger than the page size
    /// limit of the growth policy, or if page memory cannot be allocated. A failed allocation
    /// leaves the atlas as it was.
    pub fn allocate(&mut self, width: u32, height: u32) -> Result<PageRegion, AtlasError> {
        for (index, page) in self.pages.iter_mut().enumerate() {
            if let Some((x, y)) = page.shelves.allocate(width, height) {
                self.state = AtlasState::PartiallyFilled;
                return Ok(region(index, x, y, width, height));
            }
        }

        if let Some(max_size) = self.max_page_side() {
            let padded_w = width.saturating_add(self.padding);
            let padded_h = height.saturating_add(self.padding);
            if padded_w > max_size || padded_h > max_size {
                return Err(AtlasError::RegionTooLarge {
                    width,
                    height,
                    max_size,
                });
            }
        }

        let first = self.pages.is_empty();
        let region = self.grow_for(width, height)?;
        if first {
            self.state = AtlasState::PartiallyFilled;
        } else {
            self.state = AtlasState::Growing;
            self.growth_count += 1;
        }
        Ok(region)
    }

    fn max_page_side(&self) -> Option<u32> {
        match self.policy {
            GrowthPolicy::Enlarge { max_size } => Some(max_size.max(1)),
            GrowthPolicy::AddPage => None,
        }
    }

    fn grow_for(&mut self, width: u32, height: u32) -> Result<PageRegion, AtlasError> {
        let last = self.pages.len().checked_sub(1);
        if let (GrowthPolicy::Enlarge { max_size }, Some(index)) = (self.policy, last) {
            let page = &mut self.pages[index];
            loop {
                let (w, h) = (page.bitmap.width(), page.bitmap.height());
                if w >= max_size && h >= max_size {
                    break;
                }
                let new_w = w.saturating_mul(2).min(max_size).max(w);
                let new_h = h.saturating_mul(2).min(max_size).max(h);
                log::info!("enlarging atlas page {index} from {w}x{h} to {new_w}x{new_h}");
                page.bitmap.resize(new_w, new_h)?;
                page.shelves.grow(new_w, new_h);
                if let Some((x, y)) = page.shelves.allocate(width, height) {
                    return Ok(region(index, x, y, width, height));
                }
            }
        }

        let index = self.pages.len();
        let size = self.page_side_for(width, height);
        log::info!("adding atlas page {index} of {size}x{size}");
        let mut page = Page {
            bitmap: Bitmap::new(size, size, self.channels)?,
            shelves: ShelfAllocator::new(size, size).with_padding(self.padding),
        };
        let (x, y) = page
            .shelves
            .allocate(width, height)
            .ok_or(AtlasError::StorageAllocation {
                width: size,
                height: size,
                channels: self.channels,
            })?;
        self.pages.push(page);
        Ok(region(index, x, y, width, height))
    }

    /// Side of a new page: the initial size, doubled until the padded region fits, and never
    /// beyond the page size limit.
    fn page_side_for(&self, width: u32, height: u32) -> u32 {
        let needed = width.max(height).saturating_add(self.padding);
        let limit = self.max_page_side().unwrap_or(u32::MAX);
        let mut side = self.initial_size.min(limit);
        while side < needed && side < limit {
            side = side.saturating_mul(2).min(limit);
        }
        side
    }
}

impl<T: Pixel> AtlasStorage<T> for DynamicAtlas<T> {
    fn channels(&self) -> usize {
        self.channels
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Option<BitmapRef<'_, T>> {
        self.pages.get(index).map(|page| page.bitmap.view())
    }

    fn pages_mut(&mut self) -> Vec<BitmapMut<'_, T>> {
        self.pages
            .iter_mut()
            .map(|page| page.bitmap.view_mut())
            .collect()
    }
}

fn region(page: usize, x: u32, y: u32, width: u32, height: u32) -> PageRegion {
    PageRegion {
        page,
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u32, height: u32, value: u8) -> Bitmap<u8> {
        let mut bitmap = Bitmap::new(width, height, 1).unwrap();
        bitmap.view_mut().data_mut().fill(value);
        bitmap
    }

    #[test]
    fn state_transitions() {
        let mut atlas = DynamicAtlas::<u8>::new(16, 1)
            .with_growth_policy(GrowthPolicy::Enlarge { max_size: 64 });
        assert_eq!(atlas.state(), AtlasState::Empty);
        assert_eq!(atlas.page_count(), 0);

        atlas.allocate(8, 8).unwrap();
        assert_eq!(atlas.state(), AtlasState::PartiallyFilled);
        assert_eq!(atlas.page_size(0), Some((16, 16)));
        atlas.allocate(8, 8).unwrap();
        assert_eq!(atlas.state(), AtlasState::PartiallyFilled);
        assert_eq!(atlas.growth_count(), 0);

        atlas.allocate(16, 16).unwrap();
        assert_eq!(atlas.state(), AtlasState::Growing);
        assert_eq!(atlas.page_size(0), Some((32, 32)));
        assert_eq!(atlas.growth_count(), 1);

        atlas.allocate(4, 4).unwrap();
        assert_eq!(atlas.state(), AtlasState::PartiallyFilled);
        assert_eq!(atlas.growth_count(), 1);
    }

    #[test]
    fn enlarge_limits_every_page() {
        let mut atlas = DynamicAtlas::<u8>::new(256, 1)
            .with_growth_policy(GrowthPolicy::Enlarge { max_size: 64 });
        atlas.allocate(8, 8).unwrap();
        assert_eq!(atlas.page_size(0), Some((64, 64)));

        assert_eq!(
            atlas.allocate(100, 100),
            Err(AtlasError::RegionTooLarge {
                width: 100,
                height: 100,
                max_size: 64
            })
        );
        assert_eq!(atlas.page_count(), 1);
        assert_eq!(atlas.state(), AtlasState::PartiallyFilled);
    }

    #[test]
    fn enlarging_preserves_content() {
        let mut atlas = DynamicAtlas::<u8>::new(8, 1)
            .with_growth_policy(GrowthPolicy::Enlarge { max_size: 64 });
        let mut placed = Vec::new();
        for value in 1..=20_u8 {
            let region = atlas.allocate(6, 6).unwrap();
            atlas.put(region, filled(6, 6, value).view()).unwrap();
            placed.push((region, value));

            for &(region, value) in &placed {
                let page = atlas.page(region.page).unwrap();
                for y in region.y..region.y + region.height {
                    for x in region.x..region.x + region.width {
                        assert_eq!(page.pixel(x, y), Some(&[value][..]), "{region:?}");
                    }
                }
            }
        }
        assert_eq!(atlas.page_count(), 1);
        assert_eq!(atlas.page_size(0), Some((32, 32)));
        assert_eq!(atlas.state(), AtlasState::PartiallyFilled);
    }

    #[test]
    fn enlarge_spills_to_new_page_at_limit() {
        let mut atlas = DynamicAtlas::<u8>::new(16, 1)
            .with_growth_policy(GrowthPolicy::Enlarge { max_size: 32 });
        let regions: Vec<PageRegion> = (0..5).map(|_| atlas.allocate(16, 16).unwrap()).collect();
        assert_eq!(atlas.page_count(), 2);
        assert_eq!(regions[4].page, 1);
        assert_eq!(atlas.page_size(0), Some((32, 32)));
        assert_eq!(atlas.page_size(1), Some((16, 16)));
    }

    #[test]
    fn add_page_policy() {
        let mut atlas = DynamicAtlas::<u8>::new(16, 1).with_growth_policy(GrowthPolicy::AddPage);
        let first = atlas.allocate(16, 16).unwrap();
        let second = atlas.allocate(10, 10).unwrap();
        assert_eq!((first.page, second.page), (0, 1));
        assert_eq!(atlas.page_size(1), Some((16, 16)));

        // Oversized regions get a page large enough to hold them.
        let big = atlas.allocate(40, 20).unwrap();
        assert_eq!(big.page, 2);
        assert_eq!(atlas.page_size(2), Some((64, 64)));
    }
}
