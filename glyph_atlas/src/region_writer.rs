// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unsynchronized writes into disjoint page regions.

#![allow(
    unsafe_code,
    reason = "Concurrent writes into disjoint regions of one buffer need raw pointers."
)]

use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};

use atlas_packer::{Rectangle, find_overlap};

use crate::bitmap::{BitmapMut, BitmapRef, Pixel};
use crate::error::AtlasError;
use crate::storage::PageRegion;

static NEXT_WRITER_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct PagePtr<T> {
    ptr: *mut T,
    width: u32,
    height: u32,
}

/// Shared write access to a set of pairwise disjoint page regions.
///
/// The writer borrows the pages mutably for its whole lifetime. On construction it checks
/// that every region lies within its page and that no two regions on the same page share a
/// pixel, then issues one [`RegionToken`] per region. Writing consumes the token, so each
/// region is written at most once and only by whoever holds its token. Together this lets
/// several threads write through a shared `&RegionWriter` without any locking.
#[derive(Debug)]
pub struct RegionWriter<'a, T> {
    pages: Vec<PagePtr<T>>,
    channels: usize,
    id: u64,
    _pages: PhantomData<&'a mut [T]>,
}

/// Permission to write one region through the [`RegionWriter`] that issued it.
///
/// Tokens cannot be cloned.
#[derive(Debug)]
pub struct RegionToken {
    writer: u64,
    region: PageRegion,
}

impl RegionToken {
    /// The region this token grants access to.
    pub fn region(&self) -> PageRegion {
        self.region
    }
}

// Safety: The writer only hands out access to disjoint regions, each through a unique token,
// so moving it or sharing it between threads is equivalent to sending a set of disjoint
// `&mut [T]` borrows.
unsafe impl<T: Send> Send for RegionWriter<'_, T> {}
// Safety: See above. `write` takes `&self`, but two calls never touch the same pixels.
unsafe impl<T: Send> Sync for RegionWriter<'_, T> {}

impl<'a, T: Pixel> RegionWriter<'a, T> {
    /// Creates a writer over `pages`, returning the tokens in the order of `regions`.
    ///
    /// All pages must share one channel count. Fails if a region lies outside its page or
    /// overlaps another region on the same page.
    pub fn new(
        pages: Vec<BitmapMut<'a, T>>,
        regions: &[PageRegion],
    ) -> Result<(Self, Vec<RegionToken>), AtlasError> {
        let channels = pages.first().map_or(0, BitmapMut::channels);
        for page in &pages {
            if page.channels() != channels {
                return Err(AtlasError::ChannelMismatch {
                    expected: channels,
                    actual: page.channels(),
                });
            }
        }

        let mut per_page: Vec<Vec<Rectangle>> = pages.iter().map(|_| Vec::new()).collect();
        for (index, region) in regions.iter().enumerate() {
            let page = pages
                .get(region.page)
                .ok_or(AtlasError::RegionOutOfBounds { region: *region })?;
            let inside = u64::from(region.x) + u64::from(region.width) <= u64::from(page.width())
                && u64::from(region.y) + u64::from(region.height) <= u64::from(page.height());
            if !inside {
                return Err(AtlasError::RegionOutOfBounds { region: *region });
            }
            let mut rect = Rectangle::new(index, region.width, region.height);
            rect.place(region.x, region.y);
            per_page[region.page].push(rect);
        }
        for rects in &per_page {
            if let Some((a, b)) = find_overlap(rects, 0) {
                let (first, second) = (rects[a].id, rects[b].id);
                return Err(AtlasError::OverlappingRegions {
                    first: first.min(second),
                    second: first.max(second),
                });
            }
        }

        let id = NEXT_WRITER_ID.fetch_add(1, Ordering::Relaxed);
        let pages = pages
            .into_iter()
            .map(|page| {
                let (width, height) = (page.width(), page.height());
                PagePtr {
                    ptr: page.into_slice().as_mut_ptr(),
                    width,
                    height,
                }
            })
            .collect();
        let tokens = regions
            .iter()
            .map(|&region| RegionToken { writer: id, region })
            .collect();
        Ok((
            Self {
                pages,
                channels,
                id,
                _pages: PhantomData,
            },
            tokens,
        ))
    }

    /// Copies `src` into the region of `token`.
    ///
    /// `src` must have exactly the size of the region and the channel count of the pages.
    pub fn write(&self, token: RegionToken, src: BitmapRef<'_, T>) -> Result<(), AtlasError> {
        if token.writer != self.id {
            return Err(AtlasError::ForeignToken);
        }
        let region = token.region;
        if src.channels() != self.channels {
            return Err(AtlasError::ChannelMismatch {
                expected: self.channels,
                actual: src.channels(),
            });
        }
        if (src.width(), src.height()) != (region.width, region.height) {
            return Err(AtlasError::SizeMismatch {
                expected: (region.width, region.height),
                actual: (src.width(), src.height()),
            });
        }
        let page = &self.pages[region.page];
        debug_assert!(
            region.x + region.width <= page.width && region.y + region.height <= page.height,
            "region was validated on construction"
        );

        let row_len = region.width as usize * self.channels;
        for row in 0..region.height {
            let offset = ((region.y + row) as usize * page.width as usize + region.x as usize)
                * self.channels;
            let src_row = src.row(row);
            // Safety: `offset + row_len` lies within the page because the region was checked
            // against the page bounds in `new`. No other token covers these pixels, and this
            // token was consumed, so nothing else reads or writes them while we copy. `src`
            // is a distinct borrow, so the ranges cannot overlap.
            unsafe {
                core::ptr::copy_nonoverlapping(src_row.as_ptr(), page.ptr.add(offset), row_len);
            }
        }
        Ok(())
    }
}
