// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel storage behind an atlas.

use crate::bitmap::{Bitmap, BitmapMut, BitmapRef, Pixel, blit};
use crate::error::AtlasError;

/// A rectangle on one atlas page.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageRegion {
    /// Index of the page.
    pub page: usize,
    /// Left edge in pixels.
    pub x: u32,
    /// Bottom edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PageRegion {
    /// Whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Owner of the pixel pages an atlas is written into.
///
/// Every page has the same channel count. Pages are addressed by index, and the index of a
/// page never changes once it exists.
pub trait AtlasStorage<T: Pixel> {
    /// Values per pixel.
    fn channels(&self) -> usize;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Read access to a page.
    fn page(&self, index: usize) -> Option<BitmapRef<'_, T>>;

    /// Write access to every page at once, in index order.
    fn pages_mut(&mut self) -> Vec<BitmapMut<'_, T>>;

    /// Copies `src` into `region`.
    fn put(&mut self, region: PageRegion, src: BitmapRef<'_, T>) -> Result<(), AtlasError> {
        if (src.width(), src.height()) != (region.width, region.height) {
            return Err(AtlasError::SizeMismatch {
                expected: (region.width, region.height),
                actual: (src.width(), src.height()),
            });
        }
        let mut pages = self.pages_mut();
        let page = pages
            .get_mut(region.page)
            .ok_or(AtlasError::RegionOutOfBounds { region })?;
        blit(page, src, region.x, region.y).map_err(|err| match err {
            AtlasError::RegionOutOfBounds { .. } => AtlasError::RegionOutOfBounds { region },
            other => other,
        })
    }
}

/// Storage made of a single page of fixed size.
#[derive(Clone, Debug)]
pub struct BitmapAtlasStorage<T> {
    bitmap: Bitmap<T>,
}

impl<T: Pixel> BitmapAtlasStorage<T> {
    /// Allocates a zeroed `width` × `height` page.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self, AtlasError> {
        Ok(Self {
            bitmap: Bitmap::new(width, height, channels)?,
        })
    }

    /// The page.
    pub fn bitmap(&self) -> &Bitmap<T> {
        &self.bitmap
    }

    /// Takes the page out of the storage.
    pub fn into_bitmap(self) -> Bitmap<T> {
        self.bitmap
    }
}

impl<T: Pixel> AtlasStorage<T> for BitmapAtlasStorage<T> {
    fn channels(&self) -> usize {
        self.bitmap.channels()
    }

    fn page_count(&self) -> usize {
        1
    }

    fn page(&self, index: usize) -> Option<BitmapRef<'_, T>> {
        (index == 0).then(|| self.bitmap.view())
    }

    fn pages_mut(&mut self) -> Vec<BitmapMut<'_, T>> {
        vec![self.bitmap.view_mut()]
    }
}
