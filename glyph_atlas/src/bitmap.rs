// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interleaved pixel buffers and copies between them.

use bytemuck::Pod;

use crate::error::AtlasError;

/// A channel value stored in atlas pages.
pub trait Pixel: Pod + Send + Sync + 'static {}

impl Pixel for u8 {}
impl Pixel for f32 {}

/// An owned buffer of `width` × `height` pixels with `channels` interleaved values each.
///
/// Rows are stored contiguously. Row `0` is the bottom edge of the image, matching the y-up
/// convention of glyph outlines and atlas coordinates.
#[derive(Clone, PartialEq)]
pub struct Bitmap<T> {
    data: Vec<T>,
    width: u32,
    height: u32,
    channels: usize,
}

impl<T: Pixel> Bitmap<T> {
    /// Allocates a zeroed bitmap.
    ///
    /// Fails instead of aborting when the buffer cannot be reserved.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self, AtlasError> {
        let error = AtlasError::StorageAllocation {
            width,
            height,
            channels,
        };
        let len = buffer_len(width, height, channels).ok_or_else(|| error.clone())?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| error)?;
        data.resize(len, T::zeroed());
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Values per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All values, row by row.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The values of one pixel, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[T]> {
        self.view().pixel(x, y)
    }

    /// The raw bytes, for image encoders.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// A borrowed view of the whole bitmap.
    pub fn view(&self) -> BitmapRef<'_, T> {
        BitmapRef {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// A mutable view of the whole bitmap.
    pub fn view_mut(&mut self) -> BitmapMut<'_, T> {
        BitmapMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Changes the dimensions, keeping the overlapping content anchored at the origin.
    ///
    /// Pixels outside the old bounds are zeroed. On failure the bitmap is left unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), AtlasError> {
        let mut resized = Self::new(width, height, self.channels)?;
        let copy_w = self.width.min(width);
        let copy_h = self.height.min(height);
        let row_len = copy_w as usize * self.channels;
        for y in 0..copy_h {
            let src = self.view().row_offset(y);
            let dst = resized.view().row_offset(y);
            resized.data[dst..dst + row_len].copy_from_slice(&self.data[src..src + row_len]);
        }
        *self = resized;
        Ok(())
    }
}

impl<T> core::fmt::Debug for Bitmap<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}

/// A borrowed, read-only bitmap.
#[derive(Copy, Clone, Debug)]
pub struct BitmapRef<'a, T> {
    data: &'a [T],
    width: u32,
    height: u32,
    channels: usize,
}

impl<'a, T: Pixel> BitmapRef<'a, T> {
    /// Wraps `data` as a `width` × `height` bitmap, or returns `None` if the length does not
    /// match.
    pub fn from_slice(data: &'a [T], width: u32, height: u32, channels: usize) -> Option<Self> {
        (buffer_len(width, height, channels)? == data.len()).then_some(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Values per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All values, row by row.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// The values of row `y`.
    pub fn row(&self, y: u32) -> &'a [T] {
        let start = self.row_offset(y);
        &self.data[start..start + self.width as usize * self.channels]
    }

    /// The values of one pixel, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&'a [T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.row_offset(y) + x as usize * self.channels;
        self.data.get(start..start + self.channels)
    }

    fn row_offset(&self, y: u32) -> usize {
        y as usize * self.width as usize * self.channels
    }
}

/// A borrowed, writable bitmap.
#[derive(Debug)]
pub struct BitmapMut<'a, T> {
    data: &'a mut [T],
    width: u32,
    height: u32,
    channels: usize,
}

impl<'a, T: Pixel> BitmapMut<'a, T> {
    /// Wraps `data` as a `width` × `height` bitmap, or returns `None` if the length does not
    /// match.
    pub fn from_slice(data: &'a mut [T], width: u32, height: u32, channels: usize) -> Option<Self> {
        if buffer_len(width, height, channels)? != data.len() {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Values per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All values, row by row.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// The values of one pixel, or `None` outside the bitmap.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        self.data.get_mut(start..start + self.channels)
    }

    /// A read-only view of the same pixels.
    pub fn as_view(&self) -> BitmapRef<'_, T> {
        BitmapRef {
            data: &*self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Gives up the borrow, returning the underlying slice.
    pub(crate) fn into_slice(self) -> &'a mut [T] {
        self.data
    }
}

/// Copies `src` into `dst` with its bottom left corner at `(x, y)`.
pub fn blit<T: Pixel>(
    dst: &mut BitmapMut<'_, T>,
    src: BitmapRef<'_, T>,
    x: u32,
    y: u32,
) -> Result<(), AtlasError> {
    if dst.channels != src.channels {
        return Err(AtlasError::ChannelMismatch {
            expected: dst.channels,
            actual: src.channels,
        });
    }
    let fits = u64::from(x) + u64::from(src.width) <= u64::from(dst.width)
        && u64::from(y) + u64::from(src.height) <= u64::from(dst.height);
    if !fits {
        return Err(AtlasError::RegionOutOfBounds {
            region: crate::storage::PageRegion {
                page: 0,
                x,
                y,
                width: src.width,
                height: src.height,
            },
        });
    }
    let row_len = src.width as usize * src.channels;
    for row in 0..src.height {
        let start = ((y + row) as usize * dst.width as usize + x as usize) * dst.channels;
        dst.data[start..start + row_len].copy_from_slice(src.row(row));
    }
    Ok(())
}

fn buffer_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(channels)
}
