// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A sized box that receives a position when packed.
///
/// The size is fixed at construction. The position is `None` until a packer places the
/// rectangle, and is reset whenever the rectangle is handed to a packer again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Caller-defined identifier linking the rectangle back to its owner.
    pub id: usize,
    width: u32,
    height: u32,
    position: Option<(u32, u32)>,
}

impl Rectangle {
    /// Creates an unplaced rectangle.
    pub fn new(id: usize, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            position: None,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The assigned top-left corner, or `None` while unplaced.
    #[inline]
    pub fn position(&self) -> Option<(u32, u32)> {
        self.position
    }

    /// Horizontal position, `0` while unplaced.
    #[inline]
    pub fn x(&self) -> u32 {
        self.position.map_or(0, |(x, _)| x)
    }

    /// Vertical position, `0` while unplaced.
    #[inline]
    pub fn y(&self) -> u32 {
        self.position.map_or(0, |(_, y)| y)
    }

    /// Whether the rectangle has been assigned a position.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Assigns a position.
    #[inline]
    pub fn place(&mut self, x: u32, y: u32) {
        self.position = Some((x, y));
    }

    /// Removes the assigned position.
    #[inline]
    pub fn clear_position(&mut self) {
        self.position = None;
    }

    /// Size including the trailing padding gutter.
    #[inline]
    pub(crate) fn footprint(&self, padding: u32) -> (u64, u64) {
        (
            u64::from(self.width) + u64::from(padding),
            u64::from(self.height) + u64::from(padding),
        )
    }
}
