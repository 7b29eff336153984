// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod asserts;
mod generators;
mod samples;

pub(crate) use asserts::{assert_blank_outside, assert_glyph_pixels};
pub(crate) use generators::{PatternGenerator, pattern};
pub(crate) use samples::{BlockFont, load_ascii, settings};
