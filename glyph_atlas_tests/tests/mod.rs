// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `glyph_atlas`.
//!
//! - The `util` module contains a synthetic font and a deterministic bitmap generator that
//!   are shared by the different test modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests. This makes it easier to share the utilities.
//! - Tests are grouped by topic, and the topic is the first word of the test name, e.g.
//!   `growth_inserts_never_move` lives in `growth.rs`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod failures;
mod growth;
mod packing;
mod util;
