// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc = include_str!("../README.md"))]

//! Stream-based admission gating for weir batching pipelines.
//!
//! `weir-stream` lifts the admission policy of `weir-core` onto asynchronous streams: the
//! [`gate`](GateExt::gate) combinator passes admitted items through in order while dropping
//! inadmissible ones, keeping count of everything it turned away.
//!
//! Combinators follow the conventions of `futures-util`, so they stack with other stream
//! adapters as needed.
mod macros;
mod stream;

pub use stream::{Gate, GateExt};
