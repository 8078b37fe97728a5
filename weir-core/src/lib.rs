// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc = include_str!("../README.md"))]

//! Validation-gated push primitives for batching pipelines.
//!
//! `weir-core` sits between a producer of discrete values and a caller-owned batch: every value
//! is checked against an admission policy and, when admitted, merged into the batch through a
//! [`Forward`] strategy. Inadmissible values are discarded silently but never invisibly, since
//! the gate counts each one.
//!
//! The crate stays deliberately small: how batches are drained, flushed or windowed is up to the
//! caller. See `weir-stream` for the same gating applied to asynchronous streams.
mod forward;
mod gate;
mod policy;
mod value;

pub use forward::{Append, Bounded, Forward, FromFn, Len, PushError, Tally, from_fn};
pub use gate::PushGate;
pub use policy::GatePolicy;
pub use value::Value;
