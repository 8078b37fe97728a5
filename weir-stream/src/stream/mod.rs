// SPDX-License-Identifier: MIT OR Apache-2.0

mod gate;

pub use gate::{Gate, GateExt};
