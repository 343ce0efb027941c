//! Shared utilities for the viewer.
//!
//! Helpers for frame timing and easing curves.

pub mod easing;
pub mod frame_timing;
