//! Camera system for the main view.
//!
//! Provides a perspective camera, orbit controls with damping and eased
//! snaps, ray casting from screen coordinates, and the GPU uniform.

/// Main-view camera controller owning orbit controls and GPU resources.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Orbit controls: rotate, pan, dolly, damping, reset.
pub mod orbit;
/// Rays and ray/quad, ray/box intersection.
pub mod ray;
