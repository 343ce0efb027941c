// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (default thresholds; long pipeline setup is allowed in
// Cargo.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Orbit-camera 3D viewer with a clickable view-cube orientation gizmo,
//! built on wgpu.
//!
//! A sphere resting on a floor is lit by an ambient and a shadow-casting
//! directional light. A labeled cube in the corner (or on its own canvas in
//! the browser) mirrors the camera's orientation; clicking one of its faces
//! snaps the camera to look straight at that side, and the home control
//! restores the initial view.
//!
//! # Key entry points
//!
//! - [`ViewerEngine`] - GPU state, scene, camera and view cube
//! - [`ViewerCommand`] - every interactive operation the engine performs
//! - [`Options`] - TOML-backed configuration
//! - `Viewer` - native winit window (feature `viewer`)
//! - `web::start` - browser entry point (feature `web`, wasm32 only)
//!
//! # Frame
//!
//! Each frame renders the shadow map (only when the light or scene changed),
//! the lit scene into the main surface, and then the view cube either into a
//! corner viewport of the same surface or into its own surface.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gizmo;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::{command::ViewerCommand, ViewerEngine};
pub use error::ViewCubeError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
