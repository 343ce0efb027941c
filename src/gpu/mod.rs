//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, bind group layout helpers,
//! depth and label textures, and shader composition.

/// Bind group layout entry and sampler helpers.
pub mod pipeline_helpers;
/// wgpu device, surfaces, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth targets and the view-cube label texture array.
pub mod texture;
