//! Render passes: shadow map, lit scene meshes, and the view-cube gizmo.

pub mod lighting;
pub mod mesh_pass;
pub(crate) mod pipeline_util;
pub mod shadow;
pub mod view_cube;
