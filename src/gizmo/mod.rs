//! View-cube orientation gizmo.
//!
//! A labelled unit cube drawn with a camera that mirrors the main view's
//! rotation. Six square hit regions float just outside the faces; the one
//! under the pointer is highlighted, and clicking it snaps the main camera
//! to look straight at that face.

mod face;
/// Procedural face label textures.
pub mod labels;
/// Hit regions and ray picking.
pub mod picking;
mod view_cube;

pub use face::CubeFace;
pub use labels::{rasterize_label, LabelAtlas, LabelImage, LabelPainter};
pub use picking::{hit_planes, pick, HitPlane};
pub use view_cube::{ViewCube, CUBE_HALF_EXTENT};
