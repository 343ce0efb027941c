//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture on the main view, the view cube, or the home button, is a
//! `ViewerCommand`. Consumers construct commands and pass them to
//! [`ViewerEngine::execute`](super::ViewerEngine::execute).

use glam::Vec2;

use crate::gizmo::CubeFace;

/// A discrete or parameterized operation the engine can perform.
///
/// ```ignore
/// engine.execute(ViewerCommand::ResetView);
/// engine.execute(ViewerCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Orbit the camera by `delta` pixels of pointer movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of pointer movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Dolly the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Wheel steps.
        delta: f32,
    },

    /// Return the camera to its initial view.
    ResetView,

    // ── View cube ───────────────────────────────────────────────────
    /// Pointer moved over the view cube (`Some`, in the gizmo's normalized
    /// device coordinates) or left it (`None`).
    HoverViewCube {
        /// Pointer position, x right and y up in `[-1, 1]`.
        ndc: Option<Vec2>,
    },

    /// Click on the view cube: snap to the hovered face, if any.
    ClickViewCube,

    /// Snap the camera to look straight at `face`.
    SnapToFace {
        /// Face to view.
        face: CubeFace,
    },
}
