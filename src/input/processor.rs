//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (pointer tracking,
//! the active press, modifier keys, whether the pointer is over the view
//! cube) and the key-binding map. It is the only thing that sits between
//! raw window events and the engine's
//! [`execute`](crate::ViewerEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use super::mouse::{DragOrigin, PointerState};
use crate::engine::command::ViewerCommand;
use crate::gizmo::CubeFace;

/// Wheel steps per pixel of vertical middle-button drag.
const DOLLY_DRAG_SPEED: f32 = 0.1;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyH"`, `"Digit1"`, `"Escape"`, etc. The browser's
/// `KeyboardEvent.code` uses the same names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`ViewerCommand`] that can be
/// key-bound (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Return to the initial view.
    ResetView,
    /// Look at the +X face.
    SnapRight,
    /// Look at the -X face.
    SnapLeft,
    /// Look down from +Y.
    SnapTop,
    /// Look up from -Y.
    SnapBottom,
    /// Look at the +Z face.
    SnapFront,
    /// Look at the -Z face.
    SnapBack,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`ViewerCommand`].
    fn to_command(self) -> ViewerCommand {
        let snap = |face| ViewerCommand::SnapToFace { face };
        match self {
            Self::ResetView => ViewerCommand::ResetView,
            Self::SnapRight => snap(CubeFace::Right),
            Self::SnapLeft => snap(CubeFace::Left),
            Self::SnapTop => snap(CubeFace::Top),
            Self::SnapBottom => snap(CubeFace::Bottom),
            Self::SnapFront => snap(CubeFace::Front),
            Self::SnapBack => snap(CubeFace::Back),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyH".into(), KeyCommandTag::ResetView),
            ("Digit1".into(), KeyCommandTag::SnapRight),
            ("Digit2".into(), KeyCommandTag::SnapLeft),
            ("Digit3".into(), KeyCommandTag::SnapTop),
            ("Digit4".into(), KeyCommandTag::SnapBottom),
            ("Digit5".into(), KeyCommandTag::SnapFront),
            ("Digit6".into(), KeyCommandTag::SnapBack),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

/// Axis-aligned screen rectangle in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Whether `p` lies inside (edges inclusive on the top-left).
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.width
            && p.y < self.y + self.height
    }

    /// Normalized device coordinates of `p`: x right, y up, `[-1, 1]`
    /// across the rectangle.
    #[must_use]
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.x) / self.width.max(1.0) * 2.0 - 1.0,
            1.0 - (p.y - self.y) / self.height.max(1.0) * 2.0,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyH") {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Pointer tracking and the active press.
    pointer: PointerState,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// View-cube viewport inside the window, if it shares the window.
    gizmo_rect: Option<Rect>,
    /// Whether the last cursor position was over the view cube.
    over_gizmo: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> Option<Vec2> {
        self.pointer.position
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeyBindings) {
        self.key_bindings = key_bindings;
    }

    /// Set where the view cube sits in the window (`None` when it has its
    /// own surface).
    pub fn set_gizmo_rect(&mut self, rect: Option<Rect>) {
        self.gizmo_rect = rect;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<ViewerCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                (!self.over_gizmo).then_some(ViewerCommand::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
            InputEvent::CursorLeft => {
                // A release outside the surface may never arrive.
                self.pointer.position = None;
                self.pointer.drag = None;
                self.leave_gizmo()
            }
        }
    }

    fn gizmo_hit(&self, p: Vec2) -> Option<Rect> {
        self.gizmo_rect.filter(|rect| rect.contains(p))
    }

    fn leave_gizmo(&mut self) -> Option<ViewerCommand> {
        std::mem::take(&mut self.over_gizmo)
            .then_some(ViewerCommand::HoverViewCube { ndc: None })
    }

    /// Cursor moved: drag the camera, or update the view-cube hover.
    fn handle_cursor_moved(&mut self, p: Vec2) -> Option<ViewerCommand> {
        let delta = self.pointer.handle_position(p);

        if let Some(drag) = self.pointer.drag {
            if drag.origin == DragOrigin::Scene {
                let _ = self.leave_gizmo();
                return self.drag_command(drag.button, delta);
            }
        }

        match self.gizmo_hit(p) {
            Some(rect) => {
                self.over_gizmo = true;
                Some(ViewerCommand::HoverViewCube {
                    ndc: Some(rect.to_ndc(p)),
                })
            }
            None => self.leave_gizmo(),
        }
    }

    fn drag_command(
        &self,
        button: MouseButton,
        delta: Vec2,
    ) -> Option<ViewerCommand> {
        if delta == Vec2::ZERO {
            return None;
        }
        match button {
            MouseButton::Left if self.shift_pressed => {
                Some(ViewerCommand::PanCamera { delta })
            }
            MouseButton::Left => Some(ViewerCommand::RotateCamera { delta }),
            MouseButton::Right => Some(ViewerCommand::PanCamera { delta }),
            MouseButton::Middle => Some(ViewerCommand::Zoom {
                delta: -delta.y * DOLLY_DRAG_SPEED,
            }),
        }
    }

    /// Press: remember where it started. Release: a left press and release
    /// both on the view cube is a click on it.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<ViewerCommand> {
        let position = self.pointer.position;
        let on_gizmo = position.and_then(|p| self.gizmo_hit(p)).is_some();

        if pressed {
            let origin = if on_gizmo {
                DragOrigin::Gizmo
            } else {
                DragOrigin::Scene
            };
            self.pointer.press(button, origin);
            return None;
        }

        let drag = self.pointer.release(button)?;
        (button == MouseButton::Left
            && drag.origin == DragOrigin::Gizmo
            && on_gizmo)
            .then_some(ViewerCommand::ClickViewCube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gizmo_rect() -> Rect {
        Rect {
            x: 600.0,
            y: 16.0,
            width: 128.0,
            height: 128.0,
        }
    }

    fn processor() -> InputProcessor {
        let mut p = InputProcessor::new();
        p.set_gizmo_rect(Some(gizmo_rect()));
        p
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn button(button: MouseButton, pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button, pressed }
    }

    #[test]
    fn rect_ndc_corners() {
        let r = gizmo_rect();
        assert_eq!(r.to_ndc(Vec2::new(600.0, 16.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(r.to_ndc(Vec2::new(664.0, 80.0)), Vec2::ZERO);
        assert_eq!(r.to_ndc(Vec2::new(728.0, 144.0)), Vec2::new(1.0, -1.0));
        assert!(r.contains(Vec2::new(600.0, 16.0)));
        assert!(!r.contains(Vec2::new(728.0, 80.0)));
    }

    #[test]
    fn left_drag_rotates() {
        let mut p = processor();
        let _ = p.handle_event(moved(100.0, 100.0));
        assert_eq!(p.handle_event(button(MouseButton::Left, true)), None);
        assert_eq!(
            p.handle_event(moved(110.0, 95.0)),
            Some(ViewerCommand::RotateCamera {
                delta: Vec2::new(10.0, -5.0)
            })
        );
        assert_eq!(p.handle_event(button(MouseButton::Left, false)), None);
        assert_eq!(p.handle_event(moved(120.0, 95.0)), None);
    }

    #[test]
    fn shift_left_and_right_drag_pan() {
        let mut p = processor();
        let _ = p.handle_event(moved(100.0, 100.0));
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = p.handle_event(button(MouseButton::Left, true));
        assert!(matches!(
            p.handle_event(moved(105.0, 100.0)),
            Some(ViewerCommand::PanCamera { .. })
        ));
        let _ = p.handle_event(button(MouseButton::Left, false));
        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: false });

        let _ = p.handle_event(button(MouseButton::Right, true));
        assert!(matches!(
            p.handle_event(moved(110.0, 100.0)),
            Some(ViewerCommand::PanCamera { .. })
        ));
    }

    #[test]
    fn middle_drag_dollies() {
        let mut p = processor();
        let _ = p.handle_event(moved(100.0, 100.0));
        let _ = p.handle_event(button(MouseButton::Middle, true));
        match p.handle_event(moved(100.0, 90.0)) {
            Some(ViewerCommand::Zoom { delta }) => assert!(delta > 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scroll_zooms_outside_gizmo_only() {
        let mut p = processor();
        let _ = p.handle_event(moved(100.0, 100.0));
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.0 }),
            Some(ViewerCommand::Zoom { delta: 1.0 })
        );
        let _ = p.handle_event(moved(650.0, 50.0));
        assert_eq!(p.handle_event(InputEvent::Scroll { delta: 1.0 }), None);
    }

    #[test]
    fn hover_enter_and_leave_gizmo() {
        let mut p = processor();
        assert_eq!(p.handle_event(moved(100.0, 100.0)), None);
        assert_eq!(
            p.handle_event(moved(664.0, 80.0)),
            Some(ViewerCommand::HoverViewCube {
                ndc: Some(Vec2::ZERO)
            })
        );
        assert_eq!(
            p.handle_event(moved(100.0, 100.0)),
            Some(ViewerCommand::HoverViewCube { ndc: None })
        );
        assert_eq!(p.handle_event(moved(101.0, 100.0)), None);
    }

    #[test]
    fn cursor_left_clears_hover() {
        let mut p = processor();
        let _ = p.handle_event(moved(664.0, 80.0));
        assert_eq!(
            p.handle_event(InputEvent::CursorLeft),
            Some(ViewerCommand::HoverViewCube { ndc: None })
        );
        assert_eq!(p.handle_event(InputEvent::CursorLeft), None);
    }

    #[test]
    fn click_inside_gizmo() {
        let mut p = processor();
        let _ = p.handle_event(moved(664.0, 80.0));
        assert_eq!(p.handle_event(button(MouseButton::Left, true)), None);
        assert_eq!(
            p.handle_event(button(MouseButton::Left, false)),
            Some(ViewerCommand::ClickViewCube)
        );
    }

    #[test]
    fn drag_from_gizmo_does_not_orbit() {
        let mut p = processor();
        let _ = p.handle_event(moved(664.0, 80.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        assert_eq!(
            p.handle_event(moved(300.0, 300.0)),
            Some(ViewerCommand::HoverViewCube { ndc: None })
        );
        assert_eq!(p.handle_event(moved(310.0, 300.0)), None);
        assert_eq!(p.handle_event(button(MouseButton::Left, false)), None);
    }

    #[test]
    fn scene_drag_over_gizmo_keeps_orbiting() {
        let mut p = processor();
        let _ = p.handle_event(moved(500.0, 80.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        assert!(matches!(
            p.handle_event(moved(650.0, 80.0)),
            Some(ViewerCommand::RotateCamera { .. })
        ));
        assert_eq!(p.handle_event(button(MouseButton::Left, false)), None);
    }

    #[test]
    fn leaving_the_window_ends_a_drag() {
        let mut p = processor();
        let _ = p.handle_event(moved(100.0, 100.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        let _ = p.handle_event(InputEvent::CursorLeft);
        assert_eq!(p.handle_event(moved(200.0, 200.0)), None);
        assert_eq!(p.handle_event(moved(220.0, 200.0)), None);
        assert_eq!(p.handle_event(button(MouseButton::Left, false)), None);

        let _ = p.handle_event(button(MouseButton::Left, true));
        assert!(matches!(
            p.handle_event(moved(230.0, 200.0)),
            Some(ViewerCommand::RotateCamera { .. })
        ));
    }

    #[test]
    fn default_key_bindings() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("KeyH"), Some(ViewerCommand::ResetView));
        assert_eq!(
            p.handle_key_press("Digit1"),
            Some(ViewerCommand::SnapToFace {
                face: CubeFace::Right
            })
        );
        assert_eq!(
            p.handle_key_press("Digit6"),
            Some(ViewerCommand::SnapToFace {
                face: CubeFace::Back
            })
        );
        assert_eq!(p.handle_key_press("KeyQ"), None);
    }

    #[test]
    fn custom_binding_from_toml() {
        let bindings: KeyBindings =
            toml::from_str("[bindings]\nKeyR = 'reset_view'\n").unwrap();
        let p = InputProcessor::with_key_bindings(bindings);
        assert_eq!(p.handle_key_press("KeyR"), Some(ViewerCommand::ResetView));
        assert_eq!(p.handle_key_press("KeyH"), None);
    }
}
