use glam::Vec2;

use super::event::MouseButton;

/// Where a button press started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragOrigin {
    /// On the main view.
    Scene,
    /// On the view cube.
    Gizmo,
}

/// A button held down since a press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Drag {
    pub button: MouseButton,
    pub origin: DragOrigin,
}

/// Tracks the pointer position and the active press.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerState {
    pub position: Option<Vec2>,
    pub drag: Option<Drag>,
}

impl PointerState {
    /// Record a new position and return the delta from the previous one.
    pub fn handle_position(&mut self, position: Vec2) -> Vec2 {
        let delta = self.position.map_or(Vec2::ZERO, |last| position - last);
        self.position = Some(position);
        delta
    }

    /// Start a press unless another button is already held.
    pub fn press(&mut self, button: MouseButton, origin: DragOrigin) {
        if self.drag.is_none() {
            self.drag = Some(Drag { button, origin });
        }
    }

    /// End the press of `button`, returning it if it was the active one.
    pub fn release(&mut self, button: MouseButton) -> Option<Drag> {
        match self.drag {
            Some(drag) if drag.button == button => self.drag.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_has_no_delta() {
        let mut state = PointerState::default();
        assert_eq!(state.handle_position(Vec2::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(
            state.handle_position(Vec2::new(13.0, 6.0)),
            Vec2::new(3.0, -4.0)
        );
    }

    #[test]
    fn second_button_does_not_replace_press() {
        let mut state = PointerState::default();
        state.press(MouseButton::Left, DragOrigin::Gizmo);
        state.press(MouseButton::Right, DragOrigin::Scene);
        assert!(state.release(MouseButton::Right).is_none());
        let drag = state.release(MouseButton::Left).unwrap();
        assert_eq!(drag.origin, DragOrigin::Gizmo);
        assert!(state.drag.is_none());
    }
}
