//! Input and command execution for ViewerEngine

use glam::Vec2;

use super::command::ViewerCommand;
use super::ViewerEngine;
use crate::camera::orbit::OrbitControls;
use crate::gizmo::ViewCube;
use crate::input::{InputEvent, KeyBindings, Rect};

impl ViewerEngine {
    /// Process a platform-agnostic input event on the main surface.
    ///
    /// Events are routed by the input processor: drags orbit, pan, or
    /// dolly the camera; pointer movement over the corner gizmo updates its
    /// hover state; a click on the gizmo snaps the camera.
    ///
    /// Returns `true` if the event changed what is on screen.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.input
            .handle_event(event)
            .is_some_and(|command| self.execute(command))
    }

    /// Run the command bound to `key` (winit `KeyCode` debug form, or the
    /// DOM `KeyboardEvent.code`). Returns `true` if a bound command changed
    /// the view.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        self.input
            .handle_key_press(key)
            .is_some_and(|command| self.execute(command))
    }

    /// Pointer moved to `(x, y)` physical pixels on the gizmo's own surface.
    /// No-op in corner mode.
    pub fn handle_gizmo_pointer(&mut self, x: f32, y: f32) -> bool {
        let Some(rect) = self.gizmo_surface_rect() else {
            return false;
        };
        let ndc = rect.to_ndc(Vec2::new(x, y));
        self.execute(ViewerCommand::HoverViewCube { ndc: Some(ndc) })
    }

    /// Pointer left the gizmo's own surface.
    pub fn handle_gizmo_pointer_left(&mut self) -> bool {
        self.execute(ViewerCommand::HoverViewCube { ndc: None })
    }

    /// Click on the gizmo's own surface.
    pub fn handle_gizmo_click(&mut self) -> bool {
        self.gizmo_surface.is_some() && self.execute(ViewerCommand::ClickViewCube)
    }

    /// Execute a command. Returns `true` if the view changed.
    pub fn execute(&mut self, command: ViewerCommand) -> bool {
        apply_command(
            &mut self.camera_controller.controls,
            &mut self.view_cube,
            command,
        )
    }

    /// Current key bindings.
    pub fn key_bindings(&self) -> &KeyBindings {
        self.input.key_bindings()
    }

    fn gizmo_surface_rect(&self) -> Option<Rect> {
        self.gizmo_surface.as_ref().map(|surface| Rect {
            x: 0.0,
            y: 0.0,
            width: surface.config.width as f32,
            height: surface.config.height as f32,
        })
    }
}

/// Apply `command` to the orbit controls and the view cube. Returns `true`
/// if the view changed.
fn apply_command(
    controls: &mut OrbitControls,
    view_cube: &mut ViewCube,
    command: ViewerCommand,
) -> bool {
    match command {
        ViewerCommand::RotateCamera { delta } => {
            controls.rotate(delta);
            true
        }
        ViewerCommand::PanCamera { delta } => {
            controls.pan(delta);
            true
        }
        ViewerCommand::Zoom { delta } => {
            controls.dolly(delta);
            true
        }
        ViewerCommand::ResetView => {
            log::debug!("resetting view");
            controls.reset();
            true
        }
        ViewerCommand::HoverViewCube { ndc: Some(ndc) } => {
            view_cube.pointer_moved(ndc)
        }
        ViewerCommand::HoverViewCube { ndc: None } => view_cube.pointer_left(),
        ViewerCommand::ClickViewCube => match view_cube.click() {
            Some(face) => {
                apply_command(controls, view_cube, ViewerCommand::SnapToFace { face })
            }
            None => false,
        },
        ViewerCommand::SnapToFace { face } => {
            let position =
                ViewCube::snap_position(face, controls.position(), controls.target());
            log::debug!("snapping to {face} view at {position}");
            controls.move_to(position);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::core::Camera;
    use crate::gizmo::CubeFace;
    use crate::options::{ControlsOptions, ViewCubeOptions};

    fn controls(eye: Vec3, damping: bool) -> OrbitControls {
        let options = ControlsOptions {
            enable_damping: damping,
            ..ControlsOptions::default()
        };
        let mut c = OrbitControls::new(eye, Vec3::ZERO, 75.0, &options);
        c.set_viewport_height(600.0);
        c
    }

    fn synced_cube(controls: &OrbitControls) -> ViewCube {
        let mut cube = ViewCube::new(&ViewCubeOptions::default(), 1.0);
        cube.sync_to_camera(&Camera {
            eye: controls.position(),
            target: controls.target(),
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
        });
        cube
    }

    #[test]
    fn click_on_hovered_face_snaps_eye_onto_its_axis() {
        let mut c = controls(Vec3::new(1.0, 0.5, 5.0), false);
        let mut cube = synced_cube(&c);
        let distance = c.distance();

        assert!(apply_command(
            &mut c,
            &mut cube,
            ViewerCommand::HoverViewCube {
                ndc: Some(Vec2::ZERO)
            },
        ));
        assert_eq!(cube.hovered(), Some(CubeFace::Front));

        assert!(apply_command(&mut c, &mut cube, ViewerCommand::ClickViewCube));
        let _ = c.update(0.016);
        let expected = c.target() + CubeFace::Front.axis() * distance;
        assert!(c.position().distance(expected) < 1e-4, "{}", c.position());
    }

    #[test]
    fn click_without_hover_keeps_the_view() {
        let mut c = controls(Vec3::new(1.0, 0.5, 5.0), false);
        let mut cube = synced_cube(&c);
        let before = c.position();
        assert!(!apply_command(&mut c, &mut cube, ViewerCommand::ClickViewCube));
        let _ = c.update(0.016);
        assert!(c.position().distance(before) < 1e-5);
    }

    #[test]
    fn snap_discards_damped_rotation() {
        let mut c = controls(Vec3::new(0.0, 0.0, 5.0), true);
        let mut cube = synced_cube(&c);
        assert!(apply_command(
            &mut c,
            &mut cube,
            ViewerCommand::RotateCamera {
                delta: Vec2::new(300.0, 40.0)
            },
        ));
        let _ = c.update(0.016);
        let distance = c.distance();

        assert!(apply_command(
            &mut c,
            &mut cube,
            ViewerCommand::SnapToFace {
                face: CubeFace::Right
            },
        ));
        let expected = Vec3::X * distance;
        for _ in 0..10 {
            let _ = c.update(0.016);
            assert!(c.position().distance(expected) < 1e-4, "{}", c.position());
        }
    }

    #[test]
    fn hover_reports_only_changes() {
        let mut c = controls(Vec3::new(1.0, 0.5, 5.0), false);
        let mut cube = synced_cube(&c);
        let hover = ViewerCommand::HoverViewCube {
            ndc: Some(Vec2::ZERO),
        };
        assert!(apply_command(&mut c, &mut cube, hover));
        assert!(!apply_command(&mut c, &mut cube, hover));
        let leave = ViewerCommand::HoverViewCube { ndc: None };
        assert!(apply_command(&mut c, &mut cube, leave));
        assert!(!apply_command(&mut c, &mut cube, leave));
    }

    #[test]
    fn reset_returns_home_after_orbiting() {
        let home = Vec3::new(0.0, 2.0, 5.0);
        let mut c = controls(home, false);
        let mut cube = synced_cube(&c);
        let _ = apply_command(
            &mut c,
            &mut cube,
            ViewerCommand::RotateCamera {
                delta: Vec2::new(120.0, 30.0),
            },
        );
        let _ = c.update(0.016);
        assert!(c.position().distance(home) > 0.1);

        assert!(apply_command(&mut c, &mut cube, ViewerCommand::ResetView));
        let _ = c.update(0.016);
        assert!(c.position().distance(home) < 1e-4);
    }
}
