//! Scene description: meshes, materials, lights and the demo scene.
//!
//! Everything here is plain CPU data. The renderer uploads it once at
//! startup and again whenever the scene options change.

mod light;
mod material;
mod mesh;

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
pub use light::{AmbientLight, DirectionalLight, ShadowCamera};
pub use material::StandardMaterial;
pub use mesh::{Mesh, MeshVertex};

use crate::options::{LightingOptions, SceneOptions};

/// A mesh placed in the world with its material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name, used for GPU labels and logs.
    pub name: String,
    /// Object-space geometry.
    pub mesh: Mesh,
    /// Surface parameters.
    pub material: StandardMaterial,
    /// Object-to-world transform.
    pub transform: Mat4,
    /// Rendered into the shadow map.
    pub cast_shadow: bool,
    /// Samples the shadow map when shaded.
    pub receive_shadow: bool,
}

/// Objects plus the lights illuminating them.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Drawable objects in draw order.
    pub objects: Vec<SceneObject>,
    /// Ambient term.
    pub ambient: AmbientLight,
    /// The single shadow-casting light.
    pub directional: DirectionalLight,
}

impl Scene {
    /// Lights built from `lighting` with no objects.
    #[must_use]
    pub fn empty(lighting: &LightingOptions) -> Self {
        let shadow = lighting.shadows.then(|| {
            ShadowCamera::symmetric(
                lighting.shadow_extent,
                lighting.shadow_near,
                lighting.shadow_far,
                lighting.shadow_map_size,
                lighting.shadow_softness,
            )
        });
        Self {
            objects: Vec::new(),
            ambient: AmbientLight {
                color: Vec3::from_array(lighting.ambient_color),
                intensity: lighting.ambient_intensity,
            },
            directional: DirectionalLight {
                color: Vec3::from_array(lighting.directional_color),
                intensity: lighting.directional_intensity,
                position: Vec3::from_array(lighting.directional_position),
                target: Vec3::from_array(lighting.directional_target),
                shadow,
            },
        }
    }

    /// The demo scene: a sphere resting on a square floor.
    #[must_use]
    pub fn from_options(scene: &SceneOptions, lighting: &LightingOptions) -> Self {
        let mut result = Self::empty(lighting);

        let sphere_material = StandardMaterial {
            color: Vec3::from_array(scene.sphere_color),
            metalness: scene.metalness,
            roughness: scene.roughness,
            env_intensity: scene.env_intensity,
        };
        result.add(SceneObject {
            name: "Sphere".to_owned(),
            mesh: Mesh::sphere(
                scene.sphere_radius,
                scene.sphere_width_segments,
                scene.sphere_height_segments,
            ),
            material: sphere_material,
            transform: Mat4::from_translation(Vec3::new(
                0.0,
                scene.sphere_elevation,
                0.0,
            )),
            cast_shadow: true,
            receive_shadow: false,
        });

        result.add(SceneObject {
            name: "Floor".to_owned(),
            mesh: Mesh::plane(scene.floor_size, scene.floor_size),
            material: StandardMaterial {
                color: Vec3::from_array(scene.floor_color),
                ..sphere_material
            },
            transform: Mat4::from_rotation_x(-FRAC_PI_2),
            cast_shadow: false,
            receive_shadow: true,
        });

        log::debug!(
            "built scene with {} objects ({} triangles)",
            result.objects.len(),
            result
                .objects
                .iter()
                .map(|o| o.mesh.triangle_count())
                .sum::<usize>()
        );
        result
    }

    /// Append an object.
    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Look up an object by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Whether any object needs the shadow map.
    #[must_use]
    pub fn has_shadows(&self) -> bool {
        self.directional.shadow.is_some()
            && self.objects.iter().any(|o| o.cast_shadow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> Scene {
        Scene::from_options(&SceneOptions::default(), &LightingOptions::default())
    }

    #[test]
    fn demo_scene_contents() {
        let scene = demo();
        assert_eq!(scene.objects.len(), 2);

        let sphere = scene.object("Sphere").unwrap();
        assert!(sphere.cast_shadow && !sphere.receive_shadow);
        assert_eq!(sphere.material.metalness, 0.3);
        assert_eq!(sphere.material.roughness, 0.4);
        let center = sphere.transform.transform_point3(Vec3::ZERO);
        assert!(center.distance(Vec3::new(0.0, 0.5, 0.0)) < 1e-6);

        let floor = scene.object("Floor").unwrap();
        assert!(floor.receive_shadow && !floor.cast_shadow);
        let up = floor.transform.transform_vector3(Vec3::Z);
        assert!(up.distance(Vec3::Y) < 1e-6);
    }

    #[test]
    fn sphere_rests_on_floor() {
        let scene = demo();
        let sphere = scene.object("Sphere").unwrap();
        let lowest = sphere
            .mesh
            .vertices
            .iter()
            .map(|v| sphere.transform.transform_point3(Vec3::from_array(v.position)).y)
            .fold(f32::INFINITY, f32::min);
        assert!(lowest.abs() < 1e-5);
    }

    #[test]
    fn lights_follow_options() {
        let scene = demo();
        assert_eq!(scene.ambient.intensity, 0.7);
        assert_eq!(scene.directional.intensity, 0.2);
        assert_eq!(scene.directional.position, Vec3::splat(5.0));
        let shadow = scene.directional.shadow.unwrap();
        assert_eq!(shadow.map_size, 1024);
        assert_eq!((shadow.left, shadow.right), (-7.0, 7.0));
        assert!(scene.has_shadows());
    }

    #[test]
    fn shadows_can_be_disabled() {
        let lighting = LightingOptions {
            shadows: false,
            ..LightingOptions::default()
        };
        let scene = Scene::from_options(&SceneOptions::default(), &lighting);
        assert!(scene.directional.shadow.is_none());
        assert!(!scene.has_shadows());
    }
}
