use std::f32::consts::{PI, TAU};

use glam::{Mat3, Mat4, Vec2, Vec3};

/// Vertex shared by every mesh pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate, v pointing down the image.
    pub uv: [f32; 2],
    /// Texture array layer (cube face index; 0 for untextured meshes).
    pub layer: u32,
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2, layer: u32) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
            layer,
        }
    }

    /// Vertex buffer layout matching `@location(0..=3)` in the mesh shaders.
    #[must_use]
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Uint32,
                    offset: 32,
                    shader_location: 3,
                },
            ],
        }
    }
}

/// Indexed triangle mesh, counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

/// Face directions of [`Mesh::cube`] in layer order: normal, texture-right,
/// texture-up. Each label reads upright when seen from outside.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

impl Mesh {
    /// UV sphere centered at the origin with its poles on ±Y.
    #[must_use]
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row = width_segments + 1;

        let mut vertices =
            Vec::with_capacity((row * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let (sin_v, cos_v) = (v * PI).sin_cos();
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_u, cos_u) = (u * TAU).sin_cos();
                let normal = Vec3::new(-cos_u * sin_v, cos_v, sin_u * sin_v);
                vertices.push(MeshVertex::new(
                    normal * radius,
                    normal,
                    Vec2::new(u, v),
                    0,
                ));
            }
        }

        let mut indices = Vec::with_capacity(
            (6 * width_segments * (height_segments - 1)) as usize,
        );
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Pole rows collapse to a single triangle.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Single-quad plane in XY facing +Z, centered at the origin.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let corners = [
            (Vec3::new(-hw, hh, 0.0), Vec2::new(0.0, 0.0)),
            (Vec3::new(-hw, -hh, 0.0), Vec2::new(0.0, 1.0)),
            (Vec3::new(hw, -hh, 0.0), Vec2::new(1.0, 1.0)),
            (Vec3::new(hw, hh, 0.0), Vec2::new(1.0, 0.0)),
        ];
        Self {
            vertices: corners
                .iter()
                .map(|&(p, uv)| MeshVertex::new(p, Vec3::Z, uv, 0))
                .collect(),
            indices: vec![0, 1, 3, 1, 2, 3],
        }
    }

    /// Axis-aligned cube of edge `size`: 4 vertices per face, each face
    /// tagged with its layer (+X, -X, +Y, -Y, +Z, -Z).
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (layer, &(normal, u, v)) in CUBE_FACES.iter().enumerate() {
            let base = vertices.len() as u32;
            for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (normal + u * s + v * t) * h;
                let uv = Vec2::new((s + 1.0) * 0.5, (1.0 - t) * 0.5);
                vertices.push(MeshVertex::new(position, normal, uv, layer as u32));
            }
            indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }
        Self { vertices, indices }
    }

    /// Copy of the mesh with positions and normals transformed.
    #[must_use]
    pub fn transformed(&self, transform: Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| MeshVertex {
                    position: transform
                        .transform_point3(Vec3::from_array(v.position))
                        .to_array(),
                    normal: (normal_matrix * Vec3::from_array(v.normal))
                        .normalize_or_zero()
                        .to_array(),
                    ..*v
                })
                .collect(),
            indices: self.indices.clone(),
        }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_winding(mesh: &Mesh, center: Vec3) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let n = (b - a).cross(c - a);
            if n.length_squared() < 1e-12 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid - center) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn sphere_counts_and_radius() {
        let mesh = Mesh::sphere(0.5, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), 6 * 32 * 31);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 0.5).abs() < 1e-5);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert_outward_winding(&mesh, Vec3::ZERO);
    }

    #[test]
    fn sphere_poles_on_y() {
        let mesh = Mesh::sphere(1.0, 8, 4);
        let top = Vec3::from_array(mesh.vertices[0].position);
        let bottom =
            Vec3::from_array(mesh.vertices[mesh.vertices.len() - 1].position);
        assert!(top.distance(Vec3::Y) < 1e-5);
        assert!(bottom.distance(Vec3::NEG_Y) < 1e-5);
    }

    #[test]
    fn plane_faces_z() {
        let mesh = Mesh::plane(10.0, 10.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert_outward_winding(&mesh, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn rotated_plane_faces_up() {
        let floor = Mesh::plane(10.0, 10.0)
            .transformed(Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        for v in &floor.vertices {
            assert!(v.position[1].abs() < 1e-5);
            assert!(Vec3::from_array(v.normal).distance(Vec3::Y) < 1e-5);
        }
        assert_outward_winding(&floor, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn cube_faces_are_tagged_in_order() {
        let mesh = Mesh::cube(1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for (layer, face) in mesh.vertices.chunks(4).enumerate() {
            let normal = Vec3::from_array(face[0].normal);
            assert_eq!(normal, CUBE_FACES[layer].0);
            for v in face {
                assert_eq!(v.layer, layer as u32);
                assert!(
                    (Vec3::from_array(v.position).dot(normal) - 0.5).abs()
                        < 1e-6
                );
            }
        }
        assert_outward_winding(&mesh, Vec3::ZERO);
    }

    #[test]
    fn cube_labels_read_upright_on_sides() {
        let mesh = Mesh::cube(1.0);
        // Front face (+Z): texture top (v = 0) sits at +Y.
        let front = &mesh.vertices[16..20];
        for v in front {
            assert_eq!(v.uv[1] == 0.0, v.position[1] > 0.0);
            assert_eq!(v.uv[0] == 0.0, v.position[0] < 0.0);
        }
    }
}
