mod fault_geometry;
mod nnc_geometry;

pub use fault_geometry::{FaultGeometryGenerator, FaultSide};
pub use nnc_geometry::NncGeometryGenerator;

use crate::math::{Aabb, Point3, TexCoord, Vector3};

/// A triangle mesh ready to be handed to a renderer.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Texture coordinates, one per vertex, once the mesh is result colored.
    pub tex_coords: Option<Vec<TexCoord>>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Recomputes per-vertex normals by accumulating area-weighted triangle
    /// normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| i as usize);
            let (Some(pa), Some(pb), Some(pc)) =
                (self.vertices.get(a), self.vertices.get(b), self.vertices.get(c))
            else {
                continue;
            };
            let n = (pb - pa).cross(&(pc - pa));
            for idx in [a, b, c] {
                normals[idx] += n;
            }
        }
        for n in &mut normals {
            *n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        self.normals = normals;
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

/// Line segments over a shared vertex array.
#[derive(Debug, Clone, Default)]
pub struct LineMesh {
    pub vertices: Vec<Point3>,
    pub segments: Vec<[u32; 2]>,
}

impl LineMesh {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normals_of_xy_triangle_point_up() {
        let mut mesh = TriangleMesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![[0, 1, 2]],
            ..TriangleMesh::default()
        };
        mesh.compute_normals();
        for n in &mesh.normals {
            assert_relative_eq!(*n, Vector3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn unused_vertex_gets_zero_normal() {
        let mut mesh = TriangleMesh {
            vertices: vec![Point3::origin(); 4],
            indices: Vec::new(),
            ..TriangleMesh::default()
        };
        mesh.compute_normals();
        assert_eq!(mesh.normals.len(), 4);
        assert_relative_eq!(mesh.normals[3], Vector3::zeros());
    }
}
