//! Tetrahedral meshes: construction, face adjacency and boundary extraction.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::error::ExtractionError;

/// A tetrahedral mesh: vertex positions plus four corner indices per tet.
#[derive(Debug, Clone, PartialEq)]
pub struct TetMesh {
    pub vertices: Vec<Point3<f64>>,
    pub tets: Vec<[usize; 4]>,
}

/// The neighbour across one face of a tet: `(tet, local face)`.
pub type FaceNeighbor = Option<(usize, usize)>;

impl TetMesh {
    /// Creates a mesh, checking that every corner index is in range.
    pub fn new(vertices: Vec<Point3<f64>>, tets: Vec<[usize; 4]>) -> Result<Self, ExtractionError> {
        let mesh = Self { vertices, tets };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Checks that every corner index is in range.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        for (tet, corners) in self.tets.iter().enumerate() {
            if let Some(&vertex) = corners.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(ExtractionError::InvalidTet {
                    tet,
                    vertex,
                    num_vertices: self.vertices.len(),
                });
            }
        }
        Ok(())
    }

    /// A single tet with corners at the origin and the three unit points.
    pub fn unit_tet() -> Self {
        Self {
            vertices: vec![
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            tets: vec![[0, 1, 2, 3]],
        }
    }

    /// A box split into `resolution³` cubes of six tets each.
    ///
    /// Every cube uses the same diagonal, so neighbouring cubes share whole
    /// tet faces.
    pub fn grid(resolution: usize, min: Point3<f64>, max: Point3<f64>) -> Self {
        let n = resolution.max(1);
        let step: Vector3<f64> = (max - min) / n as f64;
        let index = |i: usize, j: usize, k: usize| (i * (n + 1) + j) * (n + 1) + k;

        let mut vertices = Vec::with_capacity((n + 1).pow(3));
        for i in 0..=n {
            for j in 0..=n {
                for k in 0..=n {
                    let offset =
                        Vector3::new(i as f64 * step.x, j as f64 * step.y, k as f64 * step.z);
                    vertices.push(min + offset);
                }
            }
        }

        // Cube corners by bit: 1 = +x, 2 = +y, 4 = +z. Each tet walks from
        // corner 0 to corner 7 along the axes in one order.
        const PATHS: [[usize; 4]; 6] = [
            [0, 1, 3, 7],
            [0, 1, 5, 7],
            [0, 2, 3, 7],
            [0, 2, 6, 7],
            [0, 4, 5, 7],
            [0, 4, 6, 7],
        ];

        let mut tets = Vec::with_capacity(6 * n * n * n);
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let corner = |bits: usize| {
                        index(i + (bits & 1), j + ((bits >> 1) & 1), k + ((bits >> 2) & 1))
                    };
                    for path in PATHS {
                        tets.push(path.map(corner));
                    }
                }
            }
        }
        Self { vertices, tets }
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_tets(&self) -> usize {
        self.tets.len()
    }

    /// For every tet and every local face, the tet on the other side.
    ///
    /// Local face `i` is the face opposite corner `i`.
    pub fn face_adjacency(&self) -> Vec<[FaceNeighbor; 4]> {
        let mut first_seen: HashMap<[usize; 3], (usize, usize)> = HashMap::new();
        let mut adjacency = vec![[None; 4]; self.tets.len()];
        for (t, corners) in self.tets.iter().enumerate() {
            for face in 0..4 {
                let key = tet_face_key(corners, face);
                if let Some((other, other_face)) = first_seen.remove(&key) {
                    adjacency[t][face] = Some((other, other_face));
                    adjacency[other][other_face] = Some((t, face));
                } else {
                    first_seen.insert(key, (t, face));
                }
            }
        }
        adjacency
    }
}

/// Sorted mesh vertex ids of the face of `corners` opposite corner `face`.
pub fn tet_face_key(corners: &[usize; 4], face: usize) -> [usize; 3] {
    let mut key = [0; 3];
    let mut m = 0;
    for (i, &v) in corners.iter().enumerate() {
        if i != face {
            key[m] = v;
            m += 1;
        }
    }
    key.sort_unstable();
    key
}

/// Extracts the triangles that bound the mesh.
///
/// Returns the boundary vertices (renumbered compactly, in order of first
/// use) and the boundary triangles. Triangles are not consistently oriented.
pub fn extract_tet_boundary_mesh(mesh: &TetMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut count: HashMap<[usize; 3], usize> = HashMap::new();
    for corners in &mesh.tets {
        for face in 0..4 {
            *count.entry(tet_face_key(corners, face)).or_default() += 1;
        }
    }

    let mut new_index: HashMap<usize, usize> = HashMap::new();
    let mut boundary_verts = Vec::new();
    let mut boundary_faces = Vec::new();
    for corners in &mesh.tets {
        for face in 0..4 {
            let key = tet_face_key(corners, face);
            if count.get(&key) != Some(&1) {
                continue;
            }
            let triangle = key.map(|v| {
                *new_index.entry(v).or_insert_with(|| {
                    boundary_verts.push(mesh.vertices[v]);
                    boundary_verts.len() - 1
                })
            });
            boundary_faces.push(triangle);
        }
    }
    (boundary_verts, boundary_faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range_corners() {
        let err = TetMesh::new(vec![Point3::origin(); 3], vec![[0, 1, 2, 3]]).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::InvalidTet {
                tet: 0,
                vertex: 3,
                num_vertices: 3
            }
        );
    }

    #[test]
    fn face_key_ignores_corner_order() {
        assert_eq!(tet_face_key(&[7, 3, 9, 1], 0), [1, 3, 9]);
        assert_eq!(tet_face_key(&[9, 1, 7, 3], 2), [1, 3, 9]);
    }

    #[test]
    fn single_tet_boundary_is_four_triangles() {
        let mesh = TetMesh::unit_tet();
        let (verts, faces) = extract_tet_boundary_mesh(&mesh);
        assert_eq!(verts.len(), 4);
        assert_eq!(faces.len(), 4);
        assert!(mesh.face_adjacency()[0].iter().all(|n| n.is_none()));
    }

    #[test]
    fn grid_counts() {
        let mesh = TetMesh::grid(2, Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.num_vertices(), 27);
        assert_eq!(mesh.num_tets(), 48);

        // 6 sides of 4 squares, 2 triangles each.
        let (verts, faces) = extract_tet_boundary_mesh(&mesh);
        assert_eq!(faces.len(), 48);
        assert_eq!(verts.len(), 26);
    }

    #[test]
    fn grid_is_conforming() {
        let mesh = TetMesh::grid(2, Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let adjacency = mesh.face_adjacency();
        let interior = adjacency.iter().flatten().filter(|n| n.is_some()).count();
        let boundary = adjacency.iter().flatten().filter(|n| n.is_none()).count();
        assert_eq!(boundary, 48);
        assert_eq!(interior + boundary, 4 * mesh.num_tets());
        for (t, faces) in adjacency.iter().enumerate() {
            for (f, neighbor) in faces.iter().enumerate() {
                if let Some((u, g)) = *neighbor {
                    assert_eq!(adjacency[u][g], Some((t, f)));
                }
            }
        }
    }
}
