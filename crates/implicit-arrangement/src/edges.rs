//! Global iso-edges and their face incidences.

use std::collections::HashMap;

use tracing::debug;

use crate::extract::IsoFace;

/// An edge of the iso-mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoEdge {
    /// Endpoints, smaller id first.
    pub v1: usize,
    pub v2: usize,
    /// Every `(face, j)` where edge `j` of `face` is this edge.
    pub face_edge_indices: Vec<(usize, usize)>,
}

impl IsoEdge {
    /// Number of face occurrences.
    #[inline]
    pub fn degree(&self) -> usize {
        self.face_edge_indices.len()
    }

    /// Exactly two faces meet here.
    #[inline]
    pub fn is_manifold(&self) -> bool {
        self.degree() == 2
    }

    /// More than two faces meet here.
    #[inline]
    pub fn is_non_manifold(&self) -> bool {
        self.degree() > 2
    }

    /// Only one face uses this edge; the surface ends on the mesh boundary.
    #[inline]
    pub fn is_border(&self) -> bool {
        self.degree() == 1
    }

    pub fn faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.face_edge_indices.iter().map(|&(f, _)| f)
    }
}

/// Builds the edge list and fills in every face's `edge_indices`.
pub fn compute_iso_edges(iso_faces: &mut [IsoFace]) -> Vec<IsoEdge> {
    let mut edge_ids: HashMap<[usize; 2], usize> = HashMap::new();
    let mut edges: Vec<IsoEdge> = Vec::new();
    for (f, face) in iso_faces.iter_mut().enumerate() {
        let n = face.vert_indices.len();
        face.edge_indices.clear();
        face.edge_indices.reserve(n);
        for j in 0..n {
            let (a, b) = (face.vert_indices[j], face.vert_indices[(j + 1) % n]);
            let key = if a < b { [a, b] } else { [b, a] };
            let id = *edge_ids.entry(key).or_insert_with(|| {
                edges.push(IsoEdge {
                    v1: key[0],
                    v2: key[1],
                    face_edge_indices: Vec::new(),
                });
                edges.len() - 1
            });
            edges[id].face_edge_indices.push((f, j));
            face.edge_indices.push(id);
        }
    }
    debug!(
        edges = edges.len(),
        non_manifold = edges.iter().filter(|e| e.is_non_manifold()).count(),
        "computed iso-edges"
    );
    edges
}
