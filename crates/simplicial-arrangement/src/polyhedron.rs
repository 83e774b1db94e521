//! Convex cells of a 3D arrangement.

use crate::cuttable::{CutResult, Cuttable, has_both_sides, split_cycle};
use crate::plane::PlaneSet;
use crate::predicate::{Scalar, Sign};

/// A face of a [`Polyhedron`]: the supporting plane plus the cycle of planes
/// cutting out its edges.
///
/// Vertex `i` of the face is the meeting point of `plane`, `edges[i]` and
/// `edges[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub plane: usize,
    pub edges: Vec<usize>,
}

impl Face {
    pub fn new(plane: usize, edges: Vec<usize>) -> Self {
        debug_assert!(edges.len() >= 3, "Face must have at least 3 edges");
        Self { plane, edges }
    }

    /// Returns vertex `i` as a plane triple.
    #[inline]
    pub fn vertex(&self, i: usize) -> [usize; 3] {
        [self.plane, self.edges[i], self.edges[(i + 1) % self.edges.len()]]
    }

    /// Number of vertices (and edges).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn vertex_signs<T: Scalar>(&self, plane: usize, planes: &PlaneSet<T, 4>) -> Vec<Sign> {
        (0..self.edges.len())
            .map(|i| planes.sign_at(&self.vertex(i), plane))
            .collect()
    }

    /// Replaces every edge whose two endpoints lie on `plane` by `plane`.
    fn relabel(&mut self, signs: &[Sign], plane: usize) {
        let n = self.edges.len();
        for i in 0..n {
            if signs[(i + n - 1) % n].is_zero() && signs[i].is_zero() {
                self.edges[i] = plane;
            }
        }
    }
}

/// A convex polyhedron inside the reference tetrahedron, stored as its faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyhedron {
    faces: Vec<Face>,
}

impl Polyhedron {
    /// Creates a polyhedron from its faces.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 4 faces are provided.
    pub fn new(faces: Vec<Face>) -> Self {
        debug_assert!(faces.len() >= 4, "Polyhedron must have at least 4 faces");
        Self { faces }
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the face supported by `plane`, if any.
    pub fn face_on(&self, plane: usize) -> Option<&Face> {
        self.faces.iter().find(|f| f.plane == plane)
    }
}

impl<T: Scalar> Cuttable<T, 4> for Polyhedron {
    type Vertex = [usize; 3];

    fn simplex() -> Self {
        let faces = (0..4)
            .map(|i| Face::new(i, (0..4).filter(|&j| j != i).collect()))
            .collect();
        Self { faces }
    }

    fn vertices(&self) -> Vec<[usize; 3]> {
        self.faces
            .iter()
            .flat_map(|f| (0..f.len()).map(move |i| f.vertex(i)))
            .collect()
    }

    fn bounding_planes(&self) -> Vec<usize> {
        self.faces.iter().map(|f| f.plane).collect()
    }

    fn cut(&self, plane: usize, planes: &PlaneSet<T, 4>) -> CutResult<Self> {
        let face_signs: Vec<Vec<Sign>> = self
            .faces
            .iter()
            .map(|f| f.vertex_signs(plane, planes))
            .collect();

        match has_both_sides(face_signs.iter().flatten().copied()) {
            (false, _) => return CutResult::Positive,
            (true, false) => return CutResult::Negative,
            (true, true) => {}
        }

        let mut negative = Vec::with_capacity(self.faces.len() + 1);
        let mut positive = Vec::with_capacity(self.faces.len() + 1);

        for (face, signs) in self.faces.iter().zip(&face_signs) {
            match has_both_sides(signs.iter().copied()) {
                (true, true) => {
                    let (neg, pos) = split_cycle(&face.edges, signs, plane);
                    negative.push(Face::new(face.plane, neg));
                    positive.push(Face::new(face.plane, pos));
                }
                (false, true) => {
                    let mut face = face.clone();
                    face.relabel(signs, plane);
                    positive.push(face);
                }
                (true, false) => {
                    let mut face = face.clone();
                    face.relabel(signs, plane);
                    negative.push(face);
                }
                (false, false) => {
                    // A face lying on the plane would make the cell flat.
                    debug_assert!(false, "face {} lies on cutting plane {}", face.plane, plane);
                }
            }
        }

        let negative_cap = cap_face(&negative, plane, planes);
        negative.push(negative_cap);
        let positive_cap = cap_face(&positive, plane, planes);
        positive.push(positive_cap);

        CutResult::Split {
            negative: Polyhedron::new(negative),
            positive: Polyhedron::new(positive),
        }
    }
}

/// Builds the face that closes one side of a cut along `plane`.
///
/// Its edges are the supporting planes of the faces that already carry a
/// `plane` edge. Each such face knows its two neighbours around the new face:
/// the edges next to its `plane` edge. When such an edge is not itself a cut
/// face (several planes meet at that vertex), the neighbour is the cut face
/// whose plane also passes through the vertex.
fn cap_face<T: Scalar>(faces: &[Face], plane: usize, planes: &PlaneSet<T, 4>) -> Face {
    let cut_planes: Vec<usize> = faces
        .iter()
        .filter(|f| f.edges.contains(&plane))
        .map(|f| f.plane)
        .collect();

    let mut neighbours: Vec<(usize, [usize; 2])> = Vec::with_capacity(cut_planes.len());
    for face in faces.iter().filter(|f| f.edges.contains(&plane)) {
        let n = face.edges.len();
        let Some(j) = face.edges.iter().position(|&e| e == plane) else {
            continue;
        };
        let ends = [face.edges[(j + n - 1) % n], face.edges[(j + 1) % n]];
        let mut pair = ends;
        for (slot, &end) in pair.iter_mut().zip(&ends) {
            if end != face.plane && cut_planes.contains(&end) {
                continue;
            }
            let vertex = [face.plane, end, plane];
            let mut candidates = cut_planes
                .iter()
                .copied()
                .filter(|&h| h != face.plane && h != end)
                .filter(|&h| planes.sign_at(&vertex, h).is_zero());
            if let Some(h) = candidates.next() {
                debug_assert!(
                    candidates.next().is_none(),
                    "ambiguous neighbour of face {}",
                    face.plane
                );
                *slot = h;
            }
        }
        neighbours.push((face.plane, pair));
    }

    let lookup = |p: usize| neighbours.iter().find(|(q, _)| *q == p).map(|(_, pair)| *pair);

    let mut order = Vec::with_capacity(cut_planes.len());
    if let Some(&start) = cut_planes.first() {
        order.push(start);
        let mut previous = None;
        let mut current = start;
        while order.len() < cut_planes.len() {
            let Some([a, b]) = lookup(current) else {
                break;
            };
            let next = if Some(a) != previous { a } else { b };
            if next == start {
                break;
            }
            order.push(next);
            previous = Some(current);
            current = next;
        }
    }
    debug_assert_eq!(order.len(), cut_planes.len(), "open cap on plane {}", plane);

    Face::new(plane, order)
}
