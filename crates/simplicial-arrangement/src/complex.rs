//! Explicit cell complex of a 3D arrangement.
//!
//! The BSP leaves describe every cell on its own. [`CellComplex`] glues them:
//! vertices are identified by the set of planes vanishing at them, faces by
//! their vertex set, and every face knows the cells on both of its sides.

use std::collections::HashMap;

use tracing::debug;

use crate::arrangement::Arrangement3D;
use crate::bsp::NodeId;
use crate::predicate::{Scalar, Sign};

/// A vertex of the complex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexVertex {
    /// Sorted ids of every plane through the vertex.
    pub planes: Vec<usize>,
    /// Sign of every plane at the vertex, indexed by plane id.
    pub signs: Vec<Sign>,
}

/// A polygonal face of the complex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexFace {
    /// Vertex ids in cyclic order.
    pub vertices: Vec<usize>,
    /// The plane containing the face.
    pub supporting_plane: usize,
    /// The cell on the positive side of `supporting_plane`.
    pub positive_cell: Option<usize>,
    /// The cell on the negative side of `supporting_plane`; `None` on the simplex boundary.
    pub negative_cell: Option<usize>,
}

impl ComplexFace {
    /// Whether `[a, b]` is one of the face's edges.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let n = self.vertices.len();
        (0..n).any(|i| {
            let (u, v) = (self.vertices[i], self.vertices[(i + 1) % n]);
            (u, v) == (a, b) || (u, v) == (b, a)
        })
    }

    /// Returns the cell on the other side from `cell`.
    pub fn opposite(&self, cell: usize) -> Option<usize> {
        if self.positive_cell == Some(cell) {
            self.negative_cell
        } else if self.negative_cell == Some(cell) {
            self.positive_cell
        } else {
            None
        }
    }
}

/// A 3-dimensional cell, one per BSP leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexCell {
    /// The leaf this cell comes from.
    pub leaf: NodeId,
    pub faces: Vec<usize>,
    /// Sign of every plane over the cell's interior, indexed by plane id.
    pub signs: Vec<Sign>,
}

/// The conforming polyhedral complex of an [`Arrangement3D`].
///
/// Cells are numbered in the order of
/// [`SimplicialArrangement::leaves`](crate::SimplicialArrangement::leaves).
#[derive(Debug, Clone, Default)]
pub struct CellComplex {
    vertices: Vec<ComplexVertex>,
    faces: Vec<ComplexFace>,
    cells: Vec<ComplexCell>,
    edge_faces: HashMap<[usize; 2], Vec<usize>>,
}

impl CellComplex {
    /// Builds the complex of a finished arrangement.
    pub fn from_arrangement<T: Scalar>(arrangement: &Arrangement3D<T>) -> Self {
        let planes = arrangement.planes();
        let mut complex = Self::default();
        let mut vertex_ids: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut face_ids: HashMap<Vec<usize>, usize> = HashMap::new();

        for leaf in arrangement.leaves() {
            let Some(polyhedron) = arrangement.cell(leaf) else {
                continue;
            };
            let cell_id = complex.cells.len();

            let mut cycles = Vec::with_capacity(polyhedron.faces().len());
            for face in polyhedron.faces() {
                let mut cycle: Vec<usize> = (0..face.len())
                    .map(|i| {
                        let signs = planes.signs_at(&face.vertex(i));
                        let zero_set: Vec<usize> = signs
                            .iter()
                            .enumerate()
                            .filter(|(_, s)| s.is_zero())
                            .map(|(p, _)| p)
                            .collect();
                        *vertex_ids.entry(zero_set.clone()).or_insert_with(|| {
                            complex.vertices.push(ComplexVertex {
                                planes: zero_set,
                                signs,
                            });
                            complex.vertices.len() - 1
                        })
                    })
                    .collect();
                cycle.dedup();
                while cycle.len() > 1 && cycle.first() == cycle.last() {
                    cycle.pop();
                }
                if cycle.len() >= 3 {
                    cycles.push((face.plane, cycle));
                }
            }

            let mut signs = vec![Sign::Zero; planes.len()];
            for (slot, p) in signs.iter_mut().zip(0..) {
                *slot = cycles
                    .iter()
                    .flat_map(|(_, cycle)| cycle.iter())
                    .map(|&v| complex.vertices[v].signs[p])
                    .find(|s| !s.is_zero())
                    .unwrap_or(Sign::Zero);
            }

            let mut faces = Vec::with_capacity(cycles.len());
            for (plane, cycle) in cycles {
                let mut key = cycle.clone();
                key.sort_unstable();
                let face_id = *face_ids.entry(key).or_insert_with(|| {
                    complex.faces.push(ComplexFace {
                        vertices: cycle,
                        supporting_plane: plane,
                        positive_cell: None,
                        negative_cell: None,
                    });
                    complex.faces.len() - 1
                });
                let face = &mut complex.faces[face_id];
                let slot = match signs[face.supporting_plane] {
                    Sign::Negative => &mut face.negative_cell,
                    _ => &mut face.positive_cell,
                };
                debug_assert!(slot.is_none(), "face {} has two cells on one side", face_id);
                *slot = Some(cell_id);
                faces.push(face_id);
            }

            complex.cells.push(ComplexCell { leaf, faces, signs });
        }

        for (face_id, face) in complex.faces.iter().enumerate() {
            let n = face.vertices.len();
            for i in 0..n {
                let key = edge_key(face.vertices[i], face.vertices[(i + 1) % n]);
                complex.edge_faces.entry(key).or_default().push(face_id);
            }
        }

        debug!(
            vertices = complex.vertices.len(),
            edges = complex.edge_faces.len(),
            faces = complex.faces.len(),
            cells = complex.cells.len(),
            "built cell complex"
        );
        complex
    }

    #[inline]
    pub fn vertices(&self) -> &[ComplexVertex] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[ComplexFace] {
        &self.faces
    }

    #[inline]
    pub fn cells(&self) -> &[ComplexCell] {
        &self.cells
    }

    /// Number of distinct edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edge_faces.len()
    }

    /// Planes vanishing on every vertex of a face, sorted.
    pub fn face_planes(&self, face: usize) -> Vec<usize> {
        let mut vertices = self.faces[face].vertices.iter().map(|&v| &self.vertices[v].planes);
        let Some(first) = vertices.next() else {
            return Vec::new();
        };
        let mut common = first.clone();
        for planes in vertices {
            common.retain(|p| planes.binary_search(p).is_ok());
        }
        common
    }

    /// Faces containing the edge between vertices `a` and `b`.
    pub fn faces_around_edge(&self, a: usize, b: usize) -> &[usize] {
        self.edge_faces
            .get(&edge_key(a, b))
            .map_or(&[], |faces| faces.as_slice())
    }

    /// The face of `cell` other than `face` that contains the edge `[a, b]`.
    pub fn other_face_of_cell_at_edge(
        &self,
        cell: usize,
        face: usize,
        a: usize,
        b: usize,
    ) -> Option<usize> {
        self.cells[cell]
            .faces
            .iter()
            .copied()
            .find(|&f| f != face && self.faces[f].has_edge(a, b))
    }
}

#[inline]
fn edge_key(a: usize, b: usize) -> [usize; 2] {
    if a < b { [a, b] } else { [b, a] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane3D;

    fn euler(complex: &CellComplex) -> isize {
        complex.vertices().len() as isize - complex.num_edges() as isize
            + complex.faces().len() as isize
            - complex.cells().len() as isize
    }

    #[test]
    fn tetrahedron_complex() {
        let complex = CellComplex::from_arrangement(&Arrangement3D::<i64>::new());
        assert_eq!(complex.vertices().len(), 4);
        assert_eq!(complex.num_edges(), 6);
        assert_eq!(complex.faces().len(), 4);
        assert_eq!(complex.cells().len(), 1);
        for face in complex.faces() {
            assert_eq!(face.positive_cell, Some(0));
            assert_eq!(face.negative_cell, None);
        }
        assert!(complex.cells()[0].signs[..4].iter().all(|s| *s == Sign::Positive));
    }

    #[test]
    fn one_plane_through_the_middle() {
        let arrangement = Arrangement3D::build(&[Plane3D::new([1i64, 1, -1, -1])]).unwrap();
        let complex = CellComplex::from_arrangement(&arrangement);

        assert_eq!(complex.vertices().len(), 8);
        assert_eq!(complex.num_edges(), 14);
        assert_eq!(complex.faces().len(), 9);
        assert_eq!(complex.cells().len(), 2);
        assert_eq!(euler(&complex), 1);

        let cut: Vec<&ComplexFace> =
            complex.faces().iter().filter(|f| f.supporting_plane == 4).collect();
        assert_eq!(cut.len(), 1);
        assert_eq!(cut[0].vertices.len(), 4);
        assert_eq!(cut[0].negative_cell, Some(0));
        assert_eq!(cut[0].positive_cell, Some(1));
        assert_eq!(complex.cells()[0].signs[4], Sign::Negative);
    }

    #[test]
    fn edge_on_the_cut_plane_has_three_faces() {
        let arrangement = Arrangement3D::build(&[Plane3D::new([1i64, 1, -1, -1])]).unwrap();
        let complex = CellComplex::from_arrangement(&arrangement);
        let cut = complex
            .faces()
            .iter()
            .position(|f| f.supporting_plane == 4)
            .unwrap();
        let (a, b) = (complex.faces()[cut].vertices[0], complex.faces()[cut].vertices[1]);

        let around = complex.faces_around_edge(a, b);
        assert_eq!(around.len(), 3);
        assert_eq!(complex.faces_around_edge(b, a), around);

        // Inside each cell the edge is shared by the cut face and one boundary piece.
        for cell in 0..2 {
            let other = complex.other_face_of_cell_at_edge(cell, cut, a, b).unwrap();
            assert_ne!(other, cut);
            assert!(complex.faces()[other].supporting_plane < 4);
        }
        assert_eq!(complex.face_planes(cut), vec![4]);
    }

    #[test]
    fn euler_characteristic_of_a_general_arrangement() {
        let arrangement = Arrangement3D::build(&[
            Plane3D::new([3i64, -1, 2, -2]),
            Plane3D::new([-1, 2, 2, -3]),
            Plane3D::new([1, 1, -2, 1]),
            Plane3D::new([2, -3, 1, 1]),
        ])
        .unwrap();
        let complex = CellComplex::from_arrangement(&arrangement);
        assert_eq!(complex.cells().len(), arrangement.leaf_count());
        assert_eq!(euler(&complex), 1);
        for face in complex.faces() {
            if face.supporting_plane >= 4 {
                assert!(face.positive_cell.is_some() && face.negative_cell.is_some());
            }
        }
    }

    #[test]
    fn concurrent_planes_share_one_vertex() {
        // Both planes vanish at the midpoint of the edge between corners 0 and 2.
        let arrangement = Arrangement3D::build(&[
            Plane3D::new([1i64, 1, -1, -1]),
            Plane3D::new([1, -1, -1, 1]),
        ])
        .unwrap();
        let complex = CellComplex::from_arrangement(&arrangement);
        let shared: Vec<&ComplexVertex> = complex
            .vertices()
            .iter()
            .filter(|v| v.planes.contains(&4) && v.planes.contains(&5))
            .collect();
        assert!(shared.iter().any(|v| v.planes == vec![1, 3, 4, 5]));
        assert_eq!(euler(&complex), 1);
    }
}
