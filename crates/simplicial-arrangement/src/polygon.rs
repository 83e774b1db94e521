//! Convex cells of a 2D arrangement.

use crate::cuttable::{CutResult, Cuttable, has_both_sides, split_cycle};
use crate::plane::PlaneSet;
use crate::predicate::{Scalar, Sign};

/// A convex polygon inside the reference triangle.
///
/// Stored as the cyclic list of the lines supporting its edges; vertex `i`
/// is where edge `i` meets edge `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    edges: Vec<usize>,
}

impl Polygon {
    /// Creates a polygon from its edge cycle.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 3 edges are provided.
    pub fn new(edges: Vec<usize>) -> Self {
        debug_assert!(edges.len() >= 3, "Polygon must have at least 3 edges");
        Self { edges }
    }

    /// Returns the edge lines in cyclic order.
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Returns the number of edges (and vertices).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the polygon has no edges (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns vertex `i`, the meeting point of edges `i` and `i + 1`.
    #[inline]
    pub fn vertex(&self, i: usize) -> [usize; 2] {
        [self.edges[i], self.edges[(i + 1) % self.edges.len()]]
    }

    fn vertex_signs<T: Scalar>(&self, plane: usize, planes: &PlaneSet<T, 3>) -> Vec<Sign> {
        (0..self.edges.len())
            .map(|i| planes.sign_at(&self.vertex(i), plane))
            .collect()
    }
}

impl<T: Scalar> Cuttable<T, 3> for Polygon {
    type Vertex = [usize; 2];

    fn simplex() -> Self {
        Self { edges: vec![0, 1, 2] }
    }

    fn vertices(&self) -> Vec<[usize; 2]> {
        (0..self.edges.len()).map(|i| self.vertex(i)).collect()
    }

    fn bounding_planes(&self) -> Vec<usize> {
        self.edges.clone()
    }

    fn cut(&self, plane: usize, planes: &PlaneSet<T, 3>) -> CutResult<Self> {
        let signs = self.vertex_signs(plane, planes);
        match has_both_sides(signs.iter().copied()) {
            (false, _) => CutResult::Positive,
            (true, false) => CutResult::Negative,
            (true, true) => {
                let (negative, positive) = split_cycle(&self.edges, &signs, plane);
                CutResult::Split {
                    negative: Polygon::new(negative),
                    positive: Polygon::new(positive),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane2D;

    fn triangle() -> Polygon {
        <Polygon as Cuttable<i64, 3>>::simplex()
    }

    #[test]
    fn simplex_is_the_triangle() {
        let t = triangle();
        assert_eq!(t.edges(), &[0, 1, 2]);
        // Vertex 0 lies on b0 = b1 = 0, i.e. corner 2.
        assert_eq!(t.vertex(0), [0, 1]);
        assert_eq!(t.vertex(2), [2, 0]);
    }

    #[test]
    fn line_separating_one_corner() {
        // Negative only at corner 1.
        let planes = PlaneSet::new(&[Plane2D::new([2i64, -2, 1])]);
        match triangle().cut(3, &planes) {
            CutResult::Split { negative, positive } => {
                assert_eq!(negative.edges(), &[0, 3, 2]);
                assert_eq!(positive.edges(), &[0, 1, 2, 3]);
            }
            other => panic!("expected a split, got {:?}", other),
        }
    }

    #[test]
    fn line_through_a_corner_splits_into_triangles() {
        // Zero at corner 0, opposite signs at corners 1 and 2.
        let planes = PlaneSet::new(&[Plane2D::new([0i64, 1, -1])]);
        match triangle().cut(3, &planes) {
            CutResult::Split { negative, positive } => {
                assert_eq!(negative.len(), 3);
                assert_eq!(positive.len(), 3);
            }
            other => panic!("expected a split, got {:?}", other),
        }
    }

    #[test]
    fn tangent_line_does_not_split() {
        // Touches corner 0 only.
        let planes = PlaneSet::new(&[Plane2D::new([0i64, 1, 1])]);
        assert_eq!(triangle().cut(3, &planes), CutResult::Positive);

        let planes = PlaneSet::new(&[Plane2D::new([0i64, -1, -3])]);
        assert_eq!(triangle().cut(3, &planes), CutResult::Negative);
    }

    #[test]
    fn line_along_a_side_does_not_split() {
        // Vanishes on the side opposite corner 2.
        let planes = PlaneSet::new(&[Plane2D::new([0.0, 0.0, -1.0])]);
        assert_eq!(
            <Polygon as Cuttable<f64, 3>>::simplex().cut(3, &planes),
            CutResult::Negative
        );
    }
}
