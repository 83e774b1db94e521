//! Cutting convex cells by a plane.

use std::fmt::Debug;

use crate::plane::PlaneSet;
use crate::predicate::{Scalar, Sign};

/// Outcome of cutting a cell by a plane.
#[derive(Debug, Clone, PartialEq)]
pub enum CutResult<C> {
    /// The cell lies on the negative side; the plane may touch its boundary.
    Negative,
    /// The cell lies on the positive side; the plane may touch its boundary.
    Positive,
    /// The plane passes through the interior of the cell.
    Split { negative: C, positive: C },
}

/// A convex cell of a simplicial arrangement that can be cut by a plane.
///
/// Cells are implicit: a vertex is never stored as coordinates, only as the
/// ids of the `N - 1` planes meeting there, and every decision is a sign
/// query against a [`PlaneSet`].
pub trait Cuttable<T: Scalar, const N: usize>: Clone + Debug + Send + Sync + Sized {
    /// Plane ids of one vertex.
    type Vertex: AsRef<[usize]> + Copy + Debug;

    /// The whole reference simplex.
    fn simplex() -> Self;

    /// All vertices of the cell. Vertices shared by several boundary pieces
    /// may be listed more than once.
    fn vertices(&self) -> Vec<Self::Vertex>;

    /// Ids of the planes supporting the cell's boundary.
    fn bounding_planes(&self) -> Vec<usize>;

    /// Cuts the cell by plane `plane`.
    ///
    /// # Return values
    ///
    /// - **Negative**/**Positive**: no vertex lies strictly on the other side.
    ///   Tangent contact (vertices exactly on the plane) never splits a cell.
    /// - **Split**: both parts have full dimension.
    fn cut(&self, plane: usize, planes: &PlaneSet<T, N>) -> CutResult<Self>;

    /// Sign of `plane` over the interior of the cell.
    ///
    /// Only meaningful for planes that do not cut the cell; returns `Zero`
    /// if every vertex lies on the plane.
    fn side_of(&self, plane: usize, planes: &PlaneSet<T, N>) -> Sign {
        self.vertices()
            .iter()
            .map(|v| {
                if v.as_ref().contains(&plane) {
                    Sign::Zero
                } else {
                    planes.sign_at(v.as_ref(), plane)
                }
            })
            .find(|s| !s.is_zero())
            .unwrap_or(Sign::Zero)
    }
}

/// Splits a convex cycle of edge planes by `plane`.
///
/// `signs[i]` is the sign of `plane` at the vertex between `edges[i]` and
/// `edges[i + 1]`, so edge `i` runs from vertex `i - 1` to vertex `i`.
/// Returns `(negative, positive)` cycles. Uses a variant of the
/// Sutherland-Hodgman algorithm: walks the edges, keeps each edge on the
/// side(s) it reaches, and inserts `plane` once where each side is exited.
///
/// The caller guarantees that the cycle has both strictly positive and
/// strictly negative vertices.
pub(crate) fn split_cycle(
    edges: &[usize],
    signs: &[Sign],
    plane: usize,
) -> (Vec<usize>, Vec<usize>) {
    let n = edges.len();
    debug_assert_eq!(signs.len(), n);

    let mut negative = Vec::with_capacity(n + 1);
    let mut positive = Vec::with_capacity(n + 1);

    for i in 0..n {
        let start = signs[(i + n - 1) % n];
        let end = signs[i];

        if start == Sign::Positive || end == Sign::Positive {
            positive.push(edges[i]);
        }
        if start != Sign::Negative && end == Sign::Negative {
            positive.push(plane);
        }

        if start == Sign::Negative || end == Sign::Negative {
            negative.push(edges[i]);
        }
        if start != Sign::Positive && end == Sign::Positive {
            negative.push(plane);
        }
    }

    (negative, positive)
}

/// Summary of vertex signs.
pub(crate) fn has_both_sides(signs: impl IntoIterator<Item = Sign>) -> (bool, bool) {
    signs.into_iter().fold((false, false), |(neg, pos), s| {
        (neg || s == Sign::Negative, pos || s == Sign::Positive)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use Sign::{Negative as N, Positive as P, Zero as Z};

    #[test]
    fn split_triangle_one_corner_negative() {
        // Vertex 0 negative, 1 and 2 positive.
        let (neg, pos) = split_cycle(&[10, 11, 12], &[N, P, P], 99);
        assert_eq!(pos, vec![10, 99, 11, 12]);
        assert_eq!(neg, vec![10, 11, 99]);
    }

    #[test]
    fn split_through_a_vertex() {
        // Square cut along its diagonal through vertices 0 and 2.
        let (neg, pos) = split_cycle(&[0, 1, 2, 3], &[Z, P, Z, N], 7);
        assert_eq!(pos, vec![1, 2, 7]);
        assert_eq!(neg, vec![0, 7, 3]);
    }

    #[test]
    fn both_sides_summary() {
        assert_eq!(has_both_sides([P, Z, P]), (false, true));
        assert_eq!(has_both_sides([N, Z, P]), (true, true));
        assert_eq!(has_both_sides([Z, Z]), (false, false));
    }
}
