//! Planes in barycentric form and the plane list of one simplex.

use crate::predicate::{Scalar, Sign};

/// A hyperplane inside a reference simplex with `N` corners.
///
/// Coefficient `i` is the value of the affine function at corner `i`, so the
/// function at a point with barycentric coordinates `b` is `Σ coeffs[i] * b[i]`.
/// A triangle uses `N = 3`, a tetrahedron `N = 4`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane<T, const N: usize> {
    coeffs: [T; N],
}

/// A line inside the reference triangle.
pub type Plane2D<T> = Plane<T, 3>;

/// A plane inside the reference tetrahedron.
pub type Plane3D<T> = Plane<T, 4>;

impl<T: Scalar, const N: usize> Plane<T, N> {
    /// Creates a plane from its values at the simplex corners.
    pub fn new(coeffs: [T; N]) -> Self {
        Self { coeffs }
    }

    /// The plane `b_i = 0`, i.e. the simplex facet opposite corner `i`.
    ///
    /// Positive inside the simplex.
    pub fn boundary(i: usize) -> Self {
        debug_assert!(i < N);
        let mut coeffs = [T::zero(); N];
        coeffs[i] = T::one();
        Self { coeffs }
    }

    /// Returns the coefficients.
    #[inline]
    pub fn coeffs(&self) -> &[T; N] {
        &self.coeffs
    }

    /// Whether every coefficient is zero (the plane is undefined).
    pub fn is_degenerate(&self) -> bool {
        self.coeffs.iter().all(|c| *c == T::zero())
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Plane<T, N> {
    fn from(coeffs: [T; N]) -> Self {
        Self::new(coeffs)
    }
}

/// All planes of one simplex: the `N` boundary planes followed by the cutting
/// planes, addressed by a single id space.
#[derive(Debug, Clone)]
pub struct PlaneSet<T, const N: usize> {
    planes: Vec<Plane<T, N>>,
}

impl<T: Scalar, const N: usize> PlaneSet<T, N> {
    /// Builds the set for the given cutting planes.
    ///
    /// Coefficients are not range-checked here; the arrangement does that
    /// before building.
    pub fn new(cutting: &[Plane<T, N>]) -> Self {
        let mut planes = Vec::with_capacity(N + cutting.len());
        planes.extend((0..N).map(Plane::boundary));
        planes.extend_from_slice(cutting);
        Self { planes }
    }

    /// Number of planes, boundary planes included.
    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Always false: the boundary planes are always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Number of cutting planes.
    #[inline]
    pub fn num_cutting(&self) -> usize {
        self.planes.len() - N
    }

    /// Id of the `k`-th cutting plane.
    #[inline]
    pub fn cutting_id(k: usize) -> usize {
        N + k
    }

    /// Whether `id` refers to a simplex boundary plane.
    #[inline]
    pub fn is_boundary(id: usize) -> bool {
        id < N
    }

    #[inline]
    pub fn get(&self, id: usize) -> &Plane<T, N> {
        &self.planes[id]
    }

    pub(crate) fn push(&mut self, plane: Plane<T, N>) -> usize {
        self.planes.push(plane);
        self.planes.len() - 1
    }

    /// Sign of plane `plane` at the point where the `N - 1` planes of `vertex` meet.
    ///
    /// The vertex ids are sorted first, so a vertex is always evaluated the
    /// same way no matter which cell asks.
    pub fn sign_at(&self, vertex: &[usize], plane: usize) -> Sign {
        debug_assert_eq!(vertex.len() + 1, N);
        let mut ids = [0usize; N];
        ids[..N - 1].copy_from_slice(vertex);
        ids[..N - 1].sort_unstable();

        let ones = [T::one(); N];
        let mut rows: [&[T]; N] = [&ones[..]; N];
        for (row, &id) in rows.iter_mut().zip(&ids[..N - 1]) {
            *row = &self.planes[id].coeffs[..];
        }

        // The last row of ones expresses that barycentric coordinates sum to one.
        let denominator = T::det_sign(&rows);
        rows[N - 1] = &self.planes[plane].coeffs[..];
        let numerator = T::det_sign(&rows);
        numerator * denominator
    }

    /// Signs of every plane at one vertex.
    pub fn signs_at(&self, vertex: &[usize]) -> Vec<Sign> {
        (0..self.planes.len())
            .map(|id| {
                if vertex.contains(&id) {
                    Sign::Zero
                } else {
                    self.sign_at(vertex, id)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_planes_are_unit_vectors() {
        let p = Plane3D::<i64>::boundary(2);
        assert_eq!(p.coeffs(), &[0, 0, 1, 0]);
    }

    #[test]
    fn corner_sign_is_coefficient_sign() {
        let set = PlaneSet::new(&[Plane3D::new([3i64, -2, 0, 5])]);
        let cut = PlaneSet::<i64, 4>::cutting_id(0);
        // Corner 0 is where b1 = b2 = b3 = 0.
        assert_eq!(set.sign_at(&[1, 2, 3], cut), Sign::Positive);
        assert_eq!(set.sign_at(&[0, 2, 3], cut), Sign::Negative);
        assert_eq!(set.sign_at(&[3, 1, 0], cut), Sign::Zero);
        assert_eq!(set.sign_at(&[0, 1, 2], cut), Sign::Positive);
    }

    #[test]
    fn triangle_edge_crossing() {
        // Line through the midpoint of the edge between corners 0 and 1.
        let set = PlaneSet::new(&[Plane2D::new([1.0, -1.0, 0.5])]);
        let cut = PlaneSet::<f64, 3>::cutting_id(0);
        // Midpoint of edge 0-1 lies on b2 = 0 and on the cut, so it is a vertex {2, cut}.
        // Evaluate the boundary plane b0 there: positive (b0 = 1/2).
        assert_eq!(set.sign_at(&[2, cut], 0), Sign::Positive);
        // And corner 2 is strictly positive.
        assert_eq!(set.sign_at(&[0, 1], cut), Sign::Positive);
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let set = PlaneSet::new(&[
            Plane3D::new([1.0, -2.0, 3.0, -4.0]),
            Plane3D::new([-1.5, 2.5, 0.5, 1.0]),
            Plane3D::new([2.0, 1.0, -3.0, 0.25]),
        ]);
        let a = set.sign_at(&[4, 5, 0], 6);
        let b = set.sign_at(&[0, 5, 4], 6);
        assert_eq!(a, b);
    }

    #[test]
    fn signs_at_marks_defining_planes_zero() {
        let set = PlaneSet::new(&[Plane2D::new([1i64, 1, -1])]);
        let signs = set.signs_at(&[0, 1]);
        assert_eq!(signs[0], Sign::Zero);
        assert_eq!(signs[1], Sign::Zero);
        assert_eq!(signs[2], Sign::Positive);
        assert_eq!(signs[3], Sign::Negative);
    }
}
