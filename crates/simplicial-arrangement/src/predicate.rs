//! Sign predicates over exact and floating numeric domains.
//!
//! Every geometric decision made by the arrangement builder reduces to the
//! sign of a small determinant. The [`Scalar`] trait is the capability that
//! evaluates it; the builder itself is generic over it and never looks at
//! coefficient values directly.

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use num_traits::{One, Zero};

/// Largest coefficient magnitude for which the exact `i64` predicate is
/// guaranteed not to overflow its `i128` expansion. Planes beyond it are
/// rejected when added to an arrangement.
pub const EXACT_COEFF_LIMIT: i64 = 1 << 30;

/// Largest supported determinant size (a plane in a tetrahedron has 4 coefficients).
pub const MAX_MATRIX_SIZE: usize = 4;

/// Three-valued outcome of a predicate.
///
/// `Zero` is a regular answer, not an error: it means the point lies exactly
/// on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    /// Strictly on the negative side.
    Negative,
    /// Exactly on the plane.
    Zero,
    /// Strictly on the positive side.
    Positive,
}

impl Sign {
    /// Classifies a value against zero.
    #[inline]
    pub fn of<V: PartialOrd + Zero>(value: V) -> Self {
        let zero = V::zero();
        if value > zero {
            Sign::Positive
        } else if value < zero {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Returns the opposite sign (`Zero` stays `Zero`).
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }

    /// Returns `-1`, `0` or `1`.
    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        match (self, rhs) {
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (a, b) if a == b => Sign::Positive,
            _ => Sign::Negative,
        }
    }
}

/// Numeric domain of plane coefficients.
///
/// Implementations decide how determinant signs are evaluated: `i64` does it
/// exactly, `f64` in plain floating point (which may disagree with the exact
/// answer near tangency).
pub trait Scalar: Copy + Debug + PartialEq + Zero + One + Send + Sync + 'static {
    /// Sign of the determinant of the square matrix whose rows are `rows`.
    ///
    /// Every row must have `rows.len()` entries, and `rows.len()` must be in
    /// `1..=MAX_MATRIX_SIZE`.
    fn det_sign(rows: &[&[Self]]) -> Sign;

    /// Whether `det_sign` is free of rounding.
    fn is_exact() -> bool;

    /// Whether the value lies inside the domain the predicate supports.
    fn is_representable(self) -> bool;
}

impl Scalar for i64 {
    fn det_sign(rows: &[&[i64]]) -> Sign {
        let n = rows.len();
        let mut wide = [[0i128; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate().take(n) {
                wide[i][j] = i128::from(v);
            }
        }
        let slices: [&[i128]; MAX_MATRIX_SIZE] = [&wide[0], &wide[1], &wide[2], &wide[3]];
        Sign::of(cofactor_expansion(&slices[..n], &[0, 1, 2, 3][..n]))
    }

    #[inline]
    fn is_exact() -> bool {
        true
    }

    #[inline]
    fn is_representable(self) -> bool {
        self.unsigned_abs() <= EXACT_COEFF_LIMIT.unsigned_abs()
    }
}

impl Scalar for f64 {
    fn det_sign(rows: &[&[f64]]) -> Sign {
        let n = rows.len();
        Sign::of(cofactor_expansion(rows, &[0, 1, 2, 3][..n]))
    }

    #[inline]
    fn is_exact() -> bool {
        false
    }

    #[inline]
    fn is_representable(self) -> bool {
        self.is_finite()
    }
}

/// Laplace expansion along the first row, restricted to the columns in `cols`.
///
/// Uses no division, so integer inputs stay exact and integer-valued floats
/// stay exact as long as the products fit in the mantissa.
fn cofactor_expansion<V>(rows: &[&[V]], cols: &[usize]) -> V
where
    V: Copy + Zero + Add<Output = V> + Sub<Output = V> + Mul<Output = V>,
{
    match cols.len() {
        0 => V::zero(),
        1 => rows[0][cols[0]],
        2 => rows[0][cols[0]] * rows[1][cols[1]] - rows[0][cols[1]] * rows[1][cols[0]],
        n => {
            let mut acc = V::zero();
            let mut minor_cols = [0usize; MAX_MATRIX_SIZE];
            for (k, &c) in cols.iter().enumerate() {
                let mut m = 0;
                for &other in cols {
                    if other != c {
                        minor_cols[m] = other;
                        m += 1;
                    }
                }
                debug_assert_eq!(m, n - 1);
                let term = rows[0][c] * cofactor_expansion(&rows[1..], &minor_cols[..m]);
                acc = if k % 2 == 0 { acc + term } else { acc - term };
            }
            acc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_values() {
        assert_eq!(Sign::of(3i64), Sign::Positive);
        assert_eq!(Sign::of(-0.5f64), Sign::Negative);
        assert_eq!(Sign::of(0.0f64), Sign::Zero);
    }

    #[test]
    fn sign_multiplication() {
        assert_eq!(Sign::Positive * Sign::Negative, Sign::Negative);
        assert_eq!(Sign::Negative * Sign::Negative, Sign::Positive);
        assert_eq!(Sign::Zero * Sign::Negative, Sign::Zero);
        assert_eq!(Sign::Negative.flipped(), Sign::Positive);
    }

    #[test]
    fn identity_determinants_are_positive() {
        let r0 = [1i64, 0, 0, 0];
        let r1 = [0i64, 1, 0, 0];
        let r2 = [0i64, 0, 1, 0];
        let r3 = [0i64, 0, 0, 1];
        assert_eq!(i64::det_sign(&[&r0[..], &r1[..], &r2[..], &r3[..]]), Sign::Positive);
        // Swapping two rows flips the sign.
        assert_eq!(i64::det_sign(&[&r1[..], &r0[..], &r2[..], &r3[..]]), Sign::Negative);
    }

    #[test]
    fn singular_matrix_is_zero_in_both_domains() {
        let a = [1i64, 2, 3];
        let b = [2i64, 4, 6];
        let c = [0i64, 1, 5];
        assert_eq!(i64::det_sign(&[&a[..], &b[..], &c[..]]), Sign::Zero);

        let af = [1.0, 2.0, 3.0];
        let bf = [2.0, 4.0, 6.0];
        let cf = [0.0, 1.0, 5.0];
        assert_eq!(f64::det_sign(&[&af[..], &bf[..], &cf[..]]), Sign::Zero);
    }

    #[test]
    fn exact_and_floating_agree_on_small_integers() {
        let rows_i = [[3i64, -1, 4, 1], [5, 9, -2, 6], [-5, 3, 5, 8], [9, 7, -9, 3]];
        let rows_f: Vec<Vec<f64>> = rows_i
            .iter()
            .map(|r| r.iter().map(|&v| v as f64).collect())
            .collect();
        let si: Vec<&[i64]> = rows_i.iter().map(|r| &r[..]).collect();
        let sf: Vec<&[f64]> = rows_f.iter().map(|r| &r[..]).collect();
        assert_eq!(i64::det_sign(&si), f64::det_sign(&sf));
    }

    #[test]
    fn exact_predicate_survives_large_coefficients() {
        let m = EXACT_COEFF_LIMIT;
        let r0 = [m, m, m, m - 1];
        let r1 = [m, m, m - 1, m];
        let r2 = [m, m - 1, m, m];
        let r3 = [m - 1, m, m, m];
        // Nearly-singular but exactly non-zero.
        assert_ne!(i64::det_sign(&[&r0[..], &r1[..], &r2[..], &r3[..]]), Sign::Zero);
    }

    #[test]
    fn representable_range() {
        assert!(EXACT_COEFF_LIMIT.is_representable());
        assert!((-EXACT_COEFF_LIMIT).is_representable());
        assert!(!(EXACT_COEFF_LIMIT + 1).is_representable());
        assert!(!i64::MIN.is_representable());
        assert!(!i64::MAX.is_representable());
        assert!(1e300f64.is_representable());
        assert!(!f64::INFINITY.is_representable());
        assert!(!f64::NAN.is_representable());
    }
}
