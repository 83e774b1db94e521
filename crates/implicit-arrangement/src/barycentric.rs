//! Closed-form point math: barycentric coordinates of plane intersections,
//! sample implicit functions, and a scalar sign helper.

use nalgebra::Point3;
use simplicial_arrangement::Sign;

use crate::error::SingularDenominator;

/// Barycentric coordinates, inside a tet, of the point where three planes meet.
///
/// Each plane is given by its values at the four tet corners.
pub fn barycentric_in_tet(
    p1: &[f64; 4],
    p2: &[f64; 4],
    p3: &[f64; 4],
    tolerance: f64,
) -> Result<[f64; 4], SingularDenominator> {
    let n1 = p1[3] * (p2[2] * p3[1] - p2[1] * p3[2])
        + p1[2] * (p2[1] * p3[3] - p2[3] * p3[1])
        + p1[1] * (p2[3] * p3[2] - p2[2] * p3[3]);
    let n2 = p1[3] * (p2[0] * p3[2] - p2[2] * p3[0])
        + p1[2] * (p2[3] * p3[0] - p2[0] * p3[3])
        + p1[0] * (p2[2] * p3[3] - p2[3] * p3[2]);
    let n3 = p1[3] * (p2[1] * p3[0] - p2[0] * p3[1])
        + p1[1] * (p2[0] * p3[3] - p2[3] * p3[0])
        + p1[0] * (p2[3] * p3[1] - p2[1] * p3[3]);
    let n4 = p1[2] * (p2[0] * p3[1] - p2[1] * p3[0])
        + p1[1] * (p2[2] * p3[0] - p2[0] * p3[2])
        + p1[0] * (p2[1] * p3[2] - p2[2] * p3[1]);
    let d = checked(n1 + n2 + n3 + n4, tolerance)?;
    Ok([n1 / d, n2 / d, n3 / d, n4 / d])
}

/// Barycentric coordinates, on a triangle, of the point where two lines meet.
pub fn barycentric_on_face(
    p1: &[f64; 3],
    p2: &[f64; 3],
    tolerance: f64,
) -> Result<[f64; 3], SingularDenominator> {
    let n1 = p1[2] * p2[1] - p1[1] * p2[2];
    let n2 = p1[0] * p2[2] - p1[2] * p2[0];
    let n3 = p1[1] * p2[0] - p1[0] * p2[1];
    let d = checked(n1 + n2 + n3, tolerance)?;
    Ok([n1 / d, n2 / d, n3 / d])
}

/// Barycentric coordinates, on an edge, of the zero of a linear function
/// with end values `f1` and `f2`.
pub fn barycentric_on_edge(
    f1: f64,
    f2: f64,
    tolerance: f64,
) -> Result<[f64; 2], SingularDenominator> {
    let d = checked(f2 - f1, tolerance)?;
    let b0 = f2 / d;
    Ok([b0, 1.0 - b0])
}

fn checked(denominator: f64, tolerance: f64) -> Result<f64, SingularDenominator> {
    if denominator.is_finite() && denominator.abs() > tolerance {
        Ok(denominator)
    } else {
        Err(SingularDenominator(denominator))
    }
}

/// Signed squared distance to a sphere: negative inside.
#[inline]
pub fn sphere_function(center: &Point3<f64>, radius: f64, p: &Point3<f64>) -> f64 {
    (p - center).norm_squared() - radius * radius
}

/// Sign of a sampled function value.
#[inline]
pub fn sign(x: f64) -> Sign {
    Sign::of(x)
}
