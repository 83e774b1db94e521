//! Per-tet arrangements of the implicit functions active in each tet.

use nalgebra::DMatrix;
use rayon::prelude::*;
use simplicial_arrangement::{Arrangement3D, CellComplex, Plane3D, Sign};
use tracing::debug;

use crate::error::ExtractionError;
use crate::mesh::TetMesh;

/// The arrangement of one tet.
///
/// Cutting plane `k` of the arrangement (plane id `4 + k`) is the
/// linearization of global function `functions[k]`.
#[derive(Debug, Clone)]
pub struct TetCut {
    pub functions: Vec<usize>,
    pub complex: CellComplex,
}

impl TetCut {
    /// Whether any function crosses or touches this tet.
    #[inline]
    pub fn has_isosurface(&self) -> bool {
        !self.functions.is_empty()
    }

    /// Global function behind an arrangement plane id, if it is a cutting plane.
    #[inline]
    pub fn function_of_plane(&self, plane: usize) -> Option<usize> {
        plane.checked_sub(4).and_then(|k| self.functions.get(k).copied())
    }

    /// Builds the arrangement from `(function, corner values)` pairs.
    ///
    /// Functions strictly positive or strictly negative on all four corners
    /// are left out.
    pub fn new(
        tet: usize,
        samples: impl IntoIterator<Item = (usize, [f64; 4])>,
    ) -> Result<Self, ExtractionError> {
        let mut functions = Vec::new();
        let mut planes = Vec::new();
        for (function, values) in samples {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ExtractionError::NonFiniteValue { tet, function });
            }
            let signs = values.map(Sign::of);
            if signs.iter().all(|s| s.is_zero()) {
                return Err(ExtractionError::DegenerateFunction { tet, function });
            }
            if signs.iter().all(|&s| s == Sign::Positive)
                || signs.iter().all(|&s| s == Sign::Negative)
            {
                continue;
            }
            functions.push(function);
            planes.push(Plane3D::new(values));
        }
        let arrangement = Arrangement3D::build(&planes)
            .map_err(|source| ExtractionError::UnsupportedPlane { tet, source })?;
        Ok(Self {
            functions,
            complex: CellComplex::from_arrangement(&arrangement),
        })
    }
}

/// Builds the arrangement of every tet from a function table with one row
/// per mesh vertex and one column per function.
pub fn compute_tet_cuts(
    mesh: &TetMesh,
    values: &DMatrix<f64>,
    parallel: bool,
) -> Result<Vec<TetCut>, ExtractionError> {
    if values.nrows() != mesh.num_vertices() {
        return Err(ExtractionError::ValueTableMismatch {
            rows: values.nrows(),
            num_vertices: mesh.num_vertices(),
        });
    }
    let cuts = map_tets(mesh, parallel, |t, corners| {
        TetCut::new(
            t,
            (0..values.ncols()).map(|j| (j, corners.map(|v| values[(v, j)]))),
        )
    })?;
    debug!(
        tets = cuts.len(),
        active = cuts.iter().filter(|c| c.has_isosurface()).count(),
        functions = values.ncols(),
        "computed tet arrangements"
    );
    Ok(cuts)
}

/// Builds the arrangement of every tet for a single function (marching tets).
pub fn compute_tet_cuts_marching_tet(
    mesh: &TetMesh,
    values: &[f64],
    parallel: bool,
) -> Result<Vec<TetCut>, ExtractionError> {
    if values.len() != mesh.num_vertices() {
        return Err(ExtractionError::ValueTableMismatch {
            rows: values.len(),
            num_vertices: mesh.num_vertices(),
        });
    }
    map_tets(mesh, parallel, |t, corners| {
        TetCut::new(t, std::iter::once((0, corners.map(|v| values[v]))))
    })
}

fn map_tets<F>(mesh: &TetMesh, parallel: bool, f: F) -> Result<Vec<TetCut>, ExtractionError>
where
    F: Fn(usize, &[usize; 4]) -> Result<TetCut, ExtractionError> + Sync + Send,
{
    mesh.validate()?;
    if parallel {
        mesh.tets.par_iter().enumerate().map(|(t, corners)| f(t, corners)).collect()
    } else {
        mesh.tets.iter().enumerate().map(|(t, corners)| f(t, corners)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_function_is_dropped() {
        let cut = TetCut::new(0, [(0, [1.0, 2.0, 3.0, 4.0]), (1, [1.0, 1.0, -1.0, -1.0])]).unwrap();
        assert_eq!(cut.functions, vec![1]);
        assert_eq!(cut.complex.cells().len(), 2);
        assert_eq!(cut.function_of_plane(4), Some(1));
        assert_eq!(cut.function_of_plane(2), None);
        assert_eq!(cut.function_of_plane(5), None);
    }

    #[test]
    fn touching_function_stays_active() {
        let cut = TetCut::new(0, [(3, [0.0, 1.0, 2.0, 3.0])]).unwrap();
        assert!(cut.has_isosurface());
        assert_eq!(cut.complex.cells().len(), 1);
    }

    #[test]
    fn zero_function_is_an_error() {
        let err = TetCut::new(5, [(2, [0.0; 4])]).unwrap_err();
        assert_eq!(err, ExtractionError::DegenerateFunction { tet: 5, function: 2 });
    }

    #[test]
    fn non_finite_value_is_an_error() {
        let samples = [(0, [1.0, -1.0, 1.0, 1.0]), (4, [1.0, f64::NAN, -1.0, 0.5])];
        let err = TetCut::new(1, samples).unwrap_err();
        assert_eq!(err, ExtractionError::NonFiniteValue { tet: 1, function: 4 });
    }

    #[test]
    fn corner_out_of_range_is_an_error() {
        let mut mesh = TetMesh::unit_tet();
        mesh.tets.push([0, 1, 2, 7]);
        let values = DMatrix::from_element(4, 1, 1.0);
        assert_eq!(
            compute_tet_cuts(&mesh, &values, true).unwrap_err(),
            ExtractionError::InvalidTet {
                tet: 1,
                vertex: 7,
                num_vertices: 4
            }
        );
        assert!(matches!(
            compute_tet_cuts_marching_tet(&mesh, &[1.0, -1.0, 1.0, 1.0], false),
            Err(ExtractionError::InvalidTet { tet: 1, .. })
        ));
    }

    #[test]
    fn table_must_match_the_mesh() {
        let mesh = TetMesh::unit_tet();
        let values = DMatrix::from_element(3, 1, 1.0);
        assert!(matches!(
            compute_tet_cuts(&mesh, &values, false),
            Err(ExtractionError::ValueTableMismatch { rows: 3, num_vertices: 4 })
        ));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let mesh =
            TetMesh::grid(2, nalgebra::Point3::origin(), nalgebra::Point3::new(1.0, 1.0, 1.0));
        let values: Vec<f64> = mesh.vertices.iter().map(|p| p.x + p.y - 0.9).collect();
        let a = compute_tet_cuts_marching_tet(&mesh, &values, true).unwrap();
        let b = compute_tet_cuts_marching_tet(&mesh, &values, false).unwrap();
        let cells =
            |cuts: &[TetCut]| cuts.iter().map(|c| c.complex.cells().len()).collect::<Vec<_>>();
        assert_eq!(cells(&a), cells(&b));
    }
}
