//! Merges per-tet arrangements into one global iso-surface mesh.
//!
//! Tets are processed in index order, so the global numbering of iso-vertices
//! and iso-faces is deterministic.

use std::collections::HashMap;

use nalgebra::{DMatrix, Point3};
use simplicial_arrangement::ComplexVertex;
use tracing::debug;

use crate::barycentric::{barycentric_in_tet, barycentric_on_edge, barycentric_on_face};
use crate::error::{ExtractionError, SingularDenominator};
use crate::tet_cut::TetCut;

/// A vertex of the global iso-surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoVert {
    /// The first tet that produced this vertex.
    pub tet_index: usize,
    /// The vertex id inside that tet's cell complex.
    pub tet_vert_index: usize,
    /// Sorted mesh vertex ids of the smallest simplex containing the vertex.
    pub simplex_vert_indices: Vec<usize>,
    /// Sorted global ids of the functions vanishing at the vertex.
    pub func_indices: [Option<usize>; 3],
}

impl IsoVert {
    /// Number of corners of the containing simplex: 1 at a mesh vertex, 4 inside a tet.
    #[inline]
    pub fn simplex_size(&self) -> usize {
        self.simplex_vert_indices.len()
    }

    pub fn functions(&self) -> impl Iterator<Item = usize> + '_ {
        self.func_indices.iter().flatten().copied()
    }
}

/// A polygon of the global iso-surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IsoFace {
    /// Global iso-vertex ids in cyclic order.
    pub vert_indices: Vec<usize>,
    /// Every `(tet, complex face)` this face was found in; two when it lies
    /// on a face shared by neighbouring tets.
    pub tet_face_indices: Vec<(usize, usize)>,
    /// Global edge ids; edge `j` joins vertex `j` and vertex `j + 1`.
    pub edge_indices: Vec<usize>,
    /// The function the face lies on; the smallest id if several vanish on it.
    pub func_index: usize,
}

/// The global iso-mesh with its mapping back to the per-tet complexes.
#[derive(Debug, Clone, Default)]
pub struct IsoMesh {
    pub iso_verts: Vec<IsoVert>,
    pub iso_faces: Vec<IsoFace>,
    /// Per tet, the global iso-vertex id of each complex vertex.
    pub global_vid_of_tet_vert: Vec<Vec<Option<usize>>>,
    /// Per tet, the global iso-face id of each complex face.
    pub iso_fid_of_tet_face: Vec<Vec<Option<usize>>>,
}

/// Identity of an arrangement vertex across tets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct VertexKey {
    pub simplex: Vec<usize>,
    pub functions: Vec<usize>,
}

pub(crate) fn vertex_key(cut: &TetCut, corners: &[usize; 4], vertex: &ComplexVertex) -> VertexKey {
    let mut simplex: Vec<usize> = (0..4)
        .filter(|i| !vertex.planes.contains(i))
        .map(|i| corners[i])
        .collect();
    simplex.sort_unstable();
    let mut functions: Vec<usize> = vertex
        .planes
        .iter()
        .filter_map(|&p| cut.function_of_plane(p))
        .collect();
    functions.sort_unstable();
    functions.dedup();
    VertexKey { simplex, functions }
}

/// Key of a polygon: its smallest, second smallest and largest vertex ids.
///
/// Invariant under rotation and reversal of the cycle.
pub fn compute_iso_face_key(face_verts: &[usize]) -> [usize; 3] {
    debug_assert!(face_verts.len() >= 3, "iso-face with {} vertices", face_verts.len());
    let mut smallest = usize::MAX;
    let mut second = usize::MAX;
    let mut largest = 0;
    for &v in face_verts {
        if v < smallest {
            second = smallest;
            smallest = v;
        } else if v < second {
            second = v;
        }
        largest = largest.max(v);
    }
    [smallest, second, largest]
}

/// Extracts the iso-mesh together with the per-tet id maps.
pub fn extract_iso_mesh(cuts: &[TetCut], tets: &[[usize; 4]]) -> Result<IsoMesh, ExtractionError> {
    debug_assert_eq!(cuts.len(), tets.len());
    let mut mesh = IsoMesh {
        global_vid_of_tet_vert: Vec::with_capacity(cuts.len()),
        iso_fid_of_tet_face: Vec::with_capacity(cuts.len()),
        ..IsoMesh::default()
    };
    let mut vert_ids: HashMap<VertexKey, usize> = HashMap::new();
    let mut face_ids: HashMap<[usize; 3], usize> = HashMap::new();

    for (t, (cut, corners)) in cuts.iter().zip(tets).enumerate() {
        let complex = &cut.complex;
        let mut vmap = vec![None; complex.vertices().len()];
        let mut fmap = vec![None; complex.faces().len()];

        if cut.has_isosurface() {
            for (f, face) in complex.faces().iter().enumerate() {
                let Some(func_index) = complex
                    .face_planes(f)
                    .into_iter()
                    .filter_map(|p| cut.function_of_plane(p))
                    .min()
                else {
                    continue;
                };
                let mut verts = Vec::with_capacity(face.vertices.len());
                for &v in &face.vertices {
                    if let Some(g) = vmap[v] {
                        verts.push(g);
                        continue;
                    }
                    let key = vertex_key(cut, corners, &complex.vertices()[v]);
                    if key.functions.len() > 3 {
                        return Err(ExtractionError::TooManyConcurrentFunctions {
                            tet: t,
                            count: key.functions.len(),
                        });
                    }
                    let g = match vert_ids.get(&key) {
                        Some(&g) => g,
                        None => {
                            let mut func_indices = [None; 3];
                            for (slot, &fid) in func_indices.iter_mut().zip(&key.functions) {
                                *slot = Some(fid);
                            }
                            mesh.iso_verts.push(IsoVert {
                                tet_index: t,
                                tet_vert_index: v,
                                simplex_vert_indices: key.simplex.clone(),
                                func_indices,
                            });
                            vert_ids.insert(key, mesh.iso_verts.len() - 1);
                            mesh.iso_verts.len() - 1
                        }
                    };
                    vmap[v] = Some(g);
                    verts.push(g);
                }

                let key = compute_iso_face_key(&verts);
                let next = mesh.iso_faces.len();
                let fid = *face_ids.entry(key).or_insert(next);
                if fid == next {
                    mesh.iso_faces.push(IsoFace {
                        vert_indices: verts,
                        func_index,
                        ..IsoFace::default()
                    });
                }
                mesh.iso_faces[fid].tet_face_indices.push((t, f));
                fmap[f] = Some(fid);
            }
        }

        mesh.global_vid_of_tet_vert.push(vmap);
        mesh.iso_fid_of_tet_face.push(fmap);
    }

    debug!(
        verts = mesh.iso_verts.len(),
        faces = mesh.iso_faces.len(),
        "extracted iso-mesh"
    );
    Ok(mesh)
}

/// Extracts the iso-mesh topology only.
pub fn extract_iso_mesh_pure(
    cuts: &[TetCut],
    tets: &[[usize; 4]],
) -> Result<(Vec<IsoVert>, Vec<IsoFace>), ExtractionError> {
    let mesh = extract_iso_mesh(cuts, tets)?;
    Ok((mesh.iso_verts, mesh.iso_faces))
}

/// Extracts the iso-mesh of a single function.
///
/// Every vertex carries function 0 and every face is a triangle or quad.
pub fn extract_iso_mesh_marching_tet(
    cuts: &[TetCut],
    tets: &[[usize; 4]],
) -> Result<(Vec<IsoVert>, Vec<IsoFace>), ExtractionError> {
    debug_assert!(cuts.iter().all(|c| c.functions.len() <= 1));
    extract_iso_mesh_pure(cuts, tets)
}

/// Positions of the iso-vertices, from a function table with one row per
/// mesh vertex.
pub fn compute_iso_vert_xyz(
    iso_verts: &[IsoVert],
    values: &DMatrix<f64>,
    pts: &[Point3<f64>],
    tolerance: f64,
) -> Result<Vec<Point3<f64>>, ExtractionError> {
    iso_verts
        .iter()
        .enumerate()
        .map(|(i, vert)| locate(i, vert, |v, f| values[(v, f)], pts, tolerance))
        .collect()
}

/// Positions of the iso-vertices of a single function.
pub fn compute_iso_vert_xyz_marching_tet(
    iso_verts: &[IsoVert],
    values: &[f64],
    pts: &[Point3<f64>],
    tolerance: f64,
) -> Result<Vec<Point3<f64>>, ExtractionError> {
    iso_verts
        .iter()
        .enumerate()
        .map(|(i, vert)| locate(i, vert, |v, _| values[v], pts, tolerance))
        .collect()
}

fn locate(
    index: usize,
    vert: &IsoVert,
    value: impl Fn(usize, usize) -> f64,
    pts: &[Point3<f64>],
    tolerance: f64,
) -> Result<Point3<f64>, ExtractionError> {
    let s = &vert.simplex_vert_indices;
    let funcs: Vec<usize> = vert.functions().collect();
    // A vertex on a k-corner simplex is fixed by k - 1 functions.
    let needed = s.len().saturating_sub(1);
    if funcs.len() < needed {
        return Err(ExtractionError::UnderdeterminedVertex {
            vertex: index,
            simplex_size: s.len(),
            functions: funcs.len(),
        });
    }
    let degenerate =
        |source: SingularDenominator| ExtractionError::DegenerateGeometry { vertex: index, source };
    let weighted = |weights: &[f64]| {
        Point3::from(
            s.iter()
                .zip(weights)
                .fold(nalgebra::Vector3::zeros(), |acc, (&v, &w)| acc + pts[v].coords * w),
        )
    };

    match s.len() {
        1 => Ok(pts[s[0]]),
        2 => {
            let b = barycentric_on_edge(value(s[0], funcs[0]), value(s[1], funcs[0]), tolerance)
                .map_err(degenerate)?;
            Ok(weighted(&b[..]))
        }
        3 => {
            let line = |f: usize| [value(s[0], f), value(s[1], f), value(s[2], f)];
            let b = barycentric_on_face(&line(funcs[0]), &line(funcs[1]), tolerance)
                .map_err(degenerate)?;
            Ok(weighted(&b[..]))
        }
        _ => {
            let plane = |f: usize| [value(s[0], f), value(s[1], f), value(s[2], f), value(s[3], f)];
            let (p0, p1, p2) = (plane(funcs[0]), plane(funcs[1]), plane(funcs[2]));
            let b = barycentric_in_tet(&p0, &p1, &p2, tolerance).map_err(degenerate)?;
            Ok(weighted(&b[..]))
        }
    }
}
