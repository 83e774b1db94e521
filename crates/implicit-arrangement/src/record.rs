//! Serializable snapshots of a finished arrangement.

use std::collections::HashMap;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::cells::Orientation;
use crate::pipeline::ArrangementResult;

/// Everything computed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub points: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
    pub patches: Vec<Vec<usize>>,
    pub edges: Vec<[usize; 2]>,
    pub chains: Vec<Vec<usize>>,
    pub non_manifold_edges_of_vert: Vec<Vec<usize>>,
    /// `(patch, ±1)` pairs per non-manifold edge.
    pub half_patch_list: Vec<Vec<(usize, i8)>>,
    /// Bounding patches of every arrangement cell.
    pub arrangement_cells: Vec<Vec<usize>>,
}

/// The geometry, patches and cells only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniResultRecord {
    pub points: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
    pub patches: Vec<Vec<usize>>,
    pub arrangement_cells: Vec<Vec<usize>>,
}

/// A triangle mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriMeshRecord {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[usize; 3]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriMeshListRecord {
    pub meshes: Vec<TriMeshRecord>,
}

fn coords(points: &[Point3<f64>]) -> Vec<[f64; 3]> {
    points.iter().map(|p| [p.x, p.y, p.z]).collect()
}

fn patch_lists(result: &ArrangementResult) -> Vec<Vec<usize>> {
    result.arrangement_cells.iter().map(|c| c.patches.clone()).collect()
}

impl From<&ArrangementResult> for ResultRecord {
    fn from(result: &ArrangementResult) -> Self {
        Self {
            points: coords(&result.iso_pts),
            faces: result.iso_faces.iter().map(|f| f.vert_indices.clone()).collect(),
            patches: result.patches.clone(),
            edges: result.iso_edges.iter().map(|e| [e.v1, e.v2]).collect(),
            chains: result.chains.clone(),
            non_manifold_edges_of_vert: result.non_manifold_edges_of_vert.clone(),
            half_patch_list: result
                .half_patch_list
                .iter()
                .map(|pairs| {
                    pairs.iter().map(|&(p, s): &(usize, Orientation)| (p, s.as_i8())).collect()
                })
                .collect(),
            arrangement_cells: patch_lists(result),
        }
    }
}

impl From<&ArrangementResult> for MiniResultRecord {
    fn from(result: &ArrangementResult) -> Self {
        Self {
            points: coords(&result.iso_pts),
            faces: result.iso_faces.iter().map(|f| f.vert_indices.clone()).collect(),
            patches: result.patches.clone(),
            arrangement_cells: patch_lists(result),
        }
    }
}

impl TriMeshRecord {
    pub fn new(vertices: &[Point3<f64>], faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices: coords(vertices),
            faces,
        }
    }

    /// Fan-triangulates a set of polygons, keeping only the vertices they use.
    pub fn from_polygons<'a>(
        points: &[Point3<f64>],
        polygons: impl IntoIterator<Item = &'a [usize]>,
    ) -> Self {
        let mut mesh = Self::default();
        let mut local: HashMap<usize, usize> = HashMap::new();
        for polygon in polygons {
            let ids: Vec<usize> = polygon
                .iter()
                .map(|&v| {
                    *local.entry(v).or_insert_with(|| {
                        let p = points[v];
                        mesh.vertices.push([p.x, p.y, p.z]);
                        mesh.vertices.len() - 1
                    })
                })
                .collect();
            for k in 1..ids.len().saturating_sub(1) {
                mesh.faces.push([ids[0], ids[k], ids[k + 1]]);
            }
        }
        mesh
    }
}

impl TriMeshListRecord {
    /// One triangle mesh per patch.
    pub fn from_patches(result: &ArrangementResult) -> Self {
        Self {
            meshes: result
                .patches
                .iter()
                .map(|patch| {
                    TriMeshRecord::from_polygons(
                        &result.iso_pts,
                        patch.iter().map(|&f| result.iso_faces[f].vert_indices.as_slice()),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_triangulation_renumbers_vertices() {
        let points: Vec<Point3<f64>> = (0..6).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let quad: &[usize] = &[5, 3, 4, 2];
        let tri: &[usize] = &[3, 4, 0];
        let mesh = TriMeshRecord::from_polygons(&points, [quad, tri]);
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3], [1, 2, 4]]);
        assert_eq!(mesh.vertices[0], [5.0, 0.0, 0.0]);
    }

    #[test]
    fn records_serialize_as_plain_json() {
        let record = MiniResultRecord {
            points: vec![[0.0, 0.5, 1.0]],
            faces: vec![vec![0, 1, 2]],
            patches: vec![vec![0]],
            arrangement_cells: vec![vec![0], vec![0]],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"points":[[0.0,0.5,1.0]],"faces":[[0,1,2]],"patches":[[0]],"arrangement_cells":[[0],[0]]}"#
        );
        let back: MiniResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
