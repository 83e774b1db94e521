//! Grouping of iso-faces into patches and of non-manifold edges into chains.

use std::collections::VecDeque;

use tracing::debug;

use crate::edges::IsoEdge;
use crate::extract::IsoFace;

/// Groups faces into patches: maximal sets of faces on one function connected
/// through manifold edges.
///
/// A manifold edge between faces of two functions lies on the mesh boundary,
/// where both surfaces end; it separates patches like a non-manifold edge.
/// Patches are numbered by their smallest face; faces inside a patch are in
/// breadth-first order from it.
pub fn compute_patches(iso_faces: &[IsoFace], iso_edges: &[IsoEdge]) -> Vec<Vec<usize>> {
    let mut visited = vec![false; iso_faces.len()];
    let mut patches = Vec::new();
    for seed in 0..iso_faces.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut patch = Vec::new();
        let mut queue = VecDeque::from([seed]);
        while let Some(f) = queue.pop_front() {
            patch.push(f);
            for &e in &iso_faces[f].edge_indices {
                let edge = &iso_edges[e];
                if !edge.is_manifold() {
                    continue;
                }
                for g in edge.faces() {
                    if !visited[g] && iso_faces[g].func_index == iso_faces[f].func_index {
                        visited[g] = true;
                        queue.push_back(g);
                    }
                }
            }
        }
        patches.push(patch);
    }
    debug!(patches = patches.len(), "grouped faces into patches");
    patches
}

/// Patch id of every face.
pub fn patch_of_face(num_faces: usize, patches: &[Vec<usize>]) -> Vec<usize> {
    let mut of_face = vec![0; num_faces];
    for (p, faces) in patches.iter().enumerate() {
        for &f in faces {
            of_face[f] = p;
        }
    }
    of_face
}

/// For every iso-vertex, the non-manifold edges incident to it.
pub fn compute_non_manifold_edges_of_vert(
    num_verts: usize,
    iso_edges: &[IsoEdge],
) -> Vec<Vec<usize>> {
    let mut of_vert = vec![Vec::new(); num_verts];
    for (e, edge) in iso_edges.iter().enumerate() {
        if edge.is_non_manifold() {
            of_vert[edge.v1].push(e);
            of_vert[edge.v2].push(e);
        }
    }
    of_vert
}

/// Groups non-manifold edges into chains: maximal sets connected through
/// shared vertices.
///
/// Chains are numbered by their smallest edge; edges inside a chain are in
/// breadth-first order from it.
pub fn compute_chains(
    iso_edges: &[IsoEdge],
    non_manifold_edges_of_vert: &[Vec<usize>],
) -> Vec<Vec<usize>> {
    let mut visited = vec![false; iso_edges.len()];
    let mut chains = Vec::new();
    for (seed, edge) in iso_edges.iter().enumerate() {
        if visited[seed] || !edge.is_non_manifold() {
            continue;
        }
        visited[seed] = true;
        let mut chain = Vec::new();
        let mut queue = VecDeque::from([seed]);
        while let Some(e) = queue.pop_front() {
            chain.push(e);
            for v in [iso_edges[e].v1, iso_edges[e].v2] {
                for &next in &non_manifold_edges_of_vert[v] {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        chains.push(chain);
    }
    debug!(chains = chains.len(), "grouped non-manifold edges into chains");
    chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::compute_iso_edges;

    fn faces(cycles: &[&[usize]]) -> Vec<IsoFace> {
        cycles
            .iter()
            .map(|c| IsoFace {
                vert_indices: c.to_vec(),
                ..IsoFace::default()
            })
            .collect()
    }

    #[test]
    fn strip_is_one_patch() {
        let mut fs = faces(&[&[0, 1, 2], &[1, 3, 2], &[2, 3, 4]]);
        let edges = compute_iso_edges(&mut fs);
        let patches = compute_patches(&fs, &edges);
        assert_eq!(patches, vec![vec![0, 1, 2]]);
        assert_eq!(patch_of_face(3, &patches), vec![0, 0, 0]);
    }

    #[test]
    fn non_manifold_edge_separates_patches() {
        // Three sheets hinged on edge (0, 1).
        let mut fs = faces(&[&[0, 1, 2], &[0, 1, 3], &[0, 1, 4]]);
        let edges = compute_iso_edges(&mut fs);
        let patches = compute_patches(&fs, &edges);
        assert_eq!(patches.len(), 3);

        let nm = compute_non_manifold_edges_of_vert(5, &edges);
        assert_eq!(nm[0].len(), 1);
        assert_eq!(nm[1], nm[0]);
        assert!(nm[2].is_empty());
        let chains = compute_chains(&edges, &nm);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 1);
    }

    #[test]
    fn chain_follows_a_curve() {
        // Three sheets along the polyline 0-1-2.
        let mut fs = faces(&[
            &[0, 1, 10],
            &[0, 1, 11],
            &[0, 1, 12],
            &[1, 2, 13],
            &[1, 2, 14],
            &[1, 2, 15],
        ]);
        let edges = compute_iso_edges(&mut fs);
        let nm = compute_non_manifold_edges_of_vert(16, &edges);
        assert_eq!(nm[1].len(), 2);
        let chains = compute_chains(&edges, &nm);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 2);
    }

    #[test]
    fn junction_joins_its_edges_into_one_chain() {
        // Three non-manifold edges meeting at vertex 0.
        let mut fs = faces(&[
            &[0, 1, 10],
            &[0, 1, 11],
            &[0, 1, 12],
            &[0, 2, 13],
            &[0, 2, 14],
            &[0, 2, 15],
            &[0, 3, 16],
            &[0, 3, 17],
            &[0, 3, 18],
        ]);
        let edges = compute_iso_edges(&mut fs);
        let nm = compute_non_manifold_edges_of_vert(19, &edges);
        assert_eq!(nm[0].len(), 3);
        let chains = compute_chains(&edges, &nm);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 3);
        let mut all: Vec<usize> = chains.concat();
        all.sort_unstable();
        let mut expected: Vec<usize> =
            (0..edges.len()).filter(|&e| edges[e].is_non_manifold()).collect();
        expected.sort_unstable();
        assert_eq!(all, expected);
    }

    #[test]
    fn separate_curves_are_separate_chains() {
        let mut fs = faces(&[
            &[0, 1, 10],
            &[0, 1, 11],
            &[0, 1, 12],
            &[2, 3, 13],
            &[2, 3, 14],
            &[2, 3, 15],
        ]);
        let edges = compute_iso_edges(&mut fs);
        let nm = compute_non_manifold_edges_of_vert(16, &edges);
        let chains = compute_chains(&edges, &nm);
        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn sheets_of_two_functions_meeting_at_a_manifold_edge_stay_apart() {
        // Two sheets hinged on edge (0, 1), as where two surfaces end on the
        // mesh boundary along their common curve.
        let mut fs = faces(&[&[0, 1, 2], &[2, 1, 3], &[0, 1, 4], &[4, 1, 5]]);
        fs[2].func_index = 1;
        fs[3].func_index = 1;
        let edges = compute_iso_edges(&mut fs);
        let hinge = edges.iter().find(|e| (e.v1, e.v2) == (0, 1)).unwrap();
        assert!(hinge.is_manifold());

        let patches = compute_patches(&fs, &edges);
        assert_eq!(patches, vec![vec![0, 1], vec![2, 3]]);
        let nm = compute_non_manifold_edges_of_vert(6, &edges);
        assert!(compute_chains(&edges, &nm).is_empty());
    }
}
