//! Radial face order around iso-edges, simplicial cells, and the assembly of
//! arrangement cells.
//!
//! An arrangement cell is a connected component of the graph whose nodes are
//! the simplicial cells (BSP leaves of every tet) and the two sides of every
//! patch. Cells are linked to each other across non-iso faces, to the side of
//! a patch they touch, and half-patches facing each other across a region
//! around a non-manifold edge are linked together.

use std::collections::HashMap;

use simplicial_arrangement::Sign;
use tracing::{debug, warn};

use crate::edges::IsoEdge;
use crate::extract::{IsoFace, VertexKey, vertex_key};
use crate::tet_cut::TetCut;

/// Side of an iso-face, measured by the sign of its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Positive,
    Negative,
}

impl Orientation {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    #[inline]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    #[inline]
    fn of(sign: Sign) -> Self {
        match sign {
            Sign::Negative => Self::Negative,
            _ => Self::Positive,
        }
    }
}

/// One BSP leaf of one tet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplicialCell {
    pub tet_id: usize,
    /// Index of the cell in its tet's complex.
    pub tet_cell_id: usize,
    /// Per face of the cell: whether it lies on the iso-surface.
    pub is_iso_face: Vec<bool>,
    /// Per face: the patch for iso-faces, otherwise the global id of the
    /// simplicial cell across it (`None` on the mesh boundary).
    pub face_info: Vec<Option<usize>>,
    /// Per iso-face: the side of the face's function the cell lies on.
    pub face_orientation: Vec<Option<Orientation>>,
}

/// A connected region of the arrangement of all functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrangementCell {
    /// Sorted global simplicial cell ids.
    pub simplicial_cells: Vec<usize>,
    /// Sorted ids of the patches bounding the region.
    pub patches: Vec<usize>,
}

/// The cutting plane an iso-face lies on; the one of smallest global
/// function id if several functions vanish on it.
fn function_plane(cut: &TetCut, face: usize) -> Option<usize> {
    cut.complex
        .face_planes(face)
        .into_iter()
        .filter(|&p| p >= 4)
        .min_by_key(|&p| cut.function_of_plane(p))
}

fn side_of_cell(cut: &TetCut, cell: usize, face: usize) -> Option<Orientation> {
    let plane = function_plane(cut, face)?;
    Some(Orientation::of(cut.complex.cells()[cell].signs[plane]))
}

/// Walks the faces of a tet around the local edge `[a, b]`.
///
/// Returns every iso-face met, with the side the walk moves into, and whether
/// the walk closed on itself (the edge is interior to the tet).
fn radial_walk(
    cut: &TetCut,
    iso_fid_of_tet_face: &[Option<usize>],
    a: usize,
    b: usize,
) -> (Vec<(usize, Orientation)>, bool) {
    let complex = &cut.complex;
    let faces = complex.faces();
    let around = complex.faces_around_edge(a, b);
    let Some(start) = around
        .iter()
        .copied()
        .find(|&f| faces[f].negative_cell.is_none())
        .or_else(|| around.iter().copied().min())
    else {
        return (Vec::new(), false);
    };
    let Some(mut cell) = faces[start].positive_cell else {
        return (Vec::new(), false);
    };

    let mut order = Vec::new();
    let mut record = |face: usize, cell: usize, entering: bool| {
        if let (Some(fid), Some(side)) =
            (iso_fid_of_tet_face[face], side_of_cell(cut, cell, face))
        {
            order.push((fid, if entering { side } else { side.flipped() }));
        }
    };

    let mut face = start;
    for _ in 0..=around.len() {
        record(face, cell, true);
        let Some(next) = complex.other_face_of_cell_at_edge(cell, face, a, b) else {
            break;
        };
        if next == start {
            return (order, true);
        }
        match faces[next].opposite(cell) {
            Some(c) => {
                face = next;
                cell = c;
            }
            None => {
                record(next, cell, false);
                return (order, false);
            }
        }
    }
    warn!(a, b, "radial walk did not terminate cleanly");
    (order, false)
}

fn local_edge(global_vid_of_tet_vert: &[Option<usize>], edge: &IsoEdge) -> Option<(usize, usize)> {
    let a = global_vid_of_tet_vert.iter().position(|&g| g == Some(edge.v1))?;
    let b = global_vid_of_tet_vert.iter().position(|&g| g == Some(edge.v2))?;
    Some((a, b))
}

/// Iso half-faces around `iso_edge` inside one tet, in radial order.
///
/// `Orientation::Positive` means the walk leaves the face into the side where
/// the face's function is positive. Returns nothing if the tet does not hold
/// the edge.
pub fn compute_face_order_in_one_tet(
    cut: &TetCut,
    global_vid_of_tet_vert: &[Option<usize>],
    iso_fid_of_tet_face: &[Option<usize>],
    iso_edge: &IsoEdge,
) -> Vec<(usize, Orientation)> {
    match local_edge(global_vid_of_tet_vert, iso_edge) {
        Some((a, b)) => radial_walk(cut, iso_fid_of_tet_face, a, b).0,
        None => Vec::new(),
    }
}

/// For every non-manifold edge, the half-patches facing each other across
/// the regions around it.
///
/// Entries `2k` and `2k + 1` of each list bound the same region.
pub fn compute_half_patch_list(
    cuts: &[TetCut],
    global_vid_of_tet_vert: &[Vec<Option<usize>>],
    iso_fid_of_tet_face: &[Vec<Option<usize>>],
    iso_faces: &[IsoFace],
    iso_edges: &[IsoEdge],
    patch_of_face: &[usize],
) -> Vec<Vec<(usize, Orientation)>> {
    let mut list = Vec::new();
    for edge in iso_edges.iter().filter(|e| e.is_non_manifold()) {
        let mut tets: Vec<usize> = edge
            .faces()
            .flat_map(|f| iso_faces[f].tet_face_indices.iter().map(|&(t, _)| t))
            .collect();
        tets.sort_unstable();
        tets.dedup();

        let mut pairs = Vec::new();
        for t in tets {
            let Some((a, b)) = local_edge(&global_vid_of_tet_vert[t], edge) else {
                continue;
            };
            let (order, closed) = radial_walk(&cuts[t], &iso_fid_of_tet_face[t], a, b);
            let m = order.len();
            let count = match (closed, m) {
                (true, m) if m >= 2 => m,
                (false, m) => m.saturating_sub(1),
                _ => 0,
            };
            for k in 0..count {
                let (f1, s1) = order[k];
                let (f2, s2) = order[(k + 1) % m];
                pairs.push((patch_of_face[f1], s1));
                pairs.push((patch_of_face[f2], s2.flipped()));
            }
        }
        list.push(pairs);
    }
    debug!(edges = list.len(), "computed half-patch list");
    list
}

/// One simplicial cell per BSP leaf of every tet, numbered tet by tet.
pub fn compute_simplicial_cells(
    cuts: &[TetCut],
    tets: &[[usize; 4]],
    iso_fid_of_tet_face: &[Vec<Option<usize>>],
    patch_of_face: &[usize],
) -> Vec<SimplicialCell> {
    let offsets: Vec<usize> = cuts
        .iter()
        .scan(0, |acc, cut| {
            let start = *acc;
            *acc += cut.complex.cells().len();
            Some(start)
        })
        .collect();

    let boundary_key = |t: usize, face: usize| -> Vec<VertexKey> {
        let cut = &cuts[t];
        let mut key: Vec<VertexKey> = cut.complex.faces()[face]
            .vertices
            .iter()
            .map(|&v| vertex_key(cut, &tets[t], &cut.complex.vertices()[v]))
            .collect();
        key.sort_unstable();
        key
    };

    // Non-iso faces on tet boundaries, matched across tets by their vertices.
    let mut across: HashMap<Vec<VertexKey>, Vec<usize>> = HashMap::new();
    for (t, cut) in cuts.iter().enumerate() {
        for (c, cell) in cut.complex.cells().iter().enumerate() {
            for &f in &cell.faces {
                let face = &cut.complex.faces()[f];
                if iso_fid_of_tet_face[t][f].is_none() && face.opposite(c).is_none() {
                    across.entry(boundary_key(t, f)).or_default().push(offsets[t] + c);
                }
            }
        }
    }

    let mut cells = Vec::with_capacity(cuts.iter().map(|c| c.complex.cells().len()).sum());
    for (t, cut) in cuts.iter().enumerate() {
        for (c, cell) in cut.complex.cells().iter().enumerate() {
            let id = offsets[t] + c;
            let n = cell.faces.len();
            let mut is_iso_face = Vec::with_capacity(n);
            let mut face_info = Vec::with_capacity(n);
            let mut face_orientation = Vec::with_capacity(n);
            for &f in &cell.faces {
                if let Some(fid) = iso_fid_of_tet_face[t][f] {
                    is_iso_face.push(true);
                    face_info.push(Some(patch_of_face[fid]));
                    face_orientation.push(side_of_cell(cut, c, f));
                    continue;
                }
                is_iso_face.push(false);
                face_orientation.push(None);
                let neighbor = match cut.complex.faces()[f].opposite(c) {
                    Some(other) => Some(offsets[t] + other),
                    None => {
                        let matches =
                            across.get(&boundary_key(t, f)).map_or(&[][..], Vec::as_slice);
                        debug_assert!(
                            matches.len() <= 2,
                            "tet face shared by {} cells",
                            matches.len()
                        );
                        matches.iter().copied().find(|&other| other != id)
                    }
                };
                face_info.push(neighbor);
            }
            cells.push(SimplicialCell {
                tet_id: t,
                tet_cell_id: c,
                is_iso_face,
                face_info,
                face_orientation,
            });
        }
    }
    debug!(cells = cells.len(), "computed simplicial cells");
    cells
}

struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut x = x;
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let mut a = self.find(a);
        let mut b = self.find(b);
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

/// Groups simplicial cells into arrangement cells, numbered by their
/// smallest simplicial cell.
pub fn compute_arrangement_cells(
    num_patch: usize,
    half_patch_list: &[Vec<(usize, Orientation)>],
    simplicial_cells: &[SimplicialCell],
) -> Vec<ArrangementCell> {
    let num_cells = simplicial_cells.len();
    let half_patch = |patch: usize, side: Orientation| {
        num_cells
            + 2 * patch
            + match side {
                Orientation::Positive => 0,
                Orientation::Negative => 1,
            }
    };
    let mut sets = DisjointSets::new(num_cells + 2 * num_patch);

    for (id, cell) in simplicial_cells.iter().enumerate() {
        let faces = cell.is_iso_face.iter().zip(&cell.face_info).zip(&cell.face_orientation);
        for ((&iso, &info), &side) in faces {
            match (iso, info, side) {
                (true, Some(patch), Some(side)) => sets.union(id, half_patch(patch, side)),
                (false, Some(other), _) => sets.union(id, other),
                _ => {}
            }
        }
    }
    for pairs in half_patch_list {
        for pair in pairs.chunks_exact(2) {
            let (p1, s1) = pair[0];
            let (p2, s2) = pair[1];
            sets.union(half_patch(p1, s1), half_patch(p2, s2));
        }
    }

    let mut index_of_root: HashMap<usize, usize> = HashMap::new();
    let mut result: Vec<ArrangementCell> = Vec::new();
    for (id, cell) in simplicial_cells.iter().enumerate() {
        let root = sets.find(id);
        let index = *index_of_root.entry(root).or_insert_with(|| {
            result.push(ArrangementCell::default());
            result.len() - 1
        });
        let region = &mut result[index];
        region.simplicial_cells.push(id);
        region.patches.extend(
            cell.is_iso_face
                .iter()
                .zip(&cell.face_info)
                .filter(|(iso, _)| **iso)
                .filter_map(|(_, p)| *p),
        );
    }
    for region in &mut result {
        region.patches.sort_unstable();
        region.patches.dedup();
    }
    debug!(cells = result.len(), "assembled arrangement cells");
    result
}
