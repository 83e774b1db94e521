//! Leaf counts for fixed plane sets, checked against the general-position
//! cell-count formula when first recorded.

use simplicial_arrangement::{Arrangement2D, Arrangement3D, Plane2D, Plane3D};

const LINES: [[i64; 3]; 16] = [
    [3605, -1119, 880],
    [-816, 2622, 249],
    [-80, 4068, 1706],
    [2717, -523, 975],
    [1314, -2873, -715],
    [3580, -1666, -613],
    [2652, -3138, 1629],
    [2729, 3537, -2062],
    [-1820, 1263, 2298],
    [1324, 1561, -801],
    [1236, 2896, 2693],
    [1088, -589, 2571],
    [-343, -746, -3433],
    [-407, -3778, 145],
    [1134, 2802, -2261],
    [1329, -318, -229],
];

/// Leaf count after the first `k` lines, for `k = 0..=16`.
const LINE_PREFIX_COUNTS: [usize; 17] =
    [1, 2, 3, 4, 5, 7, 8, 10, 15, 19, 23, 23, 27, 27, 30, 37, 46];

const PLANES: [[i64; 4]; 10] = [
    [3510, 1895, -1867, -769],
    [1946, 3986, -1780, 195],
    [2249, 1429, 1400, 3521],
    [-1314, -1934, 1340, -706],
    [-3024, -2491, -1250, -4026],
    [-1628, 3082, -235, 1643],
    [-352, -2762, -891, 560],
    [-176, 3459, 223, 3801],
    [3047, 2701, -804, -2936],
    [841, 860, 465, -1872],
];

/// Leaf count after the first `k` planes, for `k = 0..=10`.
const PLANE_PREFIX_COUNTS: [usize; 11] = [1, 2, 4, 4, 8, 8, 15, 20, 21, 34, 48];

#[test]
fn lines_exact() {
    let planes: Vec<Plane2D<i64>> = LINES.iter().map(|c| Plane2D::new(*c)).collect();
    let arrangement = Arrangement2D::build(&planes).unwrap();
    assert_eq!(arrangement.leaf_count(), 46);
    assert!(arrangement.check_invariants().is_ok());
}

#[test]
fn lines_floating() {
    let planes: Vec<Plane2D<f64>> =
        LINES.iter().map(|c| Plane2D::new(c.map(|v| v as f64))).collect();
    let arrangement = Arrangement2D::build(&planes).unwrap();
    assert_eq!(arrangement.leaf_count(), 46);
}

#[test]
fn lines_incremental_prefixes() {
    let mut arrangement = Arrangement2D::<i64>::new();
    assert_eq!(arrangement.leaf_count(), LINE_PREFIX_COUNTS[0]);
    for (k, c) in LINES.iter().enumerate() {
        arrangement.insert_plane(Plane2D::new(*c)).unwrap();
        assert_eq!(arrangement.leaf_count(), LINE_PREFIX_COUNTS[k + 1], "after {} lines", k + 1);
    }
}

#[test]
fn planes_exact() {
    let planes: Vec<Plane3D<i64>> = PLANES.iter().map(|c| Plane3D::new(*c)).collect();
    let arrangement = Arrangement3D::build(&planes).unwrap();
    assert_eq!(arrangement.leaf_count(), 48);
    assert!(arrangement.check_invariants().is_ok());
}

#[test]
fn planes_floating() {
    let planes: Vec<Plane3D<f64>> =
        PLANES.iter().map(|c| Plane3D::new(c.map(|v| v as f64))).collect();
    let arrangement = Arrangement3D::build(&planes).unwrap();
    assert_eq!(arrangement.leaf_count(), 48);
}

#[test]
fn planes_batch_prefixes() {
    for k in 0..=PLANES.len() {
        let planes: Vec<Plane3D<i64>> = PLANES[..k].iter().map(|c| Plane3D::new(*c)).collect();
        let mut arrangement = Arrangement3D::new();
        arrangement.set_planes(&planes).unwrap();
        arrangement.initialize();
        assert_eq!(arrangement.leaf_count(), PLANE_PREFIX_COUNTS[k], "after {} planes", k);
    }
}
