//! # Triangulator Tests

use approx::assert_relative_eq;
use glam::Vec3;

use super::{cross_xz, signed_area_xz, triangulate};
use crate::error::MeshError;

fn ring(points: &[(f32, f32)]) -> Vec<Vec3> {
    points.iter().map(|&(x, z)| Vec3::new(x, 0.0, z)).collect()
}

/// Sum of unsigned triangle areas for an index list over a ring.
fn triangulated_area(ring: &[Vec3], indices: &[u32]) -> f32 {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let a = ring[tri[0] as usize];
            let b = ring[tri[1] as usize];
            let c = ring[tri[2] as usize];
            (b - a).cross(c - a).length() * 0.5
        })
        .sum()
}

fn assert_all_face_up(ring: &[Vec3], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let a = ring[tri[0] as usize];
        let b = ring[tri[1] as usize];
        let c = ring[tri[2] as usize];
        assert!(
            cross_xz(a, b, c) > 0.0,
            "triangle {:?} does not face up",
            tri
        );
    }
}

#[test]
fn test_triangle_passes_through() {
    let tri = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
    let indices = triangulate(&tri).unwrap();
    assert_eq!(indices.len(), 3);
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2]);
    assert_all_face_up(&tri, &indices);
}

#[test]
fn test_unit_square_two_triangles_area_one() {
    let square = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let indices = triangulate(&square).unwrap();
    assert_eq!(indices.len(), 6);
    assert_relative_eq!(triangulated_area(&square, &indices), 1.0, epsilon = 1e-5);
    assert_all_face_up(&square, &indices);
}

#[test]
fn test_winding_is_normalized_for_both_input_orders() {
    let forward = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let mut backward = forward.clone();
    backward.reverse();

    let fwd = triangulate(&forward).unwrap();
    let bwd = triangulate(&backward).unwrap();
    assert_all_face_up(&forward, &fwd);
    assert_all_face_up(&backward, &bwd);
}

#[test]
fn test_concave_polygon() {
    // L-shape, 6 corners, area 3
    let l_shape = ring(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ]);
    let indices = triangulate(&l_shape).unwrap();
    assert_eq!(indices.len(), 3 * 4);
    assert_relative_eq!(triangulated_area(&l_shape, &indices), 3.0, epsilon = 1e-5);
    assert_all_face_up(&l_shape, &indices);
}

#[test]
fn test_irregular_convex_polygon_preserves_area() {
    let poly = ring(&[
        (0.0, 0.0),
        (4.0, -1.0),
        (6.0, 1.5),
        (5.0, 4.0),
        (1.5, 4.5),
        (-0.5, 2.0),
    ]);
    let indices = triangulate(&poly).unwrap();
    assert_eq!(indices.len(), 3 * 4);
    let expected = signed_area_xz(&poly).abs();
    assert_relative_eq!(triangulated_area(&poly, &indices), expected, epsilon = 1e-4);
}

#[test]
fn test_indices_reference_original_ring() {
    let poly = ring(&[(0.0, 0.0), (3.0, 0.0), (3.0, 2.0), (1.5, 3.0), (0.0, 2.0)]);
    let indices = triangulate(&poly).unwrap();
    assert_eq!(indices.len(), 3 * 3);
    assert!(indices.iter().all(|&i| (i as usize) < poly.len()));
    // Every ring point appears in at least one triangle
    for i in 0..poly.len() as u32 {
        assert!(indices.contains(&i), "ring point {i} unused");
    }
}

#[test]
fn test_too_few_points_fails() {
    let two = ring(&[(0.0, 0.0), (1.0, 0.0)]);
    match triangulate(&two) {
        Err(MeshError::DegeneratePolygon { message }) => {
            assert!(message.contains("at least 3"));
        }
        other => panic!("expected DegeneratePolygon, got {other:?}"),
    }
}

#[test]
fn test_collinear_ring_fails() {
    let line = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    assert!(matches!(
        triangulate(&line),
        Err(MeshError::DegeneratePolygon { .. })
    ));
}

#[test]
fn test_self_intersecting_ring_fails() {
    // Bowtie: edges cross in the middle
    let bowtie = ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
    assert!(matches!(
        triangulate(&bowtie),
        Err(MeshError::DegeneratePolygon { .. })
    ));
}

#[test]
fn test_signed_area_sign_tracks_winding() {
    let up = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let mut down = up.clone();
    down.reverse();
    assert!(signed_area_xz(&up) > 0.0);
    assert!(signed_area_xz(&down) < 0.0);
    assert_relative_eq!(signed_area_xz(&up).abs(), 1.0, epsilon = 1e-6);
}
