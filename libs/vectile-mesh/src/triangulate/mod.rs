//! # Polygon Triangulator
//!
//! Ear clipping over the XZ ground plane. Handles simple polygons (either
//! winding, no self-intersections, no holes), which is what decoded tile
//! footprints are. O(n^2), fine at per-feature ring sizes.
//!
//! Output triangles are wound so their surface normal faces +Y regardless
//! of the input winding, and indices always refer to the caller's original
//! ring order.

use config::constants::EPSILON;
use vectile_tile::geom::Point;

use crate::error::{MeshError, MeshResult};

/// Doubled cross product of (b - a) and (c - a) projected on the ground
/// plane. Positive when triangle (a, b, c) faces +Y.
#[inline]
pub(crate) fn cross_xz(a: Point, b: Point, c: Point) -> f32 {
    (b.z - a.z) * (c.x - a.x) - (b.x - a.x) * (c.z - a.z)
}

/// Signed ring area on the ground plane.
///
/// Positive when the ring is wound so its surface faces +Y.
pub fn signed_area_xz(ring: &[Point]) -> f32 {
    let mut doubled = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        doubled += p.z * q.x - q.z * p.x;
    }
    doubled * 0.5
}

/// Barycentric sign test; boundary points count as inside.
#[inline]
fn point_in_triangle_xz(p: Point, a: Point, b: Point, c: Point) -> bool {
    cross_xz(a, b, p) >= 0.0 && cross_xz(b, c, p) >= 0.0 && cross_xz(c, a, p) >= 0.0
}

/// True when the corner at `v` is convex and no other remaining ring point
/// lies inside the candidate triangle.
fn is_ear(ring: &[Point], work: &[u32], u: usize, v: usize, w: usize) -> bool {
    let a = ring[work[u] as usize];
    let b = ring[work[v] as usize];
    let c = ring[work[w] as usize];

    // Reflex and collinear corners cannot be clipped
    if cross_xz(a, b, c) < EPSILON {
        return false;
    }

    for (t, &index) in work.iter().enumerate() {
        if t == u || t == v || t == w {
            continue;
        }
        if point_in_triangle_xz(ring[index as usize], a, b, c) {
            return false;
        }
    }
    true
}

/// Triangulates a simple polygon ring by ear clipping.
///
/// Returns `3 * (n - 2)` indices into `ring`, every triple wound to face
/// +Y. Fails with [`MeshError::DegeneratePolygon`] for rings with fewer
/// than 3 points and for rings where a full sweep finds no ear
/// (self-intersecting or fully collinear input).
///
/// # Example
///
/// ```rust
/// use glam::Vec3;
/// use vectile_mesh::triangulate;
///
/// let square = [
///     Vec3::new(0.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 0.0),
///     Vec3::new(1.0, 0.0, 1.0),
///     Vec3::new(0.0, 0.0, 1.0),
/// ];
/// let indices = triangulate(&square).unwrap();
/// assert_eq!(indices.len(), 6);
/// ```
pub fn triangulate(ring: &[Point]) -> MeshResult<Vec<u32>> {
    let n = ring.len();
    if n < 3 {
        return Err(MeshError::degenerate(format!(
            "polygon ring has {n} points, need at least 3"
        )));
    }

    // Work on an index list so winding normalization does not disturb the
    // caller's ring order.
    let mut work: Vec<u32> = if signed_area_xz(ring) > 0.0 {
        (0..n as u32).collect()
    } else {
        (0..n as u32).rev().collect()
    };

    let mut indices = Vec::with_capacity(3 * (n - 2));

    // Two sweeps of the remaining ring without a clip means no ear exists
    let mut attempts = 2 * work.len();
    let mut cursor = work.len() - 1;

    while work.len() > 2 {
        if attempts == 0 {
            return Err(MeshError::degenerate(
                "no ear found, ring is self-intersecting or collinear",
            ));
        }
        attempts -= 1;

        let count = work.len();
        let u = if cursor < count { cursor } else { 0 };
        let v = if u + 1 < count { u + 1 } else { 0 };
        let w = if v + 1 < count { v + 1 } else { 0 };

        if is_ear(ring, &work, u, v, w) {
            indices.push(work[u]);
            indices.push(work[v]);
            indices.push(work[w]);
            work.remove(v);
            attempts = 2 * work.len();
        }
        cursor = v;
    }

    Ok(indices)
}

#[cfg(test)]
mod tests;
