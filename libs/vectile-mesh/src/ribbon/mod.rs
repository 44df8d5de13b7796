//! # Linear Feature Mesher
//!
//! Turns polyline strips into flat, variable-width ribbons with mitered
//! joins, smoothed bends and semicircular end caps.
//!
//! ## Stages
//!
//! 1. **Smoothing**: each strip is rewritten by recursive corner cutting;
//!    corners sharper than the bend threshold are replaced by two cut
//!    points, recursing up to the configured depth.
//! 2. **Appraisal**: exact vertex and index totals are computed from the
//!    smoothed strips. A strip of `m` points with `c`-vertex end caps
//!    emits `2m + 2c` vertices and `6(m - 1) + 6c` indices.
//! 3. **Fill**: buffers are allocated once at the appraised totals and
//!    written without reallocation. One side-vertex pair per point, offset
//!    half a width along the averaged bi-normal; two triangles per
//!    consecutive pair; a `c`-vertex fan per strip end, triangulated
//!    against the ribbon's end edge.
//!
//! The ribbon surface faces +Y. `uv.x` is normalized arc length, `uv.y`
//! runs 0 on the left edge to 1 on the right.

use std::f32::consts::PI;

use config::constants::{MAX_SMOOTH_DEPTH, MAX_VERTICES, MIN_SEGMENT_LENGTH_SQUARED};
use vectile_tile::geom::{Point, Vec2, Vec3, Vertex, UP};
use vectile_tile::LinearFeature;

use crate::error::{MeshError, MeshResult};
use crate::mesh::TileMesh;
use crate::options::RibbonOptions;

// =============================================================================
// APPRAISAL
// =============================================================================

/// Exact output size of a ribbon build, known before any vertex is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RibbonAppraisal {
    /// Vertices the fill pass will emit.
    pub vertex_count: usize,
    /// Indices the fill pass will emit.
    pub index_count: usize,
}

/// Runs smoothing and predicts the exact output size of
/// [`mesh_linear_feature`] for the same inputs.
pub fn appraise_feature(feature: &LinearFeature, options: &RibbonOptions) -> RibbonAppraisal {
    appraise(&prepare_strips(feature, options), options.end_cap_points)
}

fn appraise(strips: &[Vec<Point>], end_cap_points: usize) -> RibbonAppraisal {
    let mut vertex_count = 0;
    let mut index_count = 0;
    for strip in strips {
        let m = strip.len();
        vertex_count += 2 * m + 2 * end_cap_points;
        index_count += 6 * (m - 1) + 6 * end_cap_points;
    }
    RibbonAppraisal {
        vertex_count,
        index_count,
    }
}

// =============================================================================
// MESHING
// =============================================================================

/// Meshes one linear feature at the given ribbon width.
///
/// `width` is resolved per tile by the caller (preset bounds, base size
/// factor, tile physical size). Strips with fewer than two points or with
/// no measurable length produce nothing; a feature made only of such
/// strips yields an empty mesh.
pub fn mesh_linear_feature(
    feature: &LinearFeature,
    options: &RibbonOptions,
    width: f32,
) -> MeshResult<TileMesh> {
    let strips = prepare_strips(feature, options);
    let appraisal = appraise(&strips, options.end_cap_points);
    if appraisal.vertex_count > MAX_VERTICES {
        return Err(MeshError::TooManyVertices {
            count: appraisal.vertex_count,
            max: MAX_VERTICES,
        });
    }

    let mut mesh = TileMesh::with_capacity(appraisal.vertex_count, appraisal.index_count);
    let half_width = width * 0.5;
    for strip in &strips {
        fill_strip(&mut mesh, strip, half_width, options.end_cap_points);
    }

    debug_assert_eq!(mesh.vertex_count(), appraisal.vertex_count);
    debug_assert_eq!(mesh.index_count(), appraisal.index_count);
    Ok(mesh)
}

// =============================================================================
// SMOOTHING
// =============================================================================

/// Smooths every usable strip of a feature. Drops strips that cannot carry
/// a ribbon (fewer than two points, or zero arc length).
fn prepare_strips(feature: &LinearFeature, options: &RibbonOptions) -> Vec<Vec<Point>> {
    let mut strips = Vec::with_capacity(feature.strip_count());
    for strip in feature.strips() {
        if strip.len() < 2 {
            continue;
        }
        let smoothed = smooth_strip(strip, options);
        let total = arc_length(&smoothed);
        if total * total < MIN_SEGMENT_LENGTH_SQUARED {
            continue;
        }
        strips.push(smoothed);
    }
    strips
}

fn smooth_strip(strip: &[Point], options: &RibbonOptions) -> Vec<Point> {
    let mut out = Vec::with_capacity(strip.len());
    out.push(strip[0]);
    for i in 1..strip.len() - 1 {
        smooth_corner(
            strip[i - 1],
            strip[i],
            strip[i + 1],
            options,
            MAX_SMOOTH_DEPTH,
            &mut out,
        );
    }
    out.push(strip[strip.len() - 1]);
    out
}

/// Replaces a bend corner by two cut points and recurses into the halves.
/// At the depth floor, or once the corner clears the threshold, the corner
/// point is emitted as-is.
fn smooth_corner(
    p0: Point,
    p1: Point,
    p2: Point,
    options: &RibbonOptions,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth == 0 || !is_bend(p0, p1, p2, options.bend_threshold) {
        out.push(p1);
        return;
    }
    let p1a = p1.lerp(p0, options.smooth_factor);
    let p1b = p1.lerp(p2, options.smooth_factor);
    smooth_corner(p0, p1a, p1b, options, depth - 1, out);
    smooth_corner(p1a, p1b, p2, options, depth - 1, out);
}

fn is_bend(p0: Point, p1: Point, p2: Point, threshold: f32) -> bool {
    match (direction(p0, p1), direction(p1, p2)) {
        (Some(incoming), Some(outgoing)) => incoming.dot(outgoing) < threshold,
        _ => false,
    }
}

// =============================================================================
// FILL
// =============================================================================

fn fill_strip(mesh: &mut TileMesh, pts: &[Point], half_width: f32, cap_points: usize) {
    let m = pts.len();
    let base = mesh.vertex_count() as u32;

    let total = arc_length(pts);
    let inv_total = if total > 0.0 { 1.0 / total } else { 0.0 };

    // One side pair per point, offset along the miter bi-normal
    let mut travelled = 0.0;
    for i in 0..m {
        if i > 0 {
            travelled += (pts[i] - pts[i - 1]).length();
        }
        let side = lateral(tangent_at(pts, i));
        let u = travelled * inv_total;
        mesh.add_vertex(Vertex::ground(pts[i] - side * half_width, Vec2::new(u, 0.0)));
        mesh.add_vertex(Vertex::ground(pts[i] + side * half_width, Vec2::new(u, 1.0)));
    }

    // Two up-facing triangles per consecutive pair
    for i in 0..(m as u32 - 1) {
        let left0 = base + 2 * i;
        let right0 = left0 + 1;
        let left1 = left0 + 2;
        let right1 = left0 + 3;
        mesh.add_triangle(left0, right0, left1);
        mesh.add_triangle(right0, right1, left1);
    }

    // Semicircular caps, fanned against the ribbon's end edges
    let start_tangent = tangent_at(pts, 0);
    let start_side = lateral(start_tangent);
    emit_cap(
        mesh,
        CapFrame {
            center: pts[0],
            sweep_from: -start_side,
            outward: -start_tangent,
            pivot: base,
            far: base + 1,
            u: 0.0,
            v_pivot: 0.0,
            v_far: 1.0,
        },
        half_width,
        cap_points,
    );

    let end_tangent = tangent_at(pts, m - 1);
    let end_side = lateral(end_tangent);
    let end_left = base + 2 * (m as u32 - 1);
    emit_cap(
        mesh,
        CapFrame {
            center: pts[m - 1],
            sweep_from: end_side,
            outward: end_tangent,
            pivot: end_left + 1,
            far: end_left,
            u: 1.0,
            v_pivot: 1.0,
            v_far: 0.0,
        },
        half_width,
        cap_points,
    );
}

/// Where and how one end cap is swept.
struct CapFrame {
    center: Point,
    /// Unit lateral direction the sweep starts from (angle 0).
    sweep_from: Vec3,
    /// Unit direction away from the ribbon (angle pi/2).
    outward: Vec3,
    /// End-edge vertex the fan pivots on.
    pivot: u32,
    /// End-edge vertex the last fan triangle closes against.
    far: u32,
    u: f32,
    v_pivot: f32,
    v_far: f32,
}

/// Emits `cap_points` fan vertices at angles `pi * (k + 1) / (c + 1)` and
/// `cap_points` triangles pivoting on the end-edge vertex.
fn emit_cap(mesh: &mut TileMesh, frame: CapFrame, half_width: f32, cap_points: usize) {
    let first_fan = mesh.vertex_count() as u32;
    for k in 0..cap_points {
        let theta = PI * (k + 1) as f32 / (cap_points + 1) as f32;
        let dir = frame.sweep_from * theta.cos() + frame.outward * theta.sin();
        let v = frame.v_pivot + (frame.v_far - frame.v_pivot) * (theta / PI);
        mesh.add_vertex(Vertex::ground(
            frame.center + dir * half_width,
            Vec2::new(frame.u, v),
        ));
    }
    for k in 0..cap_points as u32 {
        let a = first_fan + k;
        let b = if (k as usize) + 1 < cap_points {
            a + 1
        } else {
            frame.far
        };
        mesh.add_triangle(frame.pivot, a, b);
    }
}

// =============================================================================
// TANGENT HELPERS
// =============================================================================

fn arc_length(pts: &[Point]) -> f32 {
    pts.windows(2).map(|w| (w[1] - w[0]).length()).sum()
}

fn direction(from: Point, to: Point) -> Option<Vec3> {
    let delta = to - from;
    if delta.length_squared() < MIN_SEGMENT_LENGTH_SQUARED {
        return None;
    }
    delta.try_normalize()
}

/// Averaged unit tangent at a strip point. Endpoints use their single
/// segment; a perfect hairpin falls back to the incoming direction.
fn tangent_at(pts: &[Point], i: usize) -> Vec3 {
    let incoming = if i > 0 {
        direction(pts[i - 1], pts[i])
    } else {
        None
    };
    let outgoing = if i + 1 < pts.len() {
        direction(pts[i], pts[i + 1])
    } else {
        None
    };
    let summed = incoming.unwrap_or(Vec3::ZERO) + outgoing.unwrap_or(Vec3::ZERO);
    summed
        .try_normalize()
        .or(incoming)
        .or(outgoing)
        .unwrap_or(Vec3::X)
}

/// Unit bi-normal in the ground plane, to the right of travel.
fn lateral(tangent: Vec3) -> Vec3 {
    tangent.cross(UP).try_normalize().unwrap_or(Vec3::X)
}
