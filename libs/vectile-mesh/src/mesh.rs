//! # Tile Mesh Container
//!
//! Output mesh representation: interleaved Pod vertices plus `u32` indices,
//! uploadable to the GPU without conversion.

use config::constants::EPSILON;
use vectile_tile::geom::{Vec3, Vertex};

/// A triangle mesh produced by the per-kind meshers and the combiner.
///
/// Vertices carry position, normal and uv in one `#[repr(C)]` struct, so
/// channel lockstep is structural rather than book-kept across parallel
/// arrays.
///
/// # Example
///
/// ```rust
/// use vectile_mesh::TileMesh;
/// use vectile_tile::geom::{Vec2, Vec3, Vertex};
///
/// let mut mesh = TileMesh::new();
/// mesh.add_vertex(Vertex::ground(Vec3::new(0.0, 0.0, 0.0), Vec2::ZERO));
/// mesh.add_vertex(Vertex::ground(Vec3::new(1.0, 0.0, 0.0), Vec2::ZERO));
/// mesh.add_vertex(Vertex::ground(Vec3::new(0.0, 0.0, 1.0), Vec2::ZERO));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileMesh {
    /// Interleaved vertex data
    vertices: Vec<Vertex>,
    /// Triangle indices, three per triangle
    indices: Vec<u32>,
}

impl TileMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Creates a mesh with pre-allocated capacity.
    ///
    /// Appraised builds size their buffers exactly once through this.
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Creates a mesh from already-built buffers.
    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Reserves room for at least this many additional vertices and indices.
    pub fn reserve(&mut self, vertex_count: usize, index_count: usize) {
        self.vertices.reserve(vertex_count);
        self.indices.reserve(index_count);
    }

    /// Mutable access to both buffers at once, for in-place fills.
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Vertex>, &mut Vec<u32>) {
        (&mut self.vertices, &mut self.indices)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of indices.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.indices.push(v0);
        self.indices.push(v1);
        self.indices.push(v2);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns a reference to the indices.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Merges another mesh into this one, remapping its indices past the
    /// vertices already present.
    pub fn merge(&mut self, other: &TileMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners, or zeroes for an empty mesh.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let mut min = self.vertices[0].position;
        let mut max = min;
        for v in &self.vertices[1..] {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        (min, max)
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All indices reference existing vertices
    /// - Index count is a multiple of three
    /// - No triangle repeats a vertex
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        if self.indices.len() % 3 != 0 {
            return false;
        }
        let vertex_count = self.vertices.len() as u32;
        for tri in self.indices.chunks_exact(3) {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
        }
        true
    }

    /// Sum of unsigned triangle areas.
    pub fn surface_area(&self) -> f32 {
        let mut total = 0.0;
        for tri in self.indices.chunks_exact(3) {
            let a = self.vertices[tri[0] as usize].position;
            let b = self.vertices[tri[1] as usize].position;
            let c = self.vertices[tri[2] as usize].position;
            total += (b - a).cross(c - a).length() * 0.5;
        }
        total
    }

    /// FNV-1a hash over the raw vertex and index bytes.
    ///
    /// Two builds of the same tile with the same options hash equal; tests
    /// use this to pin down determinism across runs and strategies.
    pub fn content_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = FNV_OFFSET;
        for &byte in bytemuck::cast_slice::<Vertex, u8>(&self.vertices) {
            hash = (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
        }
        for &byte in bytemuck::cast_slice::<u32, u8>(&self.indices) {
            hash = (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
        }
        hash
    }

    /// Vertex buffer bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Releases the buffers, keeping capacity for reuse.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// True when two meshes are equal within `EPSILON` per channel component.
pub fn approx_eq(a: &TileMesh, b: &TileMesh) -> bool {
    if a.vertex_count() != b.vertex_count() || a.indices() != b.indices() {
        return false;
    }
    a.vertices().iter().zip(b.vertices()).all(|(va, vb)| {
        (va.position - vb.position).abs().max_element() < EPSILON
            && (va.normal - vb.normal).abs().max_element() < EPSILON
            && (va.uv - vb.uv).abs().max_element() < EPSILON
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectile_tile::geom::Vec2;

    fn triangle_mesh(offset: Vec3) -> TileMesh {
        let mut mesh = TileMesh::new();
        mesh.add_vertex(Vertex::ground(offset, Vec2::new(0.0, 0.0)));
        mesh.add_vertex(Vertex::ground(offset + Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0)));
        mesh.add_vertex(Vertex::ground(offset + Vec3::new(0.0, 0.0, 1.0), Vec2::new(0.0, 1.0)));
        mesh.add_triangle(0, 2, 1);
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TileMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.validate());
        assert_eq!(mesh.bounding_box(), (Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_add_and_count() {
        let mesh = triangle_mesh(Vec3::ZERO);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.validate());
    }

    #[test]
    fn test_merge_remaps_indices() {
        let mut a = triangle_mesh(Vec3::ZERO);
        let b = triangle_mesh(Vec3::new(5.0, 0.0, 0.0));
        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(&a.indices()[3..], &[3, 5, 4]);
        assert!(a.validate());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let mut mesh = triangle_mesh(Vec3::ZERO);
        mesh.add_triangle(0, 1, 9);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_validate_rejects_repeated_vertex() {
        let mut mesh = triangle_mesh(Vec3::ZERO);
        mesh.add_triangle(0, 0, 1);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_bounding_box() {
        let mesh = triangle_mesh(Vec3::new(2.0, 0.0, -1.0));
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(max, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_surface_area_of_unit_triangle() {
        let mesh = triangle_mesh(Vec3::ZERO);
        assert!((mesh.surface_area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_content_hash_is_stable_and_discriminating() {
        let a = triangle_mesh(Vec3::ZERO);
        let b = triangle_mesh(Vec3::ZERO);
        let c = triangle_mesh(Vec3::X);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut mesh = triangle_mesh(Vec3::ZERO);
        let cap = mesh.vertices().len();
        mesh.clear();
        assert!(mesh.is_empty());
        assert!(mesh.vertices.capacity() >= cap);
    }

    #[test]
    fn test_approx_eq_tolerates_noise() {
        let a = triangle_mesh(Vec3::ZERO);
        let mut b = triangle_mesh(Vec3::ZERO);
        b.vertices[1].position.x += 1e-7;
        assert!(approx_eq(&a, &b));
        b.vertices[1].position.x += 1.0;
        assert!(!approx_eq(&a, &b));
    }
}
