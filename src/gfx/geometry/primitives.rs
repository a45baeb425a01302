//! # Primitive Shape Generation
//!
//! Grid plane and skybox cube generators. Both are pure functions of their
//! arguments.

use super::GeometryData;

/// Largest grid whose vertex indices all fit in `u32`
pub const MAX_GRID_SEGMENTS: u32 = u16::MAX as u32;

/// Generate a flat grid plane in the XZ plane (y = 0)
///
/// # Arguments
/// * `segments` - Number of cells along each side, clamped to
///   `1..=MAX_GRID_SEGMENTS`
/// * `size` - World-space side length of the square
///
/// Vertices are laid out row-major over z, then x, on a
/// `(segments + 1) x (segments + 1)` lattice centered at the origin.
/// Each cell emits two triangles whose normals point up (+Y), i.e.
/// counter-clockwise when viewed from above.
pub fn generate_grid_plane(segments: u32, size: f32) -> GeometryData {
    let segs = segments.clamp(1, MAX_GRID_SEGMENTS);
    let row = segs + 1;
    let half = size / 2.0;

    let (vertex_count, index_count) = grid_plane_counts(segs);
    let mut data = GeometryData {
        vertices: Vec::with_capacity(vertex_count),
        indices: Vec::with_capacity(index_count),
    };

    for z in 0..=segs {
        let pos_z = (z as f32 / segs as f32) * size - half;
        for x in 0..=segs {
            let pos_x = (x as f32 / segs as f32) * size - half;
            data.vertices.push([pos_x, 0.0, pos_z]);
        }
    }

    for z in 0..segs {
        for x in 0..segs {
            let top_left = z * row + x;
            let top_right = top_left + 1;
            let bottom_left = (z + 1) * row + x;
            let bottom_right = bottom_left + 1;

            data.indices
                .extend_from_slice(&[top_left, bottom_left, top_right]);
            data.indices
                .extend_from_slice(&[bottom_left, bottom_right, top_right]);
        }
    }

    data
}

/// Vertex and index counts of a grid with `segments` cells per side
fn grid_plane_counts(segments: u32) -> (usize, usize) {
    let segs = segments as usize;
    ((segs + 1) * (segs + 1), segs * segs * 6)
}

/// Generate the skybox cube as a plain triangle list (36 vertices, no indices)
///
/// # Arguments
/// * `half_extent` - Distance from the center to each face
pub fn generate_skybox_cube(half_extent: f32) -> GeometryData {
    #[rustfmt::skip]
    const UNIT_CUBE: [[f32; 3]; 36] = [
        // -Z
        [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
        [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
        // -X
        [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
        [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
        // +X
        [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
        [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
        // +Z
        [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
        [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
        // +Y
        [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
        [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
        // -Y
        [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
        [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    ];

    GeometryData {
        vertices: UNIT_CUBE
            .iter()
            .map(|[x, y, z]| [x * half_extent, y * half_extent, z * half_extent])
            .collect(),
        indices: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_grid_counts() {
        for segments in [1u32, 2, 7, 32] {
            let grid = generate_grid_plane(segments, 25.0);
            let row = (segments + 1) as usize;
            assert_eq!(grid.vertex_count(), row * row);
            assert_eq!(grid.indices.len(), 6 * (segments * segments) as usize);
            assert_eq!(grid.index_count().unwrap(), 6 * segments * segments);
            assert_eq!(grid.triangle_count(), 2 * (segments * segments) as usize);
        }
    }

    #[test]
    fn test_grid_indices_in_range() {
        let grid = generate_grid_plane(16, 4.0);
        let count = grid.vertex_count() as u32;
        assert!(grid.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_grid_corners_and_flatness() {
        let size = 25.0;
        let segments = 10;
        let grid = generate_grid_plane(segments, size);
        let row = (segments + 1) as usize;
        let half = size / 2.0;

        assert_eq!(grid.vertices[0], [-half, 0.0, -half]);
        assert_eq!(grid.vertices[row - 1], [half, 0.0, -half]);
        assert_eq!(grid.vertices[row * (row - 1)], [-half, 0.0, half]);
        assert_eq!(grid.vertices[row * row - 1], [half, 0.0, half]);
        assert!(grid.vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_grid_vertex_spacing() {
        let grid = generate_grid_plane(4, 8.0);
        // second vertex of the first row is one cell along +X
        assert_eq!(grid.vertices[1], [-2.0, 0.0, -4.0]);
        // first vertex of the second row is one cell along +Z
        assert_eq!(grid.vertices[5], [-4.0, 0.0, -2.0]);
    }

    #[test]
    fn test_grid_winding_is_consistent() {
        let grid = generate_grid_plane(6, 3.0);
        for tri in grid.indices.chunks(3) {
            let a = grid.vertices[tri[0] as usize];
            let b = grid.vertices[tri[1] as usize];
            let c = grid.vertices[tri[2] as usize];
            let normal = cross(sub(b, a), sub(c, a));
            assert!(normal[1] > 0.0, "triangle {:?} faces down", tri);
            assert_eq!(normal[0], 0.0);
            assert_eq!(normal[2], 0.0);
        }
    }

    #[test]
    fn test_grid_first_cell_layout() {
        let grid = generate_grid_plane(2, 1.0);
        assert_eq!(&grid.indices[..6], &[0, 3, 1, 3, 4, 1]);
    }

    #[test]
    fn test_zero_segments_clamped() {
        let grid = generate_grid_plane(0, 1.0);
        assert_eq!(grid.vertex_count(), 4);
        assert_eq!(grid.indices.len(), 6);
    }

    #[test]
    fn test_large_grid_counts_do_not_wrap() {
        // 30000 segments overflows u32 in the index count
        let (vertices, indices) = grid_plane_counts(30_000);
        assert_eq!(vertices, 30_001 * 30_001);
        assert_eq!(indices, 6 * 30_000 * 30_000);
        assert!(indices > u32::MAX as usize);
    }

    #[test]
    fn test_max_grid_vertex_indices_fit_u32() {
        let (vertices, _) = grid_plane_counts(MAX_GRID_SEGMENTS);
        assert_eq!(vertices - 1, u32::MAX as usize);
    }

    #[test]
    fn test_index_count_is_checked() {
        let grid = GeometryData {
            vertices: Vec::new(),
            indices: vec![0; 9],
        };
        assert_eq!(grid.index_count(), Ok(9));
        assert_eq!(GeometryData::new().index_count(), Ok(0));
    }

    #[test]
    fn test_skybox_cube() {
        let cube = generate_skybox_cube(2.0);
        assert_eq!(cube.vertex_count(), 36);
        assert!(!cube.is_indexed());
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube
            .vertices
            .iter()
            .flatten()
            .all(|c| c.abs() == 2.0));
    }
}
