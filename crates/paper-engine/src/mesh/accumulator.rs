use crate::canvas::Vertex;
use crate::coords::{Vec2, Vec3};
use crate::error::RenderError;
use crate::paint::Color32;

use super::{IndexFormat, Mesh};

/// Collects triangles for one frame and commits them into a [`Mesh`].
///
/// Every appended triangle gets three fresh vertex slots and three sequential
/// indices; vertices are never shared between triangles, so after `n` appends
/// the index list is exactly `0..3n`.
///
/// Per-frame cycle: `clear`, any number of `append`, then `build`. Buffers keep
/// their capacity across frames.
#[derive(Debug)]
pub struct MeshAccumulator {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    colors: Vec<Color32>,
    indices: Vec<u32>,
    index_format: IndexFormat,
}

impl Default for MeshAccumulator {
    fn default() -> Self {
        Self::with_capacity(1024, IndexFormat::default())
    }
}

impl MeshAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for `vertices` vertices; growth past that is geometric.
    pub fn with_capacity(vertices: usize, index_format: IndexFormat) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
            index_format,
        }
    }

    #[inline]
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Empties all buffers. Meshes built earlier are unaffected; they own their data.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }

    /// Appends one triangle as-is. Winding and degeneracy are not checked.
    pub fn append(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        let base = self.positions.len() as u32;

        for v in [a, b, c] {
            self.positions.push(v.pos().extend(0.0));
            self.uvs.push(v.uv());
            self.colors.push(v.color());
        }

        self.indices
            .extend([base, base.wrapping_add(1), base.wrapping_add(2)]);
    }

    /// Snapshots the buffers into a mesh. Leaves the accumulator untouched.
    pub fn build(&self) -> Result<Mesh, RenderError> {
        let max = self.index_format.max_vertices();
        if self.positions.len() > max {
            return Err(RenderError::MeshTooLarge {
                vertices: self.positions.len(),
                max,
                format: self.index_format,
            });
        }

        Ok(Mesh {
            positions: self.positions.clone(),
            uvs: self.uvs.clone(),
            colors: self.colors.clone(),
            indices: self.indices.clone(),
            index_format: self.index_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vert(i: u32) -> Vertex {
        let f = i as f32;
        Vertex::new(
            Vec2::new(f, f * 2.0),
            Vec2::new(f / 10.0, 1.0 - f / 10.0),
            Color32::from_rgba(i as u8, 255 - i as u8, 7, 200),
        )
    }

    fn append_n(acc: &mut MeshAccumulator, n: u32) {
        for t in 0..n {
            acc.append(vert(t * 3), vert(t * 3 + 1), vert(t * 3 + 2));
        }
    }

    // ── counts / indices ──────────────────────────────────────────────────

    #[test]
    fn n_triangles_give_sequential_indices() {
        for n in [0u32, 1, 2, 17] {
            let mut acc = MeshAccumulator::new();
            append_n(&mut acc, n);
            let mesh = acc.build().unwrap();

            let expected: Vec<u32> = (0..n * 3).collect();
            assert_eq!(mesh.vertex_count(), (n * 3) as usize);
            assert_eq!(mesh.uvs.len(), (n * 3) as usize);
            assert_eq!(mesh.colors.len(), (n * 3) as usize);
            assert_eq!(mesh.indices, expected);
            assert_eq!(mesh.triangle_count(), n as usize);
        }
    }

    #[test]
    fn identical_vertices_are_not_deduplicated() {
        let mut acc = MeshAccumulator::new();
        acc.append(vert(1), vert(1), vert(1));
        acc.append(vert(1), vert(1), vert(1));
        assert_eq!(acc.build().unwrap().vertex_count(), 6);
    }

    #[test]
    fn clear_then_build_is_empty() {
        let mut acc = MeshAccumulator::new();
        append_n(&mut acc, 5);
        acc.clear();
        let mesh = acc.build().unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn indices_restart_after_clear() {
        let mut acc = MeshAccumulator::new();
        append_n(&mut acc, 3);
        acc.clear();
        append_n(&mut acc, 1);
        assert_eq!(acc.build().unwrap().indices, vec![0, 1, 2]);
    }

    // ── attribute round trip ──────────────────────────────────────────────

    #[test]
    fn vertex_fields_survive_build() {
        let (a, b, c) = (vert(4), vert(9), vert(13));
        let mut acc = MeshAccumulator::new();
        acc.append(a, b, c);
        let mesh = acc.build().unwrap();

        for (i, v) in [a, b, c].iter().enumerate() {
            let slot = mesh.indices[i] as usize;
            assert_eq!(mesh.positions[slot], Vec3::new(v.x, v.y, 0.0));
            assert_eq!(mesh.uvs[slot], Vec2::new(v.u, v.v));
            assert_eq!(mesh.colors[slot], Color32::from_rgba(v.r, v.g, v.b, v.a));
        }
    }

    #[test]
    fn build_does_not_consume_state() {
        let mut acc = MeshAccumulator::new();
        append_n(&mut acc, 2);
        let first = acc.build().unwrap();
        let second = acc.build().unwrap();
        assert_eq!(first, second);
        assert_eq!(acc.triangle_count(), 2);
    }

    // ── limits ────────────────────────────────────────────────────────────

    #[test]
    fn u16_mesh_rejects_overflowing_vertex_count() {
        let mut acc = MeshAccumulator::with_capacity(0, IndexFormat::U16);
        // 21 846 triangles = 65 538 vertices, two past the 16-bit range.
        append_n(&mut acc, 21_846);

        let err = acc.build().unwrap_err();
        assert_eq!(
            err,
            RenderError::MeshTooLarge {
                vertices: 65_538,
                max: 65_536,
                format: IndexFormat::U16,
            }
        );
    }

    #[test]
    fn u16_mesh_accepts_full_range() {
        let mut acc = MeshAccumulator::with_capacity(0, IndexFormat::U16);
        // 21 845 triangles = 65 535 vertices.
        append_n(&mut acc, 21_845);
        assert!(acc.build().is_ok());
    }
}
