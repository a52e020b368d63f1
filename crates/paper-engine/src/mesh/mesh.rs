use crate::coords::{Rect, Vec2, Vec3};
use crate::paint::Color32;

/// Index width of a built mesh.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum IndexFormat {
    U16,
    #[default]
    U32,
}

impl IndexFormat {
    /// Number of distinct vertices the format can address.
    #[inline]
    pub const fn max_vertices(self) -> usize {
        match self {
            IndexFormat::U16 => u16::MAX as usize + 1,
            IndexFormat::U32 => u32::MAX as usize,
        }
    }
}

/// Immutable renderable mesh: parallel vertex attributes plus a triangle list.
///
/// Invariant: `positions`, `uvs` and `colors` have equal length, and every index is
/// below that length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Color32>,
    pub indices: Vec<u32>,
    pub index_format: IndexFormat,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds of the vertex positions in the XY plane.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.positions.iter().map(|p| p.truncate());
        let first = points.next()?;
        Some(points.fold(Rect::from_min_max(first, first), Rect::including))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_addresses_full_range() {
        assert_eq!(IndexFormat::U16.max_vertices(), 65_536);
    }

    #[test]
    fn bounds_cover_all_positions() {
        let mesh = Mesh {
            positions: vec![
                Vec3::new(2.0, 3.0, 0.0),
                Vec3::new(-1.0, 5.0, 0.0),
                Vec3::new(4.0, 0.5, 0.0),
            ],
            ..Mesh::default()
        };
        assert_eq!(mesh.bounds(), Some(Rect::new(-1.0, 0.5, 5.0, 4.5)));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert_eq!(Mesh::default().bounds(), None);
    }
}
