use crate::coords::{Mat4, Rect, Vec2, Vec3};
use crate::paint::Brush;
use crate::texture::TextureId;

/// Clip region of a draw call.
///
/// `matrix` maps canvas space into scissor space, where the visible area is
/// `|p| <= extent` on each axis. Column-major, as the canvas produces it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scissor {
    pub matrix: Mat4,
    pub extent: Vec2,
}

impl Scissor {
    /// Scissor that lets everything through: every point lands at the origin,
    /// well inside a unit extent.
    pub const NONE: Self = Self {
        matrix: Mat4::ZERO,
        extent: Vec2::ONE,
    };

    /// Axis-aligned scissor covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.normalized();
        let center = rect.center();
        Self {
            matrix: Mat4::from_translation(Vec3::new(-center.x, -center.y, 0.0)),
            extent: rect.size * 0.5,
        }
    }
}

impl Default for Scissor {
    fn default() -> Self {
        Self::NONE
    }
}

/// A run of `element_count` indices sharing one texture, scissor and brush.
///
/// Draw calls cover the canvas index buffer back to back: the first call starts
/// at index 0 and each following call starts where the previous one ended.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub element_count: u32,
    pub texture: Option<TextureId>,
    pub scissor: Scissor,
    pub brush: Brush,
}

impl DrawCall {
    pub fn new(element_count: u32) -> Self {
        Self {
            element_count,
            texture: None,
            scissor: Scissor::NONE,
            brush: Brush::none(),
        }
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_scissor(mut self, scissor: Scissor) -> Self {
        self.scissor = scissor;
        self
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
        self
    }

    /// Scissor matrix and extent.
    #[inline]
    pub fn scissor(&self) -> (Mat4, Vec2) {
        (self.scissor.matrix, self.scissor.extent)
    }

    /// True when `other` would render identically, so their elements can share one call.
    #[inline]
    pub(crate) fn same_state(&self, other: &DrawCall) -> bool {
        self.texture == other.texture && self.scissor == other.scissor && self.brush == other.brush
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_scissor_centers_and_halves() {
        let s = Scissor::from_rect(Rect::new(10.0, 20.0, 100.0, 50.0));
        let p = s.matrix.transform_point3(Vec3::new(60.0, 45.0, 0.0));
        assert_eq!(p, Vec3::ZERO);
        assert_eq!(s.extent, Vec2::new(50.0, 25.0));
    }

    #[test]
    fn no_scissor_collapses_everything_to_origin() {
        let p = Scissor::NONE.matrix * glam::Vec4::new(123.0, -7.0, 0.0, 1.0);
        assert_eq!(p, glam::Vec4::ZERO);
    }
}
