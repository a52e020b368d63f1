use crate::coords::{Mat4, Rect, Vec2};

use super::Color32;

/// Brush kind, numbered the way the canvas shader branches on it.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BrushKind {
    /// Plain vertex color, no brush evaluation.
    #[default]
    None = 0,
    LinearGradient = 1,
    RadialGradient = 2,
    BoxGradient = 3,
}

impl BrushKind {
    /// Tag uploaded to the shader.
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, BrushKind::None)
    }
}

/// Paint descriptor attached to a draw call.
///
/// Point semantics depend on `kind`:
/// - linear: `point1` = start, `point2` = end
/// - radial: `point1` = center, `point2` = (inner radius, outer radius)
/// - box: `point1` = center, `point2` = half extents; `corner_radius` and `feather` shape the edge
///
/// `transform` maps canvas space into brush space and is stored the way the canvas
/// produces it (column-major).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    pub kind: BrushKind,
    pub color1: Color32,
    pub color2: Color32,
    pub point1: Vec2,
    pub point2: Vec2,
    pub corner_radius: f32,
    pub feather: f32,
    pub transform: Mat4,
}

impl Default for Brush {
    fn default() -> Self {
        Self::none()
    }
}

impl Brush {
    pub const fn none() -> Self {
        Self {
            kind: BrushKind::None,
            color1: Color32::TRANSPARENT,
            color2: Color32::TRANSPARENT,
            point1: Vec2::ZERO,
            point2: Vec2::ZERO,
            corner_radius: 0.0,
            feather: 0.0,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn linear_gradient(start: Vec2, end: Vec2, from: Color32, to: Color32) -> Self {
        Self {
            kind: BrushKind::LinearGradient,
            color1: from,
            color2: to,
            point1: start,
            point2: end,
            ..Self::none()
        }
    }

    pub fn radial_gradient(
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color32,
        outer: Color32,
    ) -> Self {
        Self {
            kind: BrushKind::RadialGradient,
            color1: inner,
            color2: outer,
            point1: center,
            point2: Vec2::new(inner_radius, outer_radius),
            ..Self::none()
        }
    }

    pub fn box_gradient(
        rect: Rect,
        corner_radius: f32,
        feather: f32,
        inner: Color32,
        outer: Color32,
    ) -> Self {
        let rect = rect.normalized();
        Self {
            kind: BrushKind::BoxGradient,
            color1: inner,
            color2: outer,
            point1: rect.center(),
            point2: rect.size * 0.5,
            corner_radius,
            feather,
            ..Self::none()
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_shader_numbering() {
        assert_eq!(BrushKind::None.tag(), 0);
        assert_eq!(BrushKind::LinearGradient.tag(), 1);
        assert_eq!(BrushKind::RadialGradient.tag(), 2);
        assert_eq!(BrushKind::BoxGradient.tag(), 3);
    }

    #[test]
    fn box_gradient_stores_center_and_half_extents() {
        let brush = Brush::box_gradient(
            Rect::new(10.0, 20.0, 40.0, 10.0),
            4.0,
            2.0,
            Color32::WHITE,
            Color32::BLACK,
        );
        assert_eq!(brush.point1, Vec2::new(30.0, 25.0));
        assert_eq!(brush.point2, Vec2::new(20.0, 5.0));
        assert_eq!(brush.corner_radius, 4.0);
        assert_eq!(brush.feather, 2.0);
    }
}
