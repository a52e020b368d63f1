use crate::canvas::DrawCall;
use crate::config::BrushCarryOver;
use crate::coords::{Mat4, Vec2, Vec4};
use crate::paint::BrushKind;
use crate::texture::TextureId;

/// Shader-facing state for one draw.
///
/// Built up call by call and snapshotted into each [`DrawBatch`](super::DrawBatch).
/// Matrices are stored already transposed: the canvas hands out column-major
/// matrices, the canvas shader multiplies row vectors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformState {
    pub main_texture: TextureId,
    pub scissor_matrix: Mat4,
    pub scissor_extents: Vec2,
    pub brush_type: BrushKind,
    pub brush_matrix: Mat4,
    pub brush_color1: Vec4,
    pub brush_color2: Vec4,
    /// `(point1.x, point1.y, point2.x, point2.y)`.
    pub brush_params: Vec4,
    /// `(corner_radius, feather, 0, 0)`.
    pub brush_params2: Vec4,
}

impl UniformState {
    pub fn new(main_texture: TextureId) -> Self {
        Self {
            main_texture,
            scissor_matrix: Mat4::ZERO,
            scissor_extents: Vec2::ONE,
            brush_type: BrushKind::None,
            brush_matrix: Mat4::IDENTITY,
            brush_color1: Vec4::ZERO,
            brush_color2: Vec4::ZERO,
            brush_params: Vec4::ZERO,
            brush_params2: Vec4::ZERO,
        }
    }

    /// Loads the state of `call`.
    ///
    /// Brush slots are written only for calls that carry a brush. For brushless
    /// calls they keep whatever the previous call left, unless `carry_over` asks
    /// for a reset.
    pub fn apply(&mut self, call: &DrawCall, default_texture: TextureId, carry_over: BrushCarryOver) {
        self.main_texture = call.texture.unwrap_or(default_texture);

        let (scissor, extent) = call.scissor();
        self.scissor_matrix = scissor.transpose();
        self.scissor_extents = extent;

        let brush = &call.brush;
        self.brush_type = brush.kind;

        if !brush.kind.is_none() {
            self.brush_matrix = brush.transform.transpose();
            self.brush_color1 = brush.color1.to_normalized();
            self.brush_color2 = brush.color2.to_normalized();
            self.brush_params = Vec4::new(
                brush.point1.x,
                brush.point1.y,
                brush.point2.x,
                brush.point2.y,
            );
            self.brush_params2 = Vec4::new(brush.corner_radius, brush.feather, 0.0, 0.0);
        } else if carry_over == BrushCarryOver::Reset {
            self.reset_brush();
        }
    }

    fn reset_brush(&mut self) {
        let initial = Self::new(self.main_texture);
        self.brush_matrix = initial.brush_matrix;
        self.brush_color1 = initial.brush_color1;
        self.brush_color2 = initial.brush_color2;
        self.brush_params = initial.brush_params;
        self.brush_params2 = initial.brush_params2;
    }
}
