use crate::coords::{Rect, Vec2};
use crate::paint::{Brush, Color32};
use crate::texture::TextureId;

use super::{DrawCall, Scissor, Vertex};

/// Recorded canvas geometry for one frame.
///
/// Holds the shared vertex and index buffers plus the draw calls that slice the
/// index buffer. Geometry pushed while the texture/scissor/brush state is unchanged
/// extends the last draw call instead of opening a new one.
///
/// ```
/// # use paper_engine::canvas::Canvas;
/// # use paper_engine::coords::Rect;
/// # use paper_engine::paint::Color32;
/// let mut canvas = Canvas::new();
/// canvas.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Color32::BLUE);
/// assert_eq!(canvas.draw_calls().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Canvas {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,

    texture: Option<TextureId>,
    scissor: Scissor,
    brush: Brush,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded geometry and resets state. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
        self.texture = None;
        self.scissor = Scissor::NONE;
        self.brush = Brush::none();
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    // ── state ─────────────────────────────────────────────────────────────

    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn set_scissor(&mut self, rect: Rect) {
        self.scissor = Scissor::from_rect(rect);
    }

    pub fn reset_scissor(&mut self) {
        self.scissor = Scissor::NONE;
    }

    // ── geometry ──────────────────────────────────────────────────────────

    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        let base = self.vertices.len() as u32;
        self.vertices.extend([a, b, c]);
        self.indices.extend([base, base + 1, base + 2]);
        self.extend_draw_call(3);
    }

    /// Solid quad; the texture (if any) is sampled over its full `[0, 1]` range.
    pub fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.fill_rect_uv(rect, Rect::new(0.0, 0.0, 1.0, 1.0), color);
    }

    /// Quad sampling `uv` from the current texture.
    ///
    /// Emits four shared vertices and two triangles.
    pub fn fill_rect_uv(&mut self, rect: Rect, uv: Rect, color: Color32) {
        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }

        let (p0, p1) = (rect.min(), rect.max());
        let (t0, t1) = (uv.min(), uv.max());
        let base = self.vertices.len() as u32;

        self.vertices.extend([
            Vertex::new(p0, t0, color),
            Vertex::new(Vec2::new(p1.x, p0.y), Vec2::new(t1.x, t0.y), color),
            Vertex::new(p1, t1, color),
            Vertex::new(Vec2::new(p0.x, p1.y), Vec2::new(t0.x, t1.y), color),
        ]);
        self.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        self.extend_draw_call(6);
    }

    fn extend_draw_call(&mut self, elements: u32) {
        let call = DrawCall {
            element_count: elements,
            texture: self.texture,
            scissor: self.scissor,
            brush: self.brush,
        };

        match self.draw_calls.last_mut() {
            Some(last) if last.same_state(&call) => last.element_count += elements,
            _ => self.draw_calls.push(call),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vertex {
        Vertex::new(Vec2::new(x, y), Vec2::ZERO, Color32::WHITE)
    }

    #[test]
    fn unchanged_state_extends_last_call() {
        let mut canvas = Canvas::new();
        canvas.push_triangle(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::RED);

        assert_eq!(canvas.draw_calls().len(), 1);
        assert_eq!(canvas.draw_calls()[0].element_count, 9);
        assert_eq!(canvas.vertices().len(), 7);
        assert_eq!(canvas.indices(), &[0, 1, 2, 3, 4, 5, 3, 5, 6]);
    }

    #[test]
    fn state_change_opens_new_call() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::RED);
        canvas.set_brush(Brush::linear_gradient(
            Vec2::ZERO,
            Vec2::X,
            Color32::RED,
            Color32::BLUE,
        ));
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::WHITE);
        canvas.set_scissor(Rect::new(0.0, 0.0, 1.0, 1.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::WHITE);

        let counts: Vec<u32> = canvas.draw_calls().iter().map(|c| c.element_count).collect();
        assert_eq!(counts, vec![6, 6, 6]);
    }

    #[test]
    fn empty_rect_is_skipped() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(Rect::new(5.0, 5.0, 0.0, 10.0), Color32::RED);
        assert!(canvas.draw_calls().is_empty());
        assert!(canvas.vertices().is_empty());
    }

    #[test]
    fn clear_resets_geometry_and_state() {
        let mut canvas = Canvas::new();
        canvas.set_scissor(Rect::new(0.0, 0.0, 1.0, 1.0));
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::RED);
        canvas.clear();
        canvas.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color32::RED);

        assert_eq!(canvas.draw_calls().len(), 1);
        assert_eq!(canvas.draw_calls()[0].scissor, Scissor::NONE);
    }
}
