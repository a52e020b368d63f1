use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color32;

/// Canvas vertex: position and texture coordinate in `f32`, straight-alpha 8-bit color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Vertex {
    #[inline]
    pub const fn new(pos: Vec2, uv: Vec2, color: Color32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            u: uv.x,
            v: uv.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }

    #[inline]
    pub const fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub const fn uv(&self) -> Vec2 {
        Vec2::new(self.u, self.v)
    }

    #[inline]
    pub const fn color(&self) -> Color32 {
        Color32::from_rgba(self.r, self.g, self.b, self.a)
    }
}
