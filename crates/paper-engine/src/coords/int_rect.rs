/// Integer pixel rectangle, used for texture regions.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl IntRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub const fn size(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel count, widened so large regions cannot overflow.
    #[inline]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
