use std::sync::atomic::{AtomicU32, Ordering};

use crate::coords::IntRect;
use crate::error::RenderError;

/// Every table gets its own tag so handles cannot leak between renderers.
static NEXT_TABLE_TAG: AtomicU32 = AtomicU32::new(1);

/// Opaque handle to a texture owned by a [`TextureTable`].
///
/// A handle is only meaningful to the table that issued it; passing it to another
/// table fails with [`RenderError::UnknownTexture`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId {
    table: u32,
    slot: u32,
}

/// Pixel layout of every texture in the table.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PixelFormat {
    /// 4 channels, 8 bits each.
    #[default]
    Rgba8,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Sampling filter the texture is meant to be drawn with.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FilterMode {
    #[default]
    Nearest,
}

/// CPU-side texture: dimensions plus the full pixel buffer.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    format: PixelFormat,
    filter: FilterMode,
    pixels: Vec<u8>,
    generation: u64,
}

impl Texture {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bumped on every content or size change; GPU mirrors compare it to decide
    /// whether to re-upload.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns all textures created through a renderer.
#[derive(Debug)]
pub struct TextureTable {
    tag: u32,
    textures: Vec<Texture>,
    max_dimension: u32,
}

impl TextureTable {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            tag: NEXT_TABLE_TAG.fetch_add(1, Ordering::Relaxed),
            textures: Vec::new(),
            max_dimension,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Allocates a zero-filled RGBA8 texture.
    pub fn create(&mut self, width: u32, height: u32) -> Result<TextureId, RenderError> {
        self.check_size(width, height)?;

        let id = TextureId {
            table: self.tag,
            slot: self.textures.len() as u32,
        };
        let format = PixelFormat::Rgba8;
        self.textures.push(Texture {
            width,
            height,
            format,
            filter: FilterMode::Nearest,
            pixels: vec![0; byte_len(width, height, format)],
            generation: 0,
        });

        log::debug!("texture {id:?} created ({width}x{height})");
        Ok(id)
    }

    pub fn get(&self, id: TextureId) -> Result<&Texture, RenderError> {
        self.slot(id)
            .and_then(|slot| self.textures.get(slot))
            .ok_or(RenderError::UnknownTexture(id))
    }

    pub fn size_of(&self, id: TextureId) -> Result<(u32, u32), RenderError> {
        self.get(id).map(Texture::size)
    }

    /// Resizes the texture to `region`'s size and replaces all of its pixels.
    ///
    /// Only the region's size matters; the texture always receives the full image.
    pub fn resize_and_upload(
        &mut self,
        id: TextureId,
        region: IntRect,
        bytes: &[u8],
    ) -> Result<(), RenderError> {
        let (width, height) = region.size();
        self.check_size(width, height)?;

        let slot = self.slot(id).ok_or(RenderError::UnknownTexture(id))?;
        let texture = self
            .textures
            .get_mut(slot)
            .ok_or(RenderError::UnknownTexture(id))?;

        let expected = region.area() * texture.format.bytes_per_pixel() as u64;
        if bytes.len() as u64 != expected {
            return Err(RenderError::TextureDataLength {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        texture.width = width;
        texture.height = height;
        texture.pixels.clear();
        texture.pixels.extend_from_slice(bytes);
        texture.generation += 1;

        log::trace!("texture {id:?} uploaded ({width}x{height}, gen {})", texture.generation);
        Ok(())
    }

    /// Iterates all textures with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        let tag = self.tag;
        self.textures.iter().enumerate().map(move |(slot, tex)| {
            (
                TextureId {
                    table: tag,
                    slot: slot as u32,
                },
                tex,
            )
        })
    }

    fn slot(&self, id: TextureId) -> Option<usize> {
        (id.table == self.tag).then_some(id.slot as usize)
    }

    fn check_size(&self, width: u32, height: u32) -> Result<(), RenderError> {
        let valid = |side: u32| (1..=self.max_dimension).contains(&side);
        if valid(width) && valid(height) {
            Ok(())
        } else {
            Err(RenderError::InvalidTextureSize {
                width,
                height,
                max: self.max_dimension,
            })
        }
    }
}

fn byte_len(width: u32, height: u32, format: PixelFormat) -> usize {
    width as usize * height as usize * format.bytes_per_pixel() as usize
}
