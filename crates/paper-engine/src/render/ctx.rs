use crate::coords::IntRect;
use crate::error::RenderError;
use crate::texture::{TextureId, TextureTable};

const WHITE_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Resources shared by every frame of one renderer.
///
/// Owns the texture table and the 1×1 opaque-white texture bound by draw calls
/// that carry no texture of their own.
#[derive(Debug)]
pub struct RenderContext {
    textures: TextureTable,
    default_texture: TextureId,
}

impl RenderContext {
    pub fn new(max_texture_dimension: u32) -> Result<Self, RenderError> {
        let mut textures = TextureTable::new(max_texture_dimension);
        let default_texture = textures.create(1, 1)?;
        textures.resize_and_upload(default_texture, IntRect::from_size(1, 1), &WHITE_PIXEL)?;

        Ok(Self {
            textures,
            default_texture,
        })
    }

    #[inline]
    pub fn default_texture(&self) -> TextureId {
        self.default_texture
    }

    #[inline]
    pub fn textures(&self) -> &TextureTable {
        &self.textures
    }

    #[inline]
    pub fn textures_mut(&mut self) -> &mut TextureTable {
        &mut self.textures
    }
}
