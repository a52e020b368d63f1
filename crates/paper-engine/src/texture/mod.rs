//! CPU-side texture storage behind strongly typed handles.
//!
//! Textures are RGBA8 with nearest sampling. GPU surfaces mirror them lazily,
//! keyed by [`TextureId`] and [`Texture::generation`].

mod table;

pub use table::{FilterMode, PixelFormat, Texture, TextureId, TextureTable};
