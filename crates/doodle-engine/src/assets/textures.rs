use image::RgbaImage;

use crate::api::types::TextureId;

/// Owns the bitmaps extracted from finished strokes.
/// Textures live until the registry is dropped or `remove` is called.
pub struct TextureRegistry {
    textures: Vec<Option<RgbaImage>>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
        }
    }

    /// Store a bitmap and return its handle.
    pub fn insert(&mut self, image: RgbaImage) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Some(image));
        id
    }

    /// Look up a texture. Returns None for unknown or removed handles.
    pub fn get(&self, id: TextureId) -> Option<&RgbaImage> {
        self.textures.get(id.0 as usize)?.as_ref()
    }

    /// Drop the bitmap behind a handle. Handles are never reused.
    pub fn remove(&mut self, id: TextureId) -> Option<RgbaImage> {
        self.textures.get_mut(id.0 as usize)?.take()
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
