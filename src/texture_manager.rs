use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use uuid::Uuid;

struct CachedTexture {
    handle: TextureHandle,
    revision: u64,
    last_used: u64,
}

/// GPU textures for composited pages, refreshed when the editor revision moves.
pub struct TextureManager {
    /// One texture per page, reused across revisions
    texture_cache: HashMap<Uuid, CachedTexture>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of page textures to keep
    max_cache_size: usize,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture showing `page` at `revision`.
    ///
    /// `generator` only runs when the cached texture is missing or older than
    /// `revision`; it returns `None` when there is nothing to show.
    pub fn get_or_update<F>(
        &mut self,
        ctx: &Context,
        page: Uuid,
        revision: u64,
        generator: F,
    ) -> Option<TextureId>
    where
        F: FnOnce() -> Option<RgbaImage>,
    {
        let frame = self.current_frame;
        if let Some(cached) = self.texture_cache.get_mut(&page) {
            cached.last_used = frame;
            if cached.revision != revision {
                let image = generator()?;
                cached.handle.set(to_color_image(&image), TextureOptions::LINEAR);
                cached.revision = revision;
            }
            return Some(cached.handle.id());
        }

        let image = generator()?;
        self.prune_cache_if_needed();
        let handle = ctx.load_texture(format!("page_{page}"), to_color_image(&image), TextureOptions::LINEAR);
        let id = handle.id();
        self.texture_cache.insert(
            page,
            CachedTexture {
                handle,
                revision,
                last_used: frame,
            },
        );
        Some(id)
    }

    /// Makes room for one more texture by dropping the least recently used.
    fn prune_cache_if_needed(&mut self) {
        while self.texture_cache.len() >= self.max_cache_size {
            let oldest = self
                .texture_cache
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(page, _)| *page);
            match oldest {
                Some(page) => {
                    self.texture_cache.remove(&page);
                }
                None => break,
            }
        }
    }

    /// Drop every texture, e.g. after loading a new document.
    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
    }

    pub fn len(&self) -> usize {
        self.texture_cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texture_cache.is_empty()
    }
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}
