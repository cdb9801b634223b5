use crate::engine::PageSize;
use image::RgbaImage;

/// A rendered page: RGBA8 pixels at a specific scale
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

// Pixel data is too large to be useful in debug output
impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Raster {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }
}

/// Output size of a page rendered at `scale`. Truncates like the engine's own
/// point-to-pixel conversion and never returns a zero dimension.
pub fn target_dimensions(size: PageSize, scale: f32) -> (u32, u32) {
    let width = (size.width * scale) as u32;
    let height = (size.height * scale) as u32;
    (width.max(1), height.max(1))
}
