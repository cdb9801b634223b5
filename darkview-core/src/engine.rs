//! Seam between the viewer and the external rendering engine.
//!
//! The engine is a black box that turns bytes into a document and pages into
//! pixels. Everything else (page bounds, output sizing, colour transforms,
//! ordering of results) lives in this crate.

use crate::error::EngineError;
use image::RgbaImage;

/// Intrinsic page size in engine units (PDF points for PDFium)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Opens raw document bytes
pub trait DocumentEngine {
    type Document: EngineDocument;

    fn open(&self, bytes: Vec<u8>) -> Result<Self::Document, EngineError>;
}

/// A decoded document. Page indices are zero-based here; the loader does the
/// one-based translation and bounds checks before calling in.
pub trait EngineDocument {
    fn page_count(&self) -> usize;

    fn page_size(&self, index: usize) -> Result<PageSize, EngineError>;

    /// Rasterize a page to exactly `width` x `height` RGBA pixels
    fn rasterize(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage, EngineError>;
}
