use anyhow::{Context, Result};
use darkview_core::{DocumentEngine, EngineDocument, EngineError, PageSize};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// PDF engine backed by pdfium-render
pub struct PdfiumEngine {
    pdfium: &'static Pdfium,
}

impl PdfiumEngine {
    /// Bind to the PDFium library, trying `library_dir` first, then the working
    /// directory, then the system library.
    ///
    /// The binding lives for the rest of the process so loaded documents can
    /// borrow it for `'static`; call this once.
    pub fn new(library_dir: Option<&Path>) -> Result<Self> {
        let candidates: Vec<PathBuf> = library_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain([PathBuf::from("./")])
            .collect();

        let bound = candidates.iter().find_map(|dir| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .inspect_err(|err| tracing::debug!("No PDFium in {}: {err}", dir.display()))
                .ok()
        });
        let bindings = match bound {
            Some(bindings) => bindings,
            None => Pdfium::bind_to_system_library()
                .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?,
        };

        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self { pdfium })
    }
}

impl DocumentEngine for PdfiumEngine {
    type Document = Document;

    fn open(&self, bytes: Vec<u8>) -> Result<Document, EngineError> {
        let inner = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .context("Failed to load PDF document")
            .map_err(engine_error)?;
        Ok(Document { inner })
    }
}

pub struct Document {
    inner: PdfDocument<'static>,
}

impl Document {
    fn page(&self, index: usize) -> Result<PdfPage<'static>> {
        let index = u16::try_from(index).context("Page index out of bounds")?;
        self.inner
            .pages()
            .get(index)
            .context("Page index out of bounds")
    }

    fn render(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage> {
        let page = self.page(index)?;

        let render_config = PdfRenderConfig::new().set_target_size(width as i32, height as i32);
        let bitmap = page
            .render_with_config(&render_config)
            .context("Failed to render page")?;

        let img = RgbaImage::from_raw(
            bitmap.width() as u32,
            bitmap.height() as u32,
            bitmap.as_rgba_bytes(),
        )
        .context("Failed to create image from bitmap")?;

        // PDFium rounds the target size on its own; the viewer expects it exact
        if img.dimensions() == (width, height) {
            Ok(img)
        } else {
            Ok(imageops::resize(&img, width, height, FilterType::Triangle))
        }
    }
}

impl EngineDocument for Document {
    fn page_count(&self) -> usize {
        self.inner.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, EngineError> {
        let page = self.page(index).map_err(engine_error)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn rasterize(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage, EngineError> {
        self.render(index, width, height).map_err(engine_error)
    }
}

fn engine_error(err: anyhow::Error) -> EngineError {
    EngineError::new(format!("{err:#}"))
}
