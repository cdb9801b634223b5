use crate::engine::{DocumentEngine, EngineDocument, PageSize};
use crate::error::{EngineError, RenderFailure, ViewerError};
use crate::raster::Raster;
use crate::renderer;
use crate::request::{DocumentId, DocumentInfo, RenderTicket};
use image::RgbaImage;
use tracing::{debug, info, warn};

/// A decoded document with at least one page
pub struct DocumentHandle<D> {
    id: DocumentId,
    document: D,
    page_count: usize,
}

impl<D: EngineDocument> DocumentHandle<D> {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Access a page by its one-based number
    pub fn page(&self, number: usize) -> Result<PageRef<'_, D>, ViewerError> {
        if number == 0 || number > self.page_count {
            return Err(ViewerError::OutOfRange {
                page: number,
                page_count: self.page_count,
            });
        }
        Ok(PageRef {
            document: &self.document,
            number,
        })
    }
}

/// Borrowed view of a single page
pub struct PageRef<'a, D> {
    document: &'a D,
    number: usize,
}

impl<D: EngineDocument> PageRef<'_, D> {
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> Result<PageSize, EngineError> {
        self.document.page_size(self.number - 1)
    }

    pub fn rasterize(&self, width: u32, height: u32) -> Result<RgbaImage, EngineError> {
        self.document.rasterize(self.number - 1, width, height)
    }
}

/// Owns the engine and at most one loaded document
pub struct DocumentLoader<E: DocumentEngine> {
    engine: E,
    current: Option<DocumentHandle<E::Document>>,
}

impl<E: DocumentEngine> DocumentLoader<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            current: None,
        }
    }

    /// Decode `bytes` as the new current document. The previous document is
    /// released first, whether or not the new one opens.
    pub fn load(&mut self, id: DocumentId, bytes: Vec<u8>) -> Result<DocumentInfo, ViewerError> {
        self.release();

        let size = bytes.len();
        let document = self.engine.open(bytes).map_err(|err| {
            warn!("Failed to open {id}: {err}");
            ViewerError::unsupported(err.message())
        })?;

        let page_count = document.page_count();
        if page_count == 0 {
            warn!("{id} has no pages");
            return Err(ViewerError::unsupported("document has no pages"));
        }

        info!("Loaded {id}: {page_count} pages from {size} bytes");
        self.current = Some(DocumentHandle {
            id,
            document,
            page_count,
        });
        Ok(DocumentInfo {
            document: id,
            page_count,
        })
    }

    pub fn current(&self) -> Option<&DocumentHandle<E::Document>> {
        self.current.as_ref()
    }

    pub fn release(&mut self) {
        if let Some(previous) = self.current.take() {
            debug!("Releasing {}", previous.id);
        }
    }

    /// Produce the raster a ticket asks for, if its document is still loaded
    pub fn render(&self, ticket: &RenderTicket) -> Result<Raster, RenderFailure> {
        let handle = self
            .current
            .as_ref()
            .filter(|handle| handle.id == ticket.document)
            .ok_or(RenderFailure::DocumentReleased {
                document: ticket.document,
            })?;
        renderer::render_ticket(handle, ticket)
    }
}
