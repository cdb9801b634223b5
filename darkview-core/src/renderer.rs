use crate::engine::EngineDocument;
use crate::error::RenderFailure;
use crate::loader::{DocumentHandle, PageRef};
use crate::raster::{target_dimensions, Raster};
use crate::request::RenderTicket;
use crate::transform;
use tracing::{trace, warn};

/// Render a page at `scale`. The output size is decided here, not by the engine.
pub fn render_page<D: EngineDocument>(page: &PageRef<'_, D>, scale: f32) -> Result<Raster, RenderFailure> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RenderFailure::InvalidScale { scale });
    }

    let number = page.number();
    let size = page.size().map_err(|err| RenderFailure::page(number, err))?;
    let (width, height) = target_dimensions(size, scale);

    let image = page
        .rasterize(width, height)
        .map_err(|err| RenderFailure::page(number, err))?;
    if image.dimensions() != (width, height) {
        let (got_width, got_height) = image.dimensions();
        return Err(RenderFailure::page(
            number,
            format!("engine produced {got_width}x{got_height}, expected {width}x{height}"),
        ));
    }

    trace!("Rendered page {number} at {scale} as {width}x{height}");
    Ok(Raster::new(image))
}

/// Render what a ticket asks for, inverting the result for dark mode
pub fn render_ticket<D: EngineDocument>(
    handle: &DocumentHandle<D>,
    ticket: &RenderTicket,
) -> Result<Raster, RenderFailure> {
    let page = handle
        .page(ticket.page)
        .map_err(|err| RenderFailure::page(ticket.page, err))?;

    let mut raster = render_page(&page, ticket.scale).inspect_err(|err| {
        warn!("Failed to render {:?}: {err}", ticket.id);
    })?;
    if ticket.dark_mode {
        transform::invert(&mut raster);
    }
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PageSize;
    use crate::error::EngineError;
    use crate::loader::DocumentLoader;
    use crate::request::{DocumentId, RequestId};
    use crate::test_utils::{fake_pixel, FakeDocument, FakeEngine, PAGE_ALPHA};
    use image::RgbaImage;

    fn loaded(pages: usize, broken: &[usize]) -> DocumentLoader<FakeEngine> {
        let mut loader = DocumentLoader::new(FakeEngine);
        loader
            .load(DocumentId(7), FakeDocument::encode_with_broken(pages, broken))
            .unwrap();
        loader
    }

    fn ticket(page: usize, scale: f32, dark_mode: bool) -> RenderTicket {
        RenderTicket {
            id: RequestId(1),
            document: DocumentId(7),
            page,
            scale,
            dark_mode,
        }
    }

    #[test]
    fn output_size_tracks_scale() {
        let loader = loaded(2, &[]);
        let raster = loader.render(&ticket(2, 2.0, false)).unwrap();
        assert_eq!(raster.dimensions(), (80, 60));
        assert_eq!(*raster.as_image().get_pixel(3, 4), fake_pixel(2, 3, 4));
    }

    #[test]
    fn dark_tickets_are_inverted_once() {
        let loader = loaded(1, &[]);
        let light = loader.render(&ticket(1, 1.0, false)).unwrap();
        let dark = loader.render(&ticket(1, 1.0, true)).unwrap();

        assert_eq!(light.dimensions(), dark.dimensions());
        for (l, d) in light.pixels().chunks_exact(4).zip(dark.pixels().chunks_exact(4)) {
            assert_eq!(d[0], !l[0]);
            assert_eq!(d[1], !l[1]);
            assert_eq!(d[2], !l[2]);
            assert_eq!(d[3], PAGE_ALPHA);
        }
    }

    #[test]
    fn broken_pages_fail_without_touching_others() {
        let loader = loaded(3, &[2]);
        assert!(matches!(
            loader.render(&ticket(2, 1.0, false)),
            Err(RenderFailure::Page { page: 2, .. })
        ));
        assert!(loader.render(&ticket(3, 1.0, false)).is_ok());
    }

    #[test]
    fn rejects_non_positive_scale() {
        let loader = loaded(1, &[]);
        assert_eq!(
            loader.render(&ticket(1, 0.0, false)),
            Err(RenderFailure::InvalidScale { scale: 0.0 })
        );
        assert!(loader.render(&ticket(1, f32::NAN, false)).is_err());
    }

    #[test]
    fn out_of_range_ticket_is_a_render_failure() {
        let loader = loaded(1, &[]);
        assert!(matches!(
            loader.render(&ticket(5, 1.0, false)),
            Err(RenderFailure::Page { page: 5, .. })
        ));
    }

    struct SloppyDocument;

    impl EngineDocument for SloppyDocument {
        fn page_count(&self) -> usize {
            1
        }

        fn page_size(&self, _index: usize) -> Result<PageSize, EngineError> {
            Ok(PageSize::new(10.0, 10.0))
        }

        fn rasterize(&self, _index: usize, width: u32, height: u32) -> Result<RgbaImage, EngineError> {
            Ok(RgbaImage::new(width + 1, height))
        }
    }

    struct SloppyEngine;

    impl crate::engine::DocumentEngine for SloppyEngine {
        type Document = SloppyDocument;

        fn open(&self, _bytes: Vec<u8>) -> Result<SloppyDocument, EngineError> {
            Ok(SloppyDocument)
        }
    }

    #[test]
    fn engine_output_of_the_wrong_size_is_rejected() {
        let mut loader = DocumentLoader::new(SloppyEngine);
        loader.load(DocumentId(7), Vec::new()).unwrap();
        let err = loader.render(&ticket(1, 1.0, false)).unwrap_err();
        assert_eq!(
            err,
            RenderFailure::page(1, "engine produced 11x10, expected 10x10")
        );
    }
}
