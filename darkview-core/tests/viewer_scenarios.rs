use darkview_core::test_utils::{fake_pixel, FakeDocument, FakeEngine, PAGE_ALPHA};
use darkview_core::{
    CommitOutcome, DocumentLoader, MediaType, Phase, Raster, RenderFailure, RenderTicket, Selection,
    Viewer, ViewerConfig,
};
use pretty_assertions::assert_eq;

struct Harness {
    viewer: Viewer,
    loader: DocumentLoader<FakeEngine>,
}

impl Harness {
    fn new() -> Self {
        Self {
            viewer: Viewer::new(ViewerConfig::default()).unwrap(),
            loader: DocumentLoader::new(FakeEngine),
        }
    }

    fn open(&mut self, name: &str, bytes: Vec<u8>) -> Option<RenderTicket> {
        let document = match self.viewer.open(name, &MediaType::from_path(name)) {
            Selection::Load(document) => document,
            Selection::Release => {
                self.loader.release();
                return None;
            }
            Selection::Ignored => return None,
        };
        let info = self.loader.load(document, bytes);
        self.viewer.document_loaded(document, info)
    }

    /// Render a ticket on the loader and hand the result back to the viewer
    fn finish(&mut self, ticket: RenderTicket) -> CommitOutcome {
        let result = self.loader.render(&ticket);
        self.viewer.commit(ticket, result)
    }

    fn page(&self) -> usize {
        self.viewer.view().unwrap().current_page()
    }
}

#[test]
fn next_page_saturates_on_a_three_page_document() {
    let mut harness = Harness::new();
    let first = harness.open("three.pdf", FakeDocument::encode(3)).unwrap();
    harness.finish(first);

    let mut pages = Vec::new();
    for _ in 0..3 {
        if let Some(ticket) = harness.viewer.next_page() {
            assert_eq!(harness.finish(ticket), CommitOutcome::Committed);
        }
        pages.push(harness.page());
    }
    assert_eq!(pages, vec![2, 3, 3]);
    assert_eq!(harness.viewer.session().unwrap().view().page_label(), "Page 3 of 3");
}

#[test]
fn dark_mode_shows_the_complement_of_the_light_raster() {
    let mut harness = Harness::new();
    let first = harness.open("doc.pdf", FakeDocument::encode(2)).unwrap();
    harness.finish(first);
    let light = harness.viewer.surface().cloned().unwrap();

    let ticket = harness.viewer.toggle_dark_mode().unwrap();
    assert!(ticket.dark_mode);
    assert_eq!(harness.finish(ticket), CommitOutcome::Committed);
    let dark = harness.viewer.surface().cloned().unwrap();

    assert_eq!(dark.dimensions(), light.dimensions());
    for (l, d) in light.pixels().chunks_exact(4).zip(dark.pixels().chunks_exact(4)) {
        assert_eq!([d[0], d[1], d[2]], [!l[0], !l[1], !l[2]]);
        assert_eq!(d[3], l[3]);
    }

    // Toggling back renders from the document again: no compounding
    let ticket = harness.viewer.toggle_dark_mode().unwrap();
    harness.finish(ticket);
    assert_eq!(harness.viewer.surface(), Some(&light));
}

#[test]
fn rapid_zoom_commits_only_the_last_request() {
    let mut harness = Harness::new();
    let first = harness.open("doc.pdf", FakeDocument::encode(1)).unwrap();
    harness.finish(first);

    // 1.8 -> 0.5, then 1.0, then 2.0, all in flight at once
    let to_half = harness.viewer.set_scale(-1.3).unwrap();
    let to_one = harness.viewer.set_scale(0.5).unwrap();
    let to_two = harness.viewer.set_scale(1.0).unwrap();
    assert_eq!(
        [to_half.scale, to_one.scale, to_two.scale],
        [0.5, 1.0, 2.0]
    );

    let half = harness.loader.render(&to_half);
    let one = harness.loader.render(&to_one);
    let two = harness.loader.render(&to_two);

    // Completion order differs from request order
    assert_eq!(harness.viewer.commit(to_one, one), CommitOutcome::Stale);
    assert_eq!(harness.viewer.commit(to_two, two), CommitOutcome::Committed);
    assert_eq!(harness.viewer.commit(to_half, half), CommitOutcome::Stale);

    let surface = harness.viewer.surface().unwrap();
    assert_eq!(surface.dimensions(), (80, 60));
}

#[test]
fn render_of_a_replaced_file_is_never_committed() {
    let mut harness = Harness::new();
    let first = harness.open("old.pdf", FakeDocument::encode(4)).unwrap();
    harness.finish(first);
    let in_flight = harness.viewer.go_to_page(4).unwrap();

    let fresh = harness.open("new.pdf", FakeDocument::encode(2)).unwrap();

    assert_eq!(
        harness.loader.render(&in_flight),
        Err(RenderFailure::DocumentReleased {
            document: in_flight.document
        })
    );
    let late = Ok(Raster::from_raw(1, 1, vec![0, 0, 0, 255]).unwrap());
    assert_eq!(harness.viewer.commit(in_flight, late), CommitOutcome::Stale);
    assert!(harness.viewer.surface().is_none());

    assert_eq!(harness.finish(fresh), CommitOutcome::Committed);
    assert_eq!(harness.viewer.session().unwrap().view().page_count(), 2);
}

#[test]
fn broken_page_does_not_end_the_session() {
    let mut harness = Harness::new();
    let first = harness
        .open("damaged.pdf", FakeDocument::encode_with_broken(3, &[2]))
        .unwrap();
    harness.finish(first);
    let page_one = harness.viewer.surface().cloned().unwrap();

    let broken = harness.viewer.next_page().unwrap();
    assert!(matches!(
        harness.finish(broken),
        CommitOutcome::Failed(RenderFailure::Page { page: 2, .. })
    ));
    assert_eq!(harness.viewer.surface(), Some(&page_one));

    let next = harness.viewer.next_page().unwrap();
    assert_eq!(harness.finish(next), CommitOutcome::Committed);
    let surface = harness.viewer.surface().unwrap();
    assert_eq!(*surface.as_image().get_pixel(0, 0), fake_pixel(3, 0, 0));
    assert_eq!(surface.as_image().get_pixel(0, 0).0[3], PAGE_ALPHA);
    assert!(harness.viewer.session().unwrap().last_failure().is_none());
}

#[test]
fn images_bypass_the_pipeline() {
    let mut harness = Harness::new();
    assert_eq!(harness.open("photo.jpg", Vec::new()), None);
    assert!(matches!(harness.viewer.phase(), Phase::Unsupported { .. }));
    assert!(harness.loader.current().is_none());
}

#[test]
fn image_after_a_pdf_frees_the_loaded_document() {
    let mut harness = Harness::new();
    let first = harness.open("five.pdf", FakeDocument::encode(5)).unwrap();
    harness.finish(first);
    let in_flight = harness.viewer.go_to_page(3).unwrap();
    assert_eq!(harness.loader.current().map(|handle| handle.page_count()), Some(5));

    assert_eq!(harness.open("cat.png", Vec::new()), None);
    assert!(harness.loader.current().is_none());
    assert!(matches!(harness.viewer.phase(), Phase::Unsupported { file_name } if file_name == "cat.png"));
    assert_eq!(
        harness.loader.render(&in_flight),
        Err(RenderFailure::DocumentReleased {
            document: in_flight.document
        })
    );
}

#[test]
fn corrupt_pdf_is_reported_unsupported() {
    let mut harness = Harness::new();
    assert_eq!(harness.open("junk.pdf", b"not a pdf".to_vec()), None);
    assert!(matches!(harness.viewer.phase(), Phase::Unsupported { file_name } if file_name == "junk.pdf"));
}
