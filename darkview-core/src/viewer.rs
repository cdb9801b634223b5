//! The viewer state machine.
//!
//! Every command is a synchronous state update. Commands that change what the
//! page raster should look like return a [`RenderTicket`]; the caller renders it
//! asynchronously and hands the outcome back through [`Viewer::commit`], which
//! only accepts the most recently issued ticket.

use crate::config::ViewerConfig;
use crate::error::{ConfigError, RenderFailure, ViewerError};
use crate::interaction::{Interaction, Point};
use crate::media::MediaType;
use crate::raster::Raster;
use crate::request::{DocumentId, DocumentInfo, RenderTicket, RequestId};
use crate::view::{PanLimits, PanOffset, ViewState};
use tracing::{debug, error, info, warn};

/// A loaded document together with its view and visible raster
#[derive(Debug)]
pub struct Session {
    document: DocumentId,
    file_name: String,
    view: ViewState,
    surface: Option<Raster>,
    latest: Option<RenderTicket>,
    last_failure: Option<RenderFailure>,
}

impl Session {
    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Last committed raster, unless the display has taken it
    pub fn surface(&self) -> Option<&Raster> {
        self.surface.as_ref()
    }

    /// Most recently issued render request
    pub fn latest_ticket(&self) -> Option<&RenderTicket> {
        self.latest.as_ref()
    }

    pub fn last_failure(&self) -> Option<&RenderFailure> {
        self.last_failure.as_ref()
    }
}

#[derive(Debug, Default)]
pub enum Phase {
    /// Nothing selected yet
    #[default]
    Empty,
    Loading {
        document: DocumentId,
        file_name: String,
    },
    Ready(Session),
    Unsupported {
        file_name: String,
    },
    /// The rendering engine could not start. Terminal.
    EngineUnavailable {
        reason: String,
    },
}

/// Result of handing a finished render back to the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed,
    /// Superseded by a newer request or another document
    Stale,
    /// The render failed; the previous raster stays visible
    Failed(RenderFailure),
}

/// What the caller should do with a newly selected file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Hand the file's bytes to the engine under this id
    Load(DocumentId),
    /// The file will not be shown; drop whatever document the engine holds
    Release,
    /// Nothing changed
    Ignored,
}

impl Selection {
    pub fn document(self) -> Option<DocumentId> {
        match self {
            Selection::Load(document) => Some(document),
            Selection::Release | Selection::Ignored => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Viewer {
    config: ViewerConfig,
    phase: Phase,
    jump_input: String,
    interaction: Interaction,
    pan_limits: Option<PanLimits>,
    next_document: u64,
    next_request: u64,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Ready(session) => Some(session),
            _ => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.phase {
            Phase::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&ViewState> {
        self.session().map(Session::view)
    }

    pub fn surface(&self) -> Option<&Raster> {
        self.session().and_then(Session::surface)
    }

    /// Move the committed raster out to the display so only one copy of the
    /// pixels stays alive. Failed renders after this leave the display's copy
    /// as the visible page.
    pub fn take_surface(&mut self) -> Option<Raster> {
        self.session_mut().and_then(|session| session.surface.take())
    }

    pub fn jump_input(&self) -> &str {
        &self.jump_input
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The rendering engine failed to initialize. No document can be shown
    /// for the rest of the process.
    pub fn engine_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        error!("Rendering engine unavailable: {reason}");
        self.reset_transient();
        self.phase = Phase::EngineUnavailable { reason };
    }

    /// A file was selected. Discards all state of the previous file, including
    /// the engine's document unless the new file goes to the engine in its place.
    pub fn open(&mut self, file_name: impl Into<String>, media_type: &MediaType) -> Selection {
        if matches!(self.phase, Phase::EngineUnavailable { .. }) {
            debug!("Ignoring file selection, engine unavailable");
            return Selection::Ignored;
        }

        let file_name = file_name.into();
        self.reset_transient();

        if !media_type.is_pdf() {
            info!("{file_name} has unsupported type {media_type}");
            self.phase = Phase::Unsupported { file_name };
            return Selection::Release;
        }

        self.next_document += 1;
        let document = DocumentId(self.next_document);
        debug!("Loading {file_name} as {document}");
        self.phase = Phase::Loading {
            document,
            file_name,
        };
        Selection::Load(document)
    }

    /// A load started by [`Viewer::open`] finished
    pub fn document_loaded(
        &mut self,
        document: DocumentId,
        result: Result<DocumentInfo, ViewerError>,
    ) -> Option<RenderTicket> {
        let file_name = match &mut self.phase {
            Phase::Loading {
                document: loading,
                file_name,
            } if *loading == document => std::mem::take(file_name),
            _ => {
                debug!("Ignoring load result for superseded {document}");
                return None;
            }
        };

        match result {
            Ok(info) => {
                info!("{file_name}: {} pages", info.page_count);
                self.phase = Phase::Ready(Session {
                    document,
                    file_name,
                    view: ViewState::new(info.page_count, self.config.default_scale),
                    surface: None,
                    latest: None,
                    last_failure: None,
                });
                self.request_render()
            }
            Err(ViewerError::EngineUnavailable(reason)) => {
                self.engine_failed(reason);
                None
            }
            Err(err) => {
                warn!("Cannot display {file_name}: {err}");
                self.phase = Phase::Unsupported { file_name };
                None
            }
        }
    }

    /// Issue a ticket for the current view state
    fn request_render(&mut self) -> Option<RenderTicket> {
        let Phase::Ready(session) = &mut self.phase else {
            return None;
        };
        self.next_request += 1;
        let ticket = RenderTicket {
            id: RequestId(self.next_request),
            document: session.document,
            page: session.view.current_page(),
            scale: session.view.scale(),
            dark_mode: session.view.dark_mode(),
        };
        session.latest = Some(ticket);
        Some(ticket)
    }

    pub fn go_to_page(&mut self, page: usize) -> Option<RenderTicket> {
        let session = self.session_mut()?;
        if let Err(err) = session.view.set_page(page) {
            debug!("Ignoring page change: {err}");
            return None;
        }
        self.request_render()
    }

    pub fn next_page(&mut self) -> Option<RenderTicket> {
        let page = self.view()?.current_page() + 1;
        self.go_to_page(page)
    }

    pub fn prev_page(&mut self) -> Option<RenderTicket> {
        let page = self.view()?.current_page().checked_sub(1)?;
        self.go_to_page(page)
    }

    /// Change the scale by `delta`, clamped to the configured range. Renders
    /// only if the scale actually changed.
    pub fn set_scale(&mut self, delta: f32) -> Option<RenderTicket> {
        let config = self.config.clone();
        let session = self.session_mut()?;
        if !session.view.adjust_scale(delta, &config) {
            debug!("Scale already at {}", session.view.scale());
            return None;
        }
        self.request_render()
    }

    pub fn zoom_in(&mut self) -> Option<RenderTicket> {
        self.set_scale(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Option<RenderTicket> {
        self.set_scale(-self.config.zoom_step)
    }

    /// Flip dark mode. The page is rendered again from the document so the
    /// inversion is applied to a fresh raster exactly once.
    pub fn toggle_dark_mode(&mut self) -> Option<RenderTicket> {
        self.session_mut()?.view.toggle_dark_mode();
        self.request_render()
    }

    pub fn set_jump_input(&mut self, text: impl Into<String>) {
        self.jump_input = text.into();
    }

    /// Jump to the page typed into the jump field. The field is cleared
    /// whether or not the input was usable.
    pub fn confirm_jump(&mut self) -> Option<RenderTicket> {
        let input = std::mem::take(&mut self.jump_input);
        match self.parse_jump(&input) {
            Ok(page) => self.go_to_page(page),
            Err(err) => {
                debug!("Discarding jump: {err}");
                None
            }
        }
    }

    /// Reads the leading digits, so `"3.5"` is page 3 and `"2e1"` page 2
    fn parse_jump(&self, input: &str) -> Result<usize, ViewerError> {
        let page_count = self.view().map_or(0, ViewState::page_count);
        let trimmed = input.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .map_or(unsigned, |end| &unsigned[..end]);
        digits
            .parse::<usize>()
            .ok()
            .filter(|page| (1..=page_count).contains(page))
            .ok_or_else(|| ViewerError::InvalidJumpInput {
                input: input.to_string(),
            })
    }

    /// Accept a finished render if it is still the latest request
    pub fn commit(&mut self, ticket: RenderTicket, result: Result<Raster, RenderFailure>) -> CommitOutcome {
        let Some(session) = self.session_mut() else {
            debug!("Discarding {:?}, no document", ticket.id);
            return CommitOutcome::Stale;
        };
        if session.latest != Some(ticket) {
            debug!("Discarding stale {:?} for page {}", ticket.id, ticket.page);
            return CommitOutcome::Stale;
        }

        match result {
            Ok(raster) => {
                session.surface = Some(raster);
                session.last_failure = None;
                CommitOutcome::Committed
            }
            Err(failure) => {
                warn!("Keeping previous page image: {failure}");
                session.last_failure = Some(failure.clone());
                CommitOutcome::Failed(failure)
            }
        }
    }

    pub fn pointer_pressed(&mut self) {
        if self.session().is_some() && !self.interaction.press() {
            debug!("Pointer position unknown, drag starts at the next move");
        }
    }

    pub fn pointer_pressed_at(&mut self, at: Point) {
        if self.session().is_some() {
            self.interaction.press_at(at);
        }
    }

    /// Returns the new pan offset when a drag moved the content
    pub fn pointer_moved(&mut self, at: Point) -> Option<PanOffset> {
        let delta = self.interaction.moved(at)?;
        let limits = self.pan_limits;
        let session = self.session_mut()?;
        session.view.pan_by(delta, limits);
        Some(session.view.pan())
    }

    pub fn pointer_released(&mut self) {
        self.interaction.release();
    }

    pub fn pointer_left(&mut self) {
        self.interaction.leave();
    }

    /// The surface scrolled on its own (wheel, scrollbars) or reported its extent
    pub fn scrolled(&mut self, offset: PanOffset, limits: PanLimits) {
        self.pan_limits = Some(limits);
        if let Some(session) = self.session_mut() {
            session.view.set_pan(offset, Some(limits));
        }
    }

    fn reset_transient(&mut self) {
        self.jump_input.clear();
        self.interaction = Interaction::default();
        self.pan_limits = None;
    }
}
