//! Core of the darkview document viewer: document loading through a pluggable
//! rendering engine, page rasterization, the dark-mode colour transform, and
//! the view state machine that keeps rendered output in step with page, zoom
//! and dark-mode changes.

pub mod config;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod loader;
pub mod media;
pub mod raster;
pub mod renderer;
pub mod request;
pub mod test_utils;
pub mod transform;
pub mod view;
pub mod viewer;

pub use config::ViewerConfig;
pub use engine::{DocumentEngine, EngineDocument, PageSize};
pub use error::{ConfigError, EngineError, RenderFailure, ViewerError};
pub use interaction::{Delta, Drag, Interaction, Point};
pub use loader::{DocumentHandle, DocumentLoader, PageRef};
pub use media::{MediaType, ACCEPTED_EXTENSIONS, PDF_MEDIA_TYPE};
pub use raster::Raster;
pub use request::{DocumentId, DocumentInfo, RenderTicket, RequestId};
pub use view::{PanLimits, PanOffset, ViewState};
pub use viewer::{CommitOutcome, Phase, Selection, Session, Viewer};
