//! Render request identifiers and parameters

use std::fmt;

/// Identifies one loaded file. A new id is minted for every file selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document #{}", self.0)
    }
}

/// Unique identifier for render requests, increasing for the life of the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Everything needed to produce one raster, and to decide later whether that
/// raster is still wanted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTicket {
    pub id: RequestId,
    pub document: DocumentId,
    /// One-based page number
    pub page: usize,
    pub scale: f32,
    pub dark_mode: bool,
}

/// Returned by a successful load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentInfo {
    pub document: DocumentId,
    pub page_count: usize,
}
