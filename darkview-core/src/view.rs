use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::interaction::Delta;

/// Scroll displacement of the page surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

impl PanOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Largest pan offset the surface can scroll to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanLimits {
    pub max_x: f32,
    pub max_y: f32,
}

impl PanLimits {
    pub fn new(max_x: f32, max_y: f32) -> Self {
        Self {
            max_x: max_x.max(0.0),
            max_y: max_y.max(0.0),
        }
    }
}

/// Current view of a loaded document
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    current_page: usize,
    page_count: usize,
    scale: f32,
    dark_mode: bool,
    pan: PanOffset,
}

impl ViewState {
    pub fn new(page_count: usize, default_scale: f32) -> Self {
        Self {
            current_page: 1,
            page_count,
            scale: snap(default_scale),
            dark_mode: false,
            pan: PanOffset::ZERO,
        }
    }

    /// One-based
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_page < self.page_count
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.page_count)
    }

    /// Label of the dark-mode toggle: the mode it switches to
    pub fn dark_mode_toggle_label(&self) -> &'static str {
        if self.dark_mode {
            "Light"
        } else {
            "Dark"
        }
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), ViewerError> {
        if page == 0 || page > self.page_count {
            return Err(ViewerError::OutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        self.current_page = page;
        // Reset pan when changing pages
        self.pan = PanOffset::ZERO;
        Ok(())
    }

    /// Add `delta` to the scale, clamped to the configured range. Returns
    /// whether the scale changed.
    pub fn adjust_scale(&mut self, delta: f32, config: &ViewerConfig) -> bool {
        let scale = snap(self.scale + delta).clamp(config.min_scale, config.max_scale);
        let changed = scale != self.scale;
        self.scale = scale;
        changed
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Move the content with the pointer: the offset moves against `delta`
    pub fn pan_by(&mut self, delta: Delta, limits: Option<PanLimits>) {
        self.pan = clamp_pan(
            PanOffset::new(self.pan.x - delta.dx, self.pan.y - delta.dy),
            limits,
        );
    }

    pub fn set_pan(&mut self, pan: PanOffset, limits: Option<PanLimits>) {
        self.pan = clamp_pan(pan, limits);
    }
}

/// Round to hundredths so repeated steps land on exact values
fn snap(scale: f32) -> f32 {
    (scale * 100.0).round() / 100.0
}

fn clamp_pan(pan: PanOffset, limits: Option<PanLimits>) -> PanOffset {
    let (max_x, max_y) = limits.map_or((f32::INFINITY, f32::INFINITY), |l| (l.max_x, l.max_y));
    PanOffset::new(pan.x.clamp(0.0, max_x), pan.y.clamp(0.0, max_y))
}
