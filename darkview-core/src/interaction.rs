//! Pointer drag tracking for panning the page surface

/// Pointer position in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pointer movement between two observed positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Drag {
    #[default]
    Idle,
    Dragging {
        origin: Point,
        last: Point,
    },
}

/// Drag state plus the last known pointer position. The surface reports
/// presses without a position, so a press starts dragging wherever the
/// pointer was last seen, or at the first move after it if it was never seen.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: Drag,
    hover: Option<Point>,
    pending_press: bool,
}

impl Interaction {
    pub fn drag(&self) -> Drag {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, Drag::Dragging { .. })
    }

    /// Start dragging at the hover position. Returns false if the pointer
    /// has not been seen over the surface yet; the drag then starts at the
    /// next reported position.
    pub fn press(&mut self) -> bool {
        match self.hover {
            Some(at) => {
                self.press_at(at);
                true
            }
            None => {
                self.pending_press = true;
                false
            }
        }
    }

    pub fn press_at(&mut self, at: Point) {
        self.hover = Some(at);
        self.pending_press = false;
        self.drag = Drag::Dragging { origin: at, last: at };
    }

    /// Record a pointer move; yields the movement since the last observed
    /// position while dragging.
    pub fn moved(&mut self, at: Point) -> Option<Delta> {
        if self.pending_press {
            self.press_at(at);
            return None;
        }
        self.hover = Some(at);
        match &mut self.drag {
            Drag::Idle => None,
            Drag::Dragging { last, .. } => {
                let delta = Delta {
                    dx: at.x - last.x,
                    dy: at.y - last.y,
                };
                *last = at;
                Some(delta)
            }
        }
    }

    pub fn release(&mut self) {
        self.drag = Drag::Idle;
        self.pending_press = false;
    }

    /// Pointer left the surface: stop dragging and forget the position
    pub fn leave(&mut self) {
        self.release();
        self.hover = None;
    }
}
