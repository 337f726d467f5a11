use crate::watch::PointerPosition;

/// A physical monitor, as reported when the session starts.
///
/// Coordinates are in the desktop's physical pixel space. The list is taken
/// once and never refreshed; hot-plugging is not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySurface {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplaySurface {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64 && y >= self.y as f64 && x < self.right() as f64 && y < self.bottom() as f64
    }

    pub fn overlaps(&self, other: &DisplaySurface) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }
}

/// Geometry of one screensaver window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    /// Position of the display in the enumeration.
    pub index: usize,
    pub title: String,
    pub bounds: DisplaySurface,
}

impl WindowPlan {
    /// Convert a window-relative pointer position in physical pixels to
    /// desktop coordinates in logical points, so movement thresholds mean the
    /// same distance on high-DPI displays.
    pub fn to_global(&self, x: f64, y: f64, scale_factor: f64) -> PointerPosition {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        PointerPosition::new(
            (self.bounds.x as f64 + x) / scale,
            (self.bounds.y as f64 + y) / scale,
        )
    }
}

/// One window per display, each exactly covering its display.
pub fn plan_screensaver_windows(displays: &[DisplaySurface]) -> Vec<WindowPlan> {
    displays
        .iter()
        .enumerate()
        .map(|(index, display)| WindowPlan {
            index,
            title: format!("Digital Rain {}", index),
            bounds: *display,
        })
        .collect()
}
