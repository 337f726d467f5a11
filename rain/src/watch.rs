//! Exit detection for screensaver sessions.
//!
//! A session is `Active` until the first qualifying user activity, after
//! which it is `Terminating` for good. Pointer movement is sampled on a fixed
//! cadence and compared against the previous sample only, so slow drift never
//! accumulates into an exit.

use std::time::Duration;

/// How often the pointer position is sampled.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Per-axis displacement that must be exceeded between two samples.
pub const MOVE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Terminating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitTrigger {
    KeyPress,
    PointerPress,
    FocusLost,
    WindowClosed,
    PointerMoved { dx: f64, dy: f64 },
}

impl std::fmt::Display for ExitTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitTrigger::KeyPress => f.write_str("key press"),
            ExitTrigger::PointerPress => f.write_str("pointer press"),
            ExitTrigger::FocusLost => f.write_str("focus lost"),
            ExitTrigger::WindowClosed => f.write_str("window closed"),
            ExitTrigger::PointerMoved { dx, dy } => {
                write!(f, "pointer moved ({:.1}, {:.1})", dx, dy)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug)]
pub struct ExitWatch {
    state: SessionState,
    threshold: f64,
    last_sample: Option<PointerPosition>,
    trigger: Option<ExitTrigger>,
}

impl Default for ExitWatch {
    fn default() -> Self {
        Self::new(MOVE_THRESHOLD)
    }
}

impl ExitWatch {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: SessionState::Active,
            threshold,
            last_sample: None,
            trigger: None,
        }
    }

    /// Start from a known pointer position instead of the first sample.
    pub fn with_baseline(mut self, position: PointerPosition) -> Self {
        self.last_sample = Some(position);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// What ended the session, once it has ended.
    pub fn trigger(&self) -> Option<ExitTrigger> {
        self.trigger
    }

    pub fn last_sample(&self) -> Option<PointerPosition> {
        self.last_sample
    }

    /// Compare a polled position with the previous one. The stored sample is
    /// replaced whether or not the move qualifies.
    ///
    /// Returns the trigger only on the transition into `Terminating`.
    pub fn sample_pointer(&mut self, position: PointerPosition) -> Option<ExitTrigger> {
        if !self.is_active() {
            return None;
        }

        let previous = self.last_sample.replace(position)?;
        let dx = position.x - previous.x;
        let dy = position.y - previous.y;
        log::trace!("Pointer sample ({}, {}), delta ({}, {})", position.x, position.y, dx, dy);

        if dx.abs() > self.threshold || dy.abs() > self.threshold {
            self.terminate(ExitTrigger::PointerMoved { dx, dy })
        } else {
            None
        }
    }

    pub fn key_pressed(&mut self) -> Option<ExitTrigger> {
        self.terminate(ExitTrigger::KeyPress)
    }

    pub fn pointer_pressed(&mut self) -> Option<ExitTrigger> {
        self.terminate(ExitTrigger::PointerPress)
    }

    pub fn focus_lost(&mut self) -> Option<ExitTrigger> {
        self.terminate(ExitTrigger::FocusLost)
    }

    pub fn window_closed(&mut self) -> Option<ExitTrigger> {
        self.terminate(ExitTrigger::WindowClosed)
    }

    fn terminate(&mut self, trigger: ExitTrigger) -> Option<ExitTrigger> {
        if !self.is_active() {
            return None;
        }
        self.state = SessionState::Terminating;
        self.trigger = Some(trigger);
        Some(trigger)
    }
}

/// Tracks input focus across the windows of one session.
///
/// Focus moving from one session window to another arrives as a loss on one
/// window and a gain on the other within the same event batch, so a loss only
/// counts if no window holds focus once the batch is settled. Nothing counts
/// until the tracker is armed, which happens after every window is shown.
#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Vec<bool>,
    armed: bool,
    pending_loss: bool,
}

impl FocusTracker {
    pub fn new(windows: usize) -> Self {
        Self {
            focused: vec![false; windows],
            armed: false,
            pending_loss: false,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_focused(&mut self, index: usize, focused: bool) {
        if let Some(slot) = self.focused.get_mut(index) {
            if *slot && !focused {
                self.pending_loss = true;
            }
            *slot = focused;
        }
    }

    pub fn any_focused(&self) -> bool {
        self.focused.iter().any(|&focused| focused)
    }

    /// Call at the end of an event batch. True when focus has left the
    /// session entirely.
    pub fn settle(&mut self) -> bool {
        let lost = self.armed && self.pending_loss && !self.any_focused();
        self.pending_loss = false;
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn watch_at(x: f64, y: f64) -> ExitWatch {
        ExitWatch::default().with_baseline(PointerPosition::new(x, y))
    }

    #[test]
    fn test_large_move_terminates() {
        let mut watch = watch_at(100.0, 100.0);
        let trigger = watch.sample_pointer(PointerPosition::new(106.0, 100.0));

        match trigger {
            Some(ExitTrigger::PointerMoved { dx, dy }) => {
                assert_relative_eq!(dx, 6.0);
                assert_relative_eq!(dy, 0.0);
            }
            other => panic!("unexpected trigger {:?}", other),
        }
        assert_eq!(watch.state(), SessionState::Terminating);
    }

    #[test]
    fn test_vertical_move_terminates() {
        let mut watch = watch_at(0.0, 0.0);
        assert!(watch.sample_pointer(PointerPosition::new(0.0, -6.0)).is_some());
    }

    #[test]
    fn test_small_move_does_not_terminate() {
        let mut watch = watch_at(100.0, 100.0);
        assert_eq!(watch.sample_pointer(PointerPosition::new(104.0, 96.0)), None);
        assert!(watch.is_active());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut watch = watch_at(0.0, 0.0);
        assert_eq!(watch.sample_pointer(PointerPosition::new(5.0, 5.0)), None);
        assert!(watch.is_active());
    }

    #[test]
    fn test_drift_does_not_accumulate() {
        let mut watch = watch_at(0.0, 0.0);
        for step in 1..=5 {
            let x = 4.0 * step as f64;
            assert_eq!(watch.sample_pointer(PointerPosition::new(x, 0.0)), None);
        }
        assert!(watch.is_active());
        let last = watch.last_sample().unwrap();
        assert_relative_eq!(last.x, 20.0);
    }

    #[test]
    fn test_first_sample_sets_baseline() {
        let mut watch = ExitWatch::default();
        assert_eq!(watch.sample_pointer(PointerPosition::new(500.0, 500.0)), None);
        assert!(watch.is_active());
        assert!(watch.sample_pointer(PointerPosition::new(510.0, 500.0)).is_some());
    }

    #[test]
    fn test_key_press_terminates_once() {
        let mut watch = watch_at(0.0, 0.0);
        assert_eq!(watch.key_pressed(), Some(ExitTrigger::KeyPress));
        assert_eq!(watch.key_pressed(), None);
        assert_eq!(watch.focus_lost(), None);
        assert_eq!(watch.sample_pointer(PointerPosition::new(100.0, 100.0)), None);
        assert_eq!(watch.trigger(), Some(ExitTrigger::KeyPress));
    }

    #[test]
    fn test_focus_loss_terminates_once() {
        let mut watch = ExitWatch::default();
        assert_eq!(watch.focus_lost(), Some(ExitTrigger::FocusLost));
        assert_eq!(watch.focus_lost(), None);
        assert_eq!(watch.pointer_pressed(), None);
        assert_eq!(watch.state(), SessionState::Terminating);
    }

    #[test]
    fn test_pointer_press_terminates() {
        let mut watch = ExitWatch::default();
        assert_eq!(watch.pointer_pressed(), Some(ExitTrigger::PointerPress));
    }

    #[test]
    fn test_samples_ignored_after_termination() {
        let mut watch = watch_at(0.0, 0.0);
        watch.key_pressed();
        watch.sample_pointer(PointerPosition::new(50.0, 50.0));
        let last = watch.last_sample().unwrap();
        assert_relative_eq!(last.x, 0.0);
    }

    #[test]
    fn test_window_closed_terminates() {
        let mut watch = ExitWatch::default();
        assert_eq!(watch.window_closed(), Some(ExitTrigger::WindowClosed));
        assert_eq!(watch.window_closed(), None);
    }

    #[test]
    fn test_focus_moving_between_windows_is_not_a_loss() {
        let mut focus = FocusTracker::new(2);
        focus.arm();
        focus.set_focused(0, true);
        assert!(!focus.settle());

        focus.set_focused(0, false);
        focus.set_focused(1, true);
        assert!(!focus.settle());
        assert!(focus.any_focused());
    }

    #[test]
    fn test_focus_leaving_session_is_a_loss() {
        let mut focus = FocusTracker::new(2);
        focus.arm();
        focus.set_focused(1, true);
        focus.settle();

        focus.set_focused(1, false);
        assert!(focus.settle());
        // Reported once per loss.
        assert!(!focus.settle());
    }

    #[test]
    fn test_focus_ignored_until_armed() {
        let mut focus = FocusTracker::new(1);
        focus.set_focused(0, true);
        focus.set_focused(0, false);
        assert!(!focus.settle());

        focus.arm();
        assert!(!focus.settle());
    }

    #[test]
    fn test_focus_out_of_range_index() {
        let mut focus = FocusTracker::new(1);
        focus.arm();
        focus.set_focused(3, true);
        assert!(!focus.any_focused());
    }
}
