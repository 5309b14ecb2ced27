//! Window-system independent pieces of the preview event loop (made by FontLab https://www.fontlab.com/)

use std::time::{Duration, Instant};

use crate::layout::Rect;

/// How long the loop waits for an event, and the minimum gap between paints.
pub const REPAINT_TIMEOUT: Duration = Duration::from_millis(100);

/// Dirty flag plus the time of the last paint.
#[derive(Debug, Clone)]
pub struct RepaintGate {
    dirty: bool,
    last_paint: Option<Instant>,
    interval: Duration,
}

impl Default for RepaintGate {
    fn default() -> Self {
        Self::new(REPAINT_TIMEOUT)
    }
}

impl RepaintGate {
    /// Starts dirty so the first opportunity paints.
    pub fn new(interval: Duration) -> Self {
        Self {
            dirty: true,
            last_paint: None,
            interval,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn should_paint(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_paint {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        }
    }

    pub fn painted(&mut self, now: Instant) {
        self.dirty = false;
        self.last_paint = Some(now);
    }

    /// Deadline for the next wait.
    pub fn next_wake(&self, now: Instant) -> Instant {
        now + self.interval
    }
}

/// What a pointer event did to the quit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitAction {
    None,
    Armed,
    Disarmed,
    Quit,
}

/// Press inside arms, release inside quits, release outside disarms.
#[derive(Debug, Clone, Default)]
pub struct QuitButton {
    bounds: Option<Rect>,
    armed: bool,
}

impl QuitButton {
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn hit(&self, x: i32, y: i32) -> bool {
        self.bounds.is_some_and(|b| b.contains(x, y))
    }

    pub fn press(&mut self, x: i32, y: i32) -> QuitAction {
        if self.hit(x, y) {
            self.armed = true;
            QuitAction::Armed
        } else {
            QuitAction::None
        }
    }

    pub fn release(&mut self, x: i32, y: i32) -> QuitAction {
        if self.hit(x, y) {
            QuitAction::Quit
        } else {
            let was_armed = std::mem::take(&mut self.armed);
            if was_armed {
                QuitAction::Disarmed
            } else {
                QuitAction::None
            }
        }
    }
}
