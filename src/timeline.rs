// Timeline scrubbing and progress-bar math. While a drag is live the engine
// previews continuously but commits actual seeks through a timestamp gate,
// at most one per throttle window; the release always commits.

use crate::types::MediaTime;

/// Horizontal extent of the timeline element, captured at drag start so
/// pointer moves don't re-measure the DOM.
#[derive(Debug, Clone, Copy)]
struct TimelineRect {
    left: f64,
    width: f64,
}

/// What a pointer-down/move produced: preview values for the visuals plus an
/// optional committed seek.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubUpdate {
    /// Pointer position as a fraction of the timeline, clamped to [0, 1].
    pub fraction: f64,
    /// The media time the fraction points at.
    pub preview_time: f64,
    /// A seek to commit now, if the throttle window has passed.
    pub commit: Option<f64>,
}

/// Drag release: the final time to commit and whether to resume playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubFinish {
    pub target_time: f64,
    pub resume: bool,
}

/// Scrub drag state machine. One per controller.
#[derive(Debug)]
pub struct ScrubDrag {
    throttle_ms: f64,
    dragging: bool,
    was_playing: bool,
    target_time: f64,
    last_seek_ms: Option<f64>,
    rect: Option<TimelineRect>,
}

impl ScrubDrag {
    pub fn new(throttle_ms: f64) -> Self {
        ScrubDrag {
            throttle_ms,
            dragging: false,
            was_playing: false,
            target_time: 0.0,
            last_seek_ms: None,
            rect: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Start a drag. Returns `None` when the duration is unusable (nothing
    /// to seek in). `playing` is remembered for the resume decision.
    pub fn begin(
        &mut self,
        x: f64,
        timeline_left: f64,
        timeline_width: f64,
        now_ms: f64,
        duration: MediaTime,
        playing: bool,
    ) -> Option<ScrubUpdate> {
        if !duration.is_usable() {
            return None;
        }
        self.dragging = true;
        self.was_playing = playing;
        self.last_seek_ms = None;
        self.rect = Some(TimelineRect {
            left: timeline_left,
            width: timeline_width,
        });
        Some(self.update(x, now_ms, duration))
    }

    /// Pointer moved during a drag.
    pub fn move_to(&mut self, x: f64, now_ms: f64, duration: MediaTime) -> Option<ScrubUpdate> {
        if !self.dragging || !duration.is_usable() {
            return None;
        }
        Some(self.update(x, now_ms, duration))
    }

    /// Pointer released. Always commits the final target; resumes only if
    /// playback was live when the drag started.
    pub fn finish(&mut self) -> Option<ScrubFinish> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.rect = None;
        Some(ScrubFinish {
            target_time: self.target_time,
            resume: self.was_playing,
        })
    }

    fn update(&mut self, x: f64, now_ms: f64, duration: MediaTime) -> ScrubUpdate {
        let fraction = self.fraction_from_x(x);
        self.target_time = fraction * duration.as_secs();
        let commit = if self.gate_open(now_ms) {
            self.last_seek_ms = Some(now_ms);
            Some(self.target_time)
        } else {
            None
        };
        ScrubUpdate {
            fraction,
            preview_time: self.target_time,
            commit,
        }
    }

    // The first seek of a drag always commits; later ones wait out the window.
    fn gate_open(&self, now_ms: f64) -> bool {
        match self.last_seek_ms {
            None => true,
            Some(last) => now_ms - last >= self.throttle_ms,
        }
    }

    fn fraction_from_x(&self, x: f64) -> f64 {
        let rect = match self.rect {
            Some(r) if r.width > 0.0 => r,
            _ => return 0.0,
        };
        ((x - rect.left) / rect.width).clamp(0.0, 1.0)
    }
}

/// Played portion of the media as a percentage, unclamped (the bar transform
/// tolerates overshoot; the handle gets the clamped value).
pub fn played_percent(current: MediaTime, duration: MediaTime) -> Option<f64> {
    if !duration.is_usable() {
        return None;
    }
    Some(current.as_secs() / duration.as_secs() * 100.0)
}

/// Buffered-range end as a percentage of the duration.
pub fn buffered_percent(buffered_end: f64, duration: MediaTime) -> Option<f64> {
    if !duration.is_usable() || !buffered_end.is_finite() {
        return None;
    }
    Some(buffered_end / duration.as_secs() * 100.0)
}

pub fn clamp_percent(p: f64) -> f64 {
    p.clamp(0.0, 100.0)
}
