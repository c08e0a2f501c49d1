// One open/attached lightbox instance. Fields change only through the named
// transitions below; the controller pairs each transition with the matching
// boundary directive.

use serde::Serialize;

use crate::types::{MediaTime, PlayerStatus};

/// State of the single player session owned by a controller.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSession {
    pub status: PlayerStatus,
    /// Playback has started at least once since the last (re)attach.
    pub activated: bool,
    pub muted: bool,
    pub fullscreen: bool,
    /// The attached media URL, empty while detached.
    pub current_source: String,
    /// A play request is queued ahead of attach/readiness completion.
    pub pending_play: bool,
    pub is_attached: bool,
    /// Autoplay armed: issue a play request when the next attach turns ready.
    pub auto_start_on_ready: bool,
    /// The last pause came from the user, not from scrubbing or teardown.
    pub manual_pause: bool,
    pub duration: MediaTime,
    pub current_time: MediaTime,
    /// Any playback progress happened since the last attach.
    pub has_played: bool,
}

impl PlayerSession {
    pub fn new(muted: bool) -> Self {
        PlayerSession {
            status: PlayerStatus::Idle,
            activated: false,
            muted,
            fullscreen: false,
            current_source: String::new(),
            pending_play: false,
            is_attached: false,
            auto_start_on_ready: false,
            manual_pause: false,
            duration: MediaTime::from_secs(f64::NAN),
            current_time: MediaTime::from_secs(0.0),
            has_played: false,
        }
    }

    /// Whether `src` is already the attached source. An empty current source
    /// never matches, so a detached session always takes the attach path.
    pub fn same_source(&self, src: &str) -> bool {
        !self.current_source.is_empty() && self.current_source == src && self.is_attached
    }

    /// Drop the bound source ahead of attaching a different one. Status is
    /// left alone; the controller resets it alongside the attribute write.
    pub fn detach(&mut self) {
        self.current_source.clear();
        self.is_attached = false;
        self.pending_play = false;
        self.auto_start_on_ready = false;
        self.duration = MediaTime::from_secs(f64::NAN);
        self.current_time = MediaTime::from_secs(0.0);
        self.has_played = false;
    }

    /// Record the new binding. The attach itself is a host directive.
    pub fn begin_attach(&mut self, src: String) {
        self.current_source = src;
        self.is_attached = true;
    }

    /// Queue a play request (user toggle or autoplay readiness).
    pub fn arm_play(&mut self) {
        self.pending_play = true;
        self.manual_pause = false;
    }

    /// The underlying `playing` event arrived; the queued request landed.
    pub fn settle_play(&mut self) {
        self.pending_play = false;
    }

    pub fn note_progress(&mut self, current_time: f64) {
        self.current_time = MediaTime::from_secs(current_time);
        if current_time > 0.0 {
            self.has_played = true;
        }
    }

    /// Status to land on when the lightbox closes: `paused` keeps the resume
    /// affordance visible once any progress happened, otherwise back to idle.
    pub fn close_status(&self) -> PlayerStatus {
        if self.has_played || self.current_time.as_secs() > 0.0 {
            PlayerStatus::Paused
        } else {
            PlayerStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_idle_and_detached() {
        let session = PlayerSession::new(true);
        assert_eq!(session.status, PlayerStatus::Idle);
        assert!(session.muted);
        assert!(!session.is_attached);
        assert!(!session.duration.is_usable());
        assert!(!session.same_source(""));
    }

    #[test]
    fn same_source_requires_attachment() {
        let mut session = PlayerSession::new(false);
        assert!(!session.same_source("https://a/master.m3u8"));
        session.begin_attach("https://a/master.m3u8".into());
        assert!(session.same_source("https://a/master.m3u8"));
        assert!(!session.same_source("https://b/master.m3u8"));
        session.detach();
        assert!(!session.same_source("https://a/master.m3u8"));
    }

    #[test]
    fn detach_clears_progress_and_pending_play() {
        let mut session = PlayerSession::new(false);
        session.begin_attach("https://a/master.m3u8".into());
        session.arm_play();
        session.note_progress(12.0);
        session.detach();
        assert!(!session.pending_play);
        assert!(!session.has_played);
        assert_eq!(session.current_time.as_secs(), 0.0);
        assert!(session.current_source.is_empty());
    }

    #[test]
    fn close_status_follows_progress() {
        let mut session = PlayerSession::new(false);
        assert_eq!(session.close_status(), PlayerStatus::Idle);
        session.note_progress(0.0);
        assert_eq!(session.close_status(), PlayerStatus::Idle);
        session.note_progress(3.2);
        assert_eq!(session.close_status(), PlayerStatus::Paused);
        // Progress sticks even if the element rewound to zero afterwards.
        session.note_progress(0.0);
        assert_eq!(session.close_status(), PlayerStatus::Paused);
    }
}
