// The media player controller. Consumes host events, owns the single
// PlayerSession, and answers with directives the JS plumbing applies in
// order. Attribute directives are emitted only when the mirrored value
// actually changes.

use tracing::debug;

use crate::binder::SourceBinder;
use crate::hover::HoverTracker;
use crate::ratio::{Discovery, RatioTracker};
use crate::session::PlayerSession;
use crate::timecode::format_time;
use crate::timeline::{buffered_percent, clamp_percent, played_percent, ScrubDrag, ScrubUpdate};
use crate::types::{
    Directive, FullscreenApi, HoverVisibility, MediaTime, PlayerConfig, PlayerEvent, PlayerStatus,
};

/// An open request parked while the placeholder image settles.
#[derive(Debug)]
struct PendingOpen {
    src: String,
}

pub struct PlayerController {
    config: PlayerConfig,
    session: PlayerSession,
    binder: SourceBinder,
    scrub: ScrubDrag,
    hover: HoverTracker,
    ratio: RatioTracker,
    wrapper_active: bool,
    /// The rAF progress loop is live; it self-cancels when playback stops.
    frame_loop: bool,
    pending_open: Option<PendingOpen>,
    placeholder_src: String,
    placeholder_settled: bool,
    /// End of the last reported buffered range, so the bar can be recomputed
    /// when the duration changes after a `progress` event.
    buffered_end: Option<f64>,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        let session = PlayerSession::new(config.muted);
        let binder = SourceBinder::new(&config.capabilities);
        let scrub = ScrubDrag::new(config.seek_throttle_ms);
        let hover = HoverTracker::new(config.hover_hide_delay_ms);
        let ratio = RatioTracker::new(config.update_size);
        PlayerController {
            config,
            session,
            binder,
            scrub,
            hover,
            ratio,
            wrapper_active: false,
            frame_loop: false,
            pending_open: None,
            placeholder_src: String::new(),
            placeholder_settled: false,
            buffered_end: None,
        }
    }

    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    /// Initial boundary writes so the styling hooks exist before the first
    /// interaction.
    pub fn bootstrap(&mut self) -> Vec<Directive> {
        vec![
            Directive::SetMuted {
                muted: self.session.muted,
            },
            Directive::SetActivated { activated: false },
            Directive::SetStatus {
                status: PlayerStatus::Idle,
            },
        ]
    }

    pub fn handle_event(&mut self, event: PlayerEvent) -> Vec<Directive> {
        let mut out = Vec::new();
        match event {
            PlayerEvent::Open { src, placeholder } => self.on_open(&mut out, src, placeholder),
            PlayerEvent::Close => self.on_close(&mut out),
            PlayerEvent::TogglePlay => self.on_toggle_play(&mut out),
            PlayerEvent::ToggleMute => self.on_toggle_mute(&mut out),
            PlayerEvent::ToggleFullscreen => self.on_toggle_fullscreen(&mut out),
            PlayerEvent::PlaceholderSettled => self.on_placeholder_settled(&mut out),

            PlayerEvent::AttachReady { generation } => self.on_attach_ready(&mut out, generation),
            PlayerEvent::LevelsUpdated { levels } => self.ratio.note_levels(&levels),
            PlayerEvent::LevelDetails { total_duration } => {
                if total_duration.is_finite() && total_duration > 0.0 {
                    out.push(Directive::SetDurationText {
                        text: format_time(total_duration),
                    });
                }
            }
            PlayerEvent::ManifestLoaded { generation, body } => {
                self.on_manifest_loaded(&mut out, generation, &body)
            }
            PlayerEvent::ManifestFailed { generation } => {
                debug!(generation, "manifest fetch failed, keeping current ratio");
            }

            PlayerEvent::LoadedMetadata {
                duration,
                width,
                height,
            } => self.on_loaded_metadata(&mut out, duration, width, height),
            PlayerEvent::DurationChange { duration } => {
                self.session.duration = MediaTime::from_secs(duration);
                self.emit_time_texts(&mut out);
                self.emit_buffered(&mut out);
            }
            PlayerEvent::TimeUpdate { current_time } => {
                self.session.note_progress(current_time);
                self.emit_time_texts(&mut out);
            }
            PlayerEvent::Play => self.on_play(&mut out),
            PlayerEvent::Playing => self.on_playing(&mut out),
            PlayerEvent::Pause => self.on_pause(&mut out),
            PlayerEvent::Waiting => self.set_status(&mut out, PlayerStatus::Loading),
            PlayerEvent::CanPlay => self.ready_if_idle(&mut out),
            PlayerEvent::Ended => self.on_ended(&mut out),
            PlayerEvent::BufferedProgress { buffered_end } => {
                self.buffered_end = Some(buffered_end);
                self.emit_buffered(&mut out);
            }

            PlayerEvent::AnimationFrame { current_time } => {
                self.on_animation_frame(&mut out, current_time)
            }
            PlayerEvent::HoverTimerFired { now_ms } => {
                let outcome = self.hover.timer_fired(now_ms);
                if outcome.became_idle {
                    out.push(Directive::SetHover {
                        state: HoverVisibility::Idle,
                    });
                }
                if let Some(delay_ms) = outcome.reschedule_ms {
                    out.push(Directive::ScheduleHoverTimer { delay_ms });
                }
            }

            PlayerEvent::PointerActivity { now_ms } => self.wake_controls(&mut out, now_ms),
            PlayerEvent::PointerLeave => {
                if self.hover.leave() {
                    out.push(Directive::SetHover {
                        state: HoverVisibility::Idle,
                    });
                }
            }
            PlayerEvent::ScrubStart {
                x,
                timeline_left,
                timeline_width,
                now_ms,
            } => self.on_scrub_start(&mut out, x, timeline_left, timeline_width, now_ms),
            PlayerEvent::ScrubMove { x, now_ms } => {
                if let Some(upd) = self.scrub.move_to(x, now_ms, self.session.duration) {
                    self.emit_scrub_preview(&mut out, upd);
                }
            }
            PlayerEvent::ScrubEnd => self.on_scrub_end(&mut out),

            PlayerEvent::ContainerResize { container } => {
                self.ratio.set_container(container);
                self.emit_clamp(&mut out);
            }
            PlayerEvent::FullscreenChanged { active, now_ms } => {
                self.set_fullscreen_state(&mut out, active);
                self.wake_controls(&mut out, now_ms);
            }
        }
        out
    }

    pub fn handle_batch(&mut self, events: Vec<PlayerEvent>) -> Vec<Directive> {
        let mut out = Vec::new();
        for event in events {
            out.extend(self.handle_event(event));
        }
        out
    }

    // ------------------------------------------------------------------
    // Open / close

    fn on_open(&mut self, out: &mut Vec<Directive>, src: String, placeholder: Option<String>) {
        if src.is_empty() {
            return;
        }
        if let Some(url) = placeholder.filter(|u| !u.is_empty()) {
            let needs_swap = self.placeholder_src != url;
            if needs_swap || !self.placeholder_settled {
                // Defer activation until the image's load/error fires so the
                // lightbox doesn't flash an old frame.
                self.pending_open = Some(PendingOpen { src });
                if needs_swap {
                    self.placeholder_src = url.clone();
                    self.placeholder_settled = false;
                }
                out.push(Directive::LoadPlaceholder { url });
                return;
            }
        }
        self.activate(out, src);
    }

    fn on_placeholder_settled(&mut self, out: &mut Vec<Directive>) {
        self.placeholder_settled = true;
        if let Some(pending) = self.pending_open.take() {
            self.activate(out, pending.src);
        }
    }

    fn activate(&mut self, out: &mut Vec<Directive>, src: String) {
        self.set_wrapper_active(out, true);
        self.emit_clamp(out);
        self.plan_on_open(out, src);
    }

    /// The open policy: same-source opens reuse the binding; anything else
    /// tears down and re-attaches under a fresh generation.
    fn plan_on_open(&mut self, out: &mut Vec<Directive>, src: String) {
        if self.session.same_source(&src) {
            debug!("open: same source, no re-attach");
            self.session.auto_start_on_ready = self.config.autoplay;
            if self.config.autoplay {
                self.request_play(out);
            } else {
                if self.session.status == PlayerStatus::Playing {
                    out.push(Directive::Pause);
                }
                self.set_status(out, PlayerStatus::Paused);
            }
            return;
        }

        debug!(%src, "open: attaching new source");
        if self.session.status == PlayerStatus::Playing {
            out.push(Directive::Pause);
        }
        if let Some(teardown) = self.binder.teardown() {
            out.push(teardown);
        }
        self.session.detach();
        self.ratio.reset_for_attach();
        self.buffered_end = None;
        out.push(Directive::SetDurationText {
            text: "00:00".to_string(),
        });
        self.set_activated(out, false);
        self.set_status(out, PlayerStatus::Idle);

        out.push(self.binder.begin(&src));
        self.session.begin_attach(src);
        self.session.auto_start_on_ready = self.config.autoplay;
        self.session.pending_play = self.config.autoplay;
    }

    fn on_close(&mut self, out: &mut Vec<Directive>) {
        self.set_wrapper_active(out, false);
        let resting = self.session.close_status();
        if self.session.status == PlayerStatus::Playing {
            out.push(Directive::Pause);
        }
        self.set_activated(out, false);
        self.set_status(out, resting);
    }

    // ------------------------------------------------------------------
    // Attach pipeline

    fn on_attach_ready(&mut self, out: &mut Vec<Directive>, generation: u64) {
        if !self.binder.accepts(generation) || !self.session.is_attached {
            debug!(generation, "ignoring readiness from superseded attach");
            return;
        }
        self.ready_if_idle(out);
        self.refresh_ratio(out);
        if self.session.duration.is_usable() {
            out.push(Directive::SetDurationText {
                text: format_time(self.session.duration.as_secs()),
            });
        }
        if self.session.auto_start_on_ready && self.wrapper_active {
            self.session.auto_start_on_ready = false;
            self.set_status(out, PlayerStatus::Loading);
            out.push(Directive::Play);
        }
    }

    fn on_manifest_loaded(&mut self, out: &mut Vec<Directive>, generation: u64, body: &str) {
        if !self.binder.accepts(generation) {
            debug!(generation, "ignoring manifest from superseded attach");
            return;
        }
        if let Some((width, height)) = crate::ratio::parse_master_resolution(body) {
            if let Some(percent) = self.ratio.apply_dims(width, height) {
                out.push(Directive::SetRatioPadding { percent });
            }
            self.emit_clamp(out);
        }
    }

    // ------------------------------------------------------------------
    // Transport

    fn on_toggle_play(&mut self, out: &mut Vec<Directive>) {
        if !self.session.is_attached {
            return;
        }
        if self.session.status == PlayerStatus::Playing {
            self.session.manual_pause = true;
            out.push(Directive::Pause);
        } else {
            self.request_play(out);
        }
    }

    fn request_play(&mut self, out: &mut Vec<Directive>) {
        if !self.session.is_attached {
            return;
        }
        self.session.arm_play();
        self.set_status(out, PlayerStatus::Loading);
        // The host swallows a rejected play promise; a blocked autoplay just
        // leaves us in loading until the element reports pause/waiting.
        out.push(Directive::Play);
    }

    fn on_toggle_mute(&mut self, out: &mut Vec<Directive>) {
        self.session.muted = !self.session.muted;
        out.push(Directive::SetMuted {
            muted: self.session.muted,
        });
    }

    fn on_toggle_fullscreen(&mut self, out: &mut Vec<Directive>) {
        let api = self.config.capabilities.fullscreen;
        if api == FullscreenApi::Unavailable {
            return;
        }
        if self.session.fullscreen {
            out.push(Directive::ExitFullscreen { api });
        } else {
            out.push(Directive::EnterFullscreen { api });
        }
    }

    // ------------------------------------------------------------------
    // Media element events

    fn on_play(&mut self, out: &mut Vec<Directive>) {
        if !self.session.is_attached {
            return;
        }
        self.set_activated(out, true);
        self.emit_progress_visuals(out);
        self.frame_loop = true;
        out.push(Directive::RequestFrame);
        self.set_status(out, PlayerStatus::Playing);
    }

    fn on_playing(&mut self, out: &mut Vec<Directive>) {
        self.session.settle_play();
        if self.session.is_attached {
            self.set_status(out, PlayerStatus::Playing);
            // A stall (`waiting`) lets the frame loop cancel itself; pick it
            // back up when playback actually resumes.
            if !self.frame_loop {
                self.frame_loop = true;
                out.push(Directive::RequestFrame);
            }
            self.refresh_ratio(out);
        }
    }

    fn on_pause(&mut self, out: &mut Vec<Directive>) {
        self.session.settle_play();
        self.frame_loop = false;
        self.emit_progress_visuals(out);
        self.set_status(out, PlayerStatus::Paused);
    }

    fn on_ended(&mut self, out: &mut Vec<Directive>) {
        self.session.settle_play();
        self.frame_loop = false;
        self.emit_progress_visuals(out);
        self.set_activated(out, false);
        out.push(Directive::SeekTo { seconds: 0.0 });
        self.session.current_time = MediaTime::from_secs(0.0);
        if self.session.fullscreen && self.config.capabilities.fullscreen != FullscreenApi::Unavailable
        {
            out.push(Directive::ExitFullscreen {
                api: self.config.capabilities.fullscreen,
            });
        }
        self.on_close(out);
    }

    fn on_loaded_metadata(
        &mut self,
        out: &mut Vec<Directive>,
        duration: f64,
        width: u32,
        height: u32,
    ) {
        let duration = MediaTime::from_secs(duration);
        if duration.is_usable() {
            self.session.duration = duration;
        }
        self.emit_time_texts(out);
        self.emit_buffered(out);
        self.ratio.note_video_dims(width, height);
        self.refresh_ratio(out);
    }

    fn on_animation_frame(&mut self, out: &mut Vec<Directive>, current_time: f64) {
        if !self.frame_loop {
            return;
        }
        self.session.note_progress(current_time);
        self.emit_progress_visuals(out);
        if self.session.status == PlayerStatus::Playing {
            out.push(Directive::RequestFrame);
        } else {
            self.frame_loop = false;
        }
    }

    // ------------------------------------------------------------------
    // Scrubbing

    fn on_scrub_start(
        &mut self,
        out: &mut Vec<Directive>,
        x: f64,
        timeline_left: f64,
        timeline_width: f64,
        now_ms: f64,
    ) {
        let playing = self.session.status == PlayerStatus::Playing;
        let update = self.scrub.begin(
            x,
            timeline_left,
            timeline_width,
            now_ms,
            self.session.duration,
            playing,
        );
        if let Some(upd) = update {
            if playing {
                out.push(Directive::Pause);
            }
            out.push(Directive::SetScrubbing { active: true });
            self.emit_scrub_preview(out, upd);
        }
    }

    fn on_scrub_end(&mut self, out: &mut Vec<Directive>) {
        if let Some(finish) = self.scrub.finish() {
            out.push(Directive::SetScrubbing { active: false });
            out.push(Directive::SeekTo {
                seconds: finish.target_time,
            });
            self.session.note_progress(finish.target_time);
            if finish.resume {
                out.push(Directive::Play);
            } else {
                self.emit_progress_visuals(out);
                self.emit_time_texts(out);
            }
        }
    }

    fn emit_scrub_preview(&self, out: &mut Vec<Directive>, upd: ScrubUpdate) {
        let percent = upd.fraction * 100.0;
        out.push(Directive::SetPlayedPercent { percent });
        out.push(Directive::SetHandlePercent {
            percent: clamp_percent(percent),
        });
        out.push(Directive::SetProgressText {
            text: format_time(upd.preview_time),
        });
        if let Some(seconds) = upd.commit {
            out.push(Directive::SeekTo { seconds });
        }
    }

    // ------------------------------------------------------------------
    // Shared emission helpers

    fn wake_controls(&mut self, out: &mut Vec<Directive>, now_ms: f64) {
        let outcome = self.hover.wake(now_ms);
        if outcome.became_active {
            out.push(Directive::SetHover {
                state: HoverVisibility::Active,
            });
        }
        if let Some(delay_ms) = outcome.schedule_ms {
            out.push(Directive::ScheduleHoverTimer { delay_ms });
        }
    }

    /// Promote idle to ready once nothing is queued and nothing has played,
    /// so the chrome can show a poster-with-play state.
    fn ready_if_idle(&mut self, out: &mut Vec<Directive>) {
        if !self.session.pending_play
            && !self.session.activated
            && self.session.status == PlayerStatus::Idle
        {
            self.set_status(out, PlayerStatus::Ready);
        }
    }

    fn refresh_ratio(&mut self, out: &mut Vec<Directive>) {
        let src = self.session.current_source.clone();
        match self.ratio.discover(&src) {
            Discovery::Apply { width, height } => {
                if let Some(percent) = self.ratio.apply_dims(width, height) {
                    out.push(Directive::SetRatioPadding { percent });
                }
            }
            Discovery::Fetch { url } => out.push(Directive::FetchManifest {
                url,
                generation: self.binder.generation(),
            }),
            Discovery::Settled => {}
        }
        self.emit_clamp(out);
    }

    fn emit_clamp(&mut self, out: &mut Vec<Directive>) {
        if !self.wrapper_active {
            return;
        }
        if let Some(fit) = self.ratio.clamp() {
            out.push(Directive::SetClamp {
                max_width_percent: fit.max_width_percent,
                max_height_percent: fit.max_height_percent,
            });
        }
    }

    fn emit_time_texts(&self, out: &mut Vec<Directive>) {
        out.push(Directive::SetDurationText {
            text: format_time(self.session.duration.as_secs()),
        });
        out.push(Directive::SetProgressText {
            text: format_time(self.session.current_time.as_secs()),
        });
    }

    fn emit_progress_visuals(&self, out: &mut Vec<Directive>) {
        if let Some(percent) = played_percent(self.session.current_time, self.session.duration) {
            out.push(Directive::SetPlayedPercent { percent });
            out.push(Directive::SetHandlePercent {
                percent: clamp_percent(percent),
            });
        }
    }

    fn emit_buffered(&self, out: &mut Vec<Directive>) {
        if let Some(end) = self.buffered_end {
            if let Some(percent) = buffered_percent(end, self.session.duration) {
                out.push(Directive::SetBufferedPercent { percent });
            }
        }
    }

    // Attribute mirrors, suppressed when nothing changed.

    fn set_status(&mut self, out: &mut Vec<Directive>, status: PlayerStatus) {
        if self.session.status != status {
            self.session.status = status;
            out.push(Directive::SetStatus { status });
        }
    }

    fn set_activated(&mut self, out: &mut Vec<Directive>, activated: bool) {
        if self.session.activated != activated {
            self.session.activated = activated;
            out.push(Directive::SetActivated { activated });
        }
    }

    fn set_wrapper_active(&mut self, out: &mut Vec<Directive>, active: bool) {
        if self.wrapper_active != active {
            self.wrapper_active = active;
            out.push(Directive::SetWrapperActive { active });
        }
    }

    fn set_fullscreen_state(&mut self, out: &mut Vec<Directive>, active: bool) {
        if self.session.fullscreen != active {
            self.session.fullscreen = active;
            out.push(Directive::SetFullscreenState { active });
        }
    }
}
