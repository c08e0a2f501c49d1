// Strong typing over strings. Tagged enums for everything that crosses the
// JS boundary; newtypes for media time.

use serde::{Deserialize, Serialize};

/// Media-element time in seconds. Newtype so durations and wall-clock
/// milliseconds cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct MediaTime(f64);

impl MediaTime {
    pub fn from_secs(secs: f64) -> Self {
        MediaTime(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// A duration is usable once it is a finite, positive number. `NaN`
    /// (nothing attached yet) and `Infinity` (live streams before the
    /// manifest settles) both fail this.
    pub fn is_usable(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

/// Transport status mirrored into the boundary attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Idle => "idle",
            PlayerStatus::Loading => "loading",
            PlayerStatus::Ready => "ready",
            PlayerStatus::Playing => "playing",
            PlayerStatus::Paused => "paused",
        }
    }
}

/// Visibility of the transport chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoverVisibility {
    Active,
    #[default]
    Idle,
}

/// How a source gets bound to the playback element. Selected once per
/// controller from the host's capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachStrategy {
    /// The media engine plays the HLS container natively (Safari).
    NativeHls,
    /// An adaptive-streaming client library attached to the element.
    AdaptiveLibrary,
    /// Plain `src` assignment, no adaptive delivery.
    DirectSrc,
}

/// Which fullscreen API variant the host found, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenApi {
    Standard,
    WebkitDocument,
    WebkitVideo,
    #[default]
    Unavailable,
}

/// Sizing behavior of the reserved player box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdateSizeMode {
    /// Follow the media's intrinsic aspect ratio (attribute value "true").
    #[serde(rename = "true")]
    Intrinsic,
    /// Fill the wrapper, no clamp (attribute value "cover").
    #[serde(rename = "cover")]
    Cover,
    /// Keep whatever ratio the markup reserved (attribute value "false").
    #[default]
    #[serde(rename = "false")]
    Frame,
}

/// One adaptive-streaming quality variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QualityLevel {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Wrapper element geometry used by the clamp math. All values in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ContainerBox {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub padding_top: f64,
    #[serde(default)]
    pub padding_bottom: f64,
    #[serde(default)]
    pub padding_left: f64,
    #[serde(default)]
    pub padding_right: f64,
}

impl ContainerBox {
    pub fn content_width(&self) -> f64 {
        self.width - self.padding_left - self.padding_right
    }

    pub fn content_height(&self) -> f64 {
        self.height - self.padding_top - self.padding_bottom
    }
}

/// Host capability probe, taken once at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Capabilities {
    /// `video.canPlayType("application/vnd.apple.mpegurl")` reported support.
    #[serde(default)]
    pub native_hls: bool,
    /// An adaptive-streaming client library is loaded and supported.
    #[serde(default)]
    pub adaptive_library: bool,
    #[serde(default)]
    pub fullscreen: FullscreenApi,
}

/// Controller configuration passed from JS, read off the player markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub update_size: UpdateSizeMode,
    /// Minimum spacing between committed scrub seeks (milliseconds).
    #[serde(default = "default_seek_throttle_ms")]
    pub seek_throttle_ms: f64,
    /// Chrome hides after this much pointer inactivity (milliseconds).
    #[serde(default = "default_hover_hide_delay_ms")]
    pub hover_hide_delay_ms: f64,
    #[serde(default)]
    pub capabilities: Capabilities,
}

// Keep the plain-Rust defaults identical to the serde field defaults; a
// config built natively must behave like one parsed from `{}`.
impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            autoplay: false,
            muted: false,
            update_size: UpdateSizeMode::default(),
            seek_throttle_ms: default_seek_throttle_ms(),
            hover_hide_delay_ms: default_hover_hide_delay_ms(),
            capabilities: Capabilities::default(),
        }
    }
}

fn default_seek_throttle_ms() -> f64 {
    180.0
}

fn default_hover_hide_delay_ms() -> f64 {
    3000.0
}

fn nan() -> f64 {
    f64::NAN
}

/// Input to the engine. The host forwards DOM, media, pointer, and timer
/// callbacks as these; wall-clock fields carry `performance.now()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    // Page-level controls.
    Open {
        src: String,
        #[serde(default)]
        placeholder: Option<String>,
    },
    Close,
    TogglePlay,
    ToggleMute,
    ToggleFullscreen,
    /// The placeholder image's load or error event fired.
    PlaceholderSettled,

    // Attach pipeline.
    AttachReady {
        generation: u64,
    },
    LevelsUpdated {
        levels: Vec<QualityLevel>,
    },
    LevelDetails {
        total_duration: f64,
    },
    ManifestLoaded {
        generation: u64,
        body: String,
    },
    ManifestFailed {
        generation: u64,
    },

    // Native media element events.
    LoadedMetadata {
        #[serde(default = "nan")]
        duration: f64,
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
    },
    DurationChange {
        duration: f64,
    },
    TimeUpdate {
        current_time: f64,
    },
    Play,
    Playing,
    Pause,
    Waiting,
    CanPlay,
    Ended,
    BufferedProgress {
        buffered_end: f64,
    },

    // Scheduling callbacks the engine asked for.
    AnimationFrame {
        current_time: f64,
    },
    HoverTimerFired {
        now_ms: f64,
    },

    // Pointer interaction.
    PointerActivity {
        now_ms: f64,
    },
    PointerLeave,
    ScrubStart {
        x: f64,
        timeline_left: f64,
        timeline_width: f64,
        now_ms: f64,
    },
    ScrubMove {
        x: f64,
        now_ms: f64,
    },
    ScrubEnd,

    // Layout and fullscreen mirrors.
    ContainerResize {
        container: ContainerBox,
    },
    FullscreenChanged {
        active: bool,
        now_ms: f64,
    },
}

/// Batch of events (minimizes JS↔WASM crossings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBatch {
    pub events: Vec<PlayerEvent>,
}

/// Output of the engine. The host applies these to the DOM/media element in
/// order; none of them can fail from the engine's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    // Boundary attribute writes (emitted only on change).
    SetWrapperActive {
        active: bool,
    },
    SetStatus {
        status: PlayerStatus,
    },
    SetActivated {
        activated: bool,
    },
    /// Mirrors to both the element's muted property and the attribute.
    SetMuted {
        muted: bool,
    },
    SetFullscreenState {
        active: bool,
    },
    SetHover {
        state: HoverVisibility,
    },
    SetScrubbing {
        active: bool,
    },

    // Media element control.
    Attach {
        src: String,
        strategy: AttachStrategy,
        generation: u64,
    },
    DestroyAdaptive,
    Play,
    Pause,
    SeekTo {
        seconds: f64,
    },
    EnterFullscreen {
        api: FullscreenApi,
    },
    ExitFullscreen {
        api: FullscreenApi,
    },

    // Text and visual mirrors.
    SetDurationText {
        text: String,
    },
    SetProgressText {
        text: String,
    },
    SetPlayedPercent {
        percent: f64,
    },
    SetHandlePercent {
        percent: f64,
    },
    SetBufferedPercent {
        percent: f64,
    },
    SetRatioPadding {
        percent: f64,
    },
    SetClamp {
        max_width_percent: Option<f64>,
        max_height_percent: Option<f64>,
    },

    // Host scheduling and fetches.
    RequestFrame,
    ScheduleHoverTimer {
        delay_ms: f64,
    },
    LoadPlaceholder {
        url: String,
    },
    FetchManifest {
        url: String,
        generation: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_time_usability() {
        assert!(MediaTime::from_secs(12.5).is_usable());
        assert!(!MediaTime::from_secs(0.0).is_usable());
        assert!(!MediaTime::from_secs(f64::NAN).is_usable());
        assert!(!MediaTime::from_secs(f64::INFINITY).is_usable());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PlayerStatus::Playing).unwrap();
        assert_eq!(json, "\"playing\"");
        assert_eq!(PlayerStatus::Playing.as_str(), "playing");
    }

    #[test]
    fn update_size_mode_uses_attribute_values() {
        assert_eq!(
            serde_json::from_str::<UpdateSizeMode>("\"true\"").unwrap(),
            UpdateSizeMode::Intrinsic
        );
        assert_eq!(
            serde_json::from_str::<UpdateSizeMode>("\"cover\"").unwrap(),
            UpdateSizeMode::Cover
        );
        assert_eq!(
            serde_json::from_str::<UpdateSizeMode>("\"false\"").unwrap(),
            UpdateSizeMode::Frame
        );
    }

    #[test]
    fn event_round_trip() {
        let event = PlayerEvent::Open {
            src: "https://cdn.example.com/master.m3u8".into(),
            placeholder: Some("https://cdn.example.com/poster.jpg".into()),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"open\""));
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        match back {
            PlayerEvent::Open { src, placeholder } => {
                assert_eq!(src, "https://cdn.example.com/master.m3u8");
                assert!(placeholder.is_some());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn scrub_event_parses_from_host_json() {
        let json = r#"{"type":"scrub_start","x":120.0,"timeline_left":20.0,"timeline_width":200.0,"now_ms":1234.5}"#;
        let event: PlayerEvent = serde_json::from_str(json).unwrap();
        match event {
            PlayerEvent::ScrubStart {
                x, timeline_width, ..
            } => {
                assert_eq!(x, 120.0);
                assert_eq!(timeline_width, 200.0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn config_defaults() {
        let config: PlayerConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.autoplay);
        assert_eq!(config.seek_throttle_ms, 180.0);
        assert_eq!(config.hover_hide_delay_ms, 3000.0);
        assert_eq!(config.update_size, UpdateSizeMode::Frame);
        assert_eq!(config.capabilities.fullscreen, FullscreenApi::Unavailable);
    }

    #[test]
    fn plain_default_matches_empty_json_config() {
        let parsed: PlayerConfig = serde_json::from_str("{}").unwrap();
        let built = PlayerConfig::default();
        assert_eq!(built.seek_throttle_ms, parsed.seek_throttle_ms);
        assert_eq!(built.hover_hide_delay_ms, parsed.hover_hide_delay_ms);
        assert_eq!(built.update_size, parsed.update_size);
        assert_eq!(built.autoplay, parsed.autoplay);
        assert_eq!(built.muted, parsed.muted);
    }

    #[test]
    fn container_box_content_area() {
        let b = ContainerBox {
            width: 1000.0,
            height: 600.0,
            padding_left: 20.0,
            padding_right: 20.0,
            padding_top: 10.0,
            padding_bottom: 10.0,
        };
        assert_eq!(b.content_width(), 960.0);
        assert_eq!(b.content_height(), 580.0);
    }
}
