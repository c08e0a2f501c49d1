// lightbox_core: Rust/WASM engine for the lightbox video player.
// All "magic" lives here; JS is plumbing. The host forwards DOM, media, and
// timer callbacks as JSON events and applies the returned directives in order.

mod binder;
mod controller;
mod error;
mod hover;
mod ratio;
mod session;
mod timecode;
mod timeline;
mod types;

use wasm_bindgen::prelude::*;

pub use binder::SourceBinder;
pub use controller::PlayerController;
pub use error::PlayerError;
pub use hover::{HoverTracker, TimerOutcome, WakeOutcome};
pub use ratio::{best_level, parse_master_resolution, ClampFit, Discovery, RatioTracker};
pub use session::PlayerSession;
pub use timecode::format_time;
pub use timeline::{
    buffered_percent, clamp_percent, played_percent, ScrubDrag, ScrubFinish, ScrubUpdate,
};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main player interface exposed to JavaScript.
/// Batch interface to minimize JS↔WASM crossings.
#[wasm_bindgen]
pub struct Player {
    controller: PlayerController,
}

#[wasm_bindgen]
impl Player {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Player, JsValue> {
        let config: PlayerConfig = serde_json::from_str(config_json)
            .map_err(|e| to_js(PlayerError::InvalidConfig(e.to_string())))?;

        Ok(Player {
            controller: PlayerController::new(config),
        })
    }

    /// Initial directives that seed the boundary attributes. Call once after
    /// construction, before any events.
    pub fn bootstrap(&mut self) -> Result<String, JsValue> {
        let directives = self.controller.bootstrap();
        serde_json::to_string(&directives).map_err(|e| to_js(e.into()))
    }

    /// Process one host event and return the directives to apply, in order.
    pub fn handle_event(&mut self, event_json: &str) -> Result<String, JsValue> {
        let event: PlayerEvent = serde_json::from_str(event_json)
            .map_err(|e| to_js(PlayerError::InvalidEvent(e.to_string())))?;

        let directives = self.controller.handle_event(event);
        serde_json::to_string(&directives).map_err(|e| to_js(e.into()))
    }

    /// Process a batch of events in one crossing. Directives come back in
    /// event order.
    pub fn handle_events(&mut self, batch_json: &str) -> Result<String, JsValue> {
        let batch: EventBatch = serde_json::from_str(batch_json)
            .map_err(|e| to_js(PlayerError::InvalidEvent(e.to_string())))?;

        let directives = self.controller.handle_batch(batch.events);
        serde_json::to_string(&directives).map_err(|e| to_js(e.into()))
    }

    /// Current session state as JSON, for debugging and host-side assertions.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.controller.session()).map_err(|e| to_js(e.into()))
    }

    /// Current transport status as the attribute string.
    pub fn status(&self) -> String {
        self.controller.session().status.as_str().to_string()
    }
}

fn to_js(err: PlayerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
