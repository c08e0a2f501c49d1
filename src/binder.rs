// Source binding: which attach strategy to use, and the generation counter
// that lets readiness callbacks from superseded attaches be discarded.

use crate::types::{AttachStrategy, Capabilities, Directive};

impl AttachStrategy {
    /// Three-tier priority: native HLS playback when the media engine
    /// declares container support, else the adaptive client library, else a
    /// plain src assignment. Absence of everything is not an error.
    pub fn select(caps: &Capabilities) -> AttachStrategy {
        if caps.native_hls {
            AttachStrategy::NativeHls
        } else if caps.adaptive_library {
            AttachStrategy::AdaptiveLibrary
        } else {
            AttachStrategy::DirectSrc
        }
    }
}

/// Issues attach directives and arbitrates their readiness callbacks. Every
/// attach gets a fresh generation; a callback tagged with an older generation
/// belongs to a superseded source and must be ignored.
#[derive(Debug)]
pub struct SourceBinder {
    strategy: AttachStrategy,
    generation: u64,
    /// An adaptive-streaming handle is live on the host side.
    adaptive_live: bool,
}

impl SourceBinder {
    pub fn new(caps: &Capabilities) -> Self {
        SourceBinder {
            strategy: AttachStrategy::select(caps),
            generation: 0,
            adaptive_live: false,
        }
    }

    pub fn strategy(&self) -> AttachStrategy {
        self.strategy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start binding `src`, superseding any in-flight attach.
    pub fn begin(&mut self, src: &str) -> Directive {
        self.generation += 1;
        if self.strategy == AttachStrategy::AdaptiveLibrary {
            self.adaptive_live = true;
        }
        Directive::Attach {
            src: src.to_string(),
            strategy: self.strategy,
            generation: self.generation,
        }
    }

    /// Tear down the adaptive handle if one is live. The host wraps the
    /// destroy call so a throw during teardown cannot block the next attach.
    pub fn teardown(&mut self) -> Option<Directive> {
        if self.adaptive_live {
            self.adaptive_live = false;
            Some(Directive::DestroyAdaptive)
        } else {
            None
        }
    }

    /// Whether a callback tagged `generation` belongs to the current attach.
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.generation != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FullscreenApi;

    fn caps(native: bool, adaptive: bool) -> Capabilities {
        Capabilities {
            native_hls: native,
            adaptive_library: adaptive,
            fullscreen: FullscreenApi::Unavailable,
        }
    }

    #[test]
    fn strategy_priority_order() {
        assert_eq!(
            AttachStrategy::select(&caps(true, true)),
            AttachStrategy::NativeHls
        );
        assert_eq!(
            AttachStrategy::select(&caps(false, true)),
            AttachStrategy::AdaptiveLibrary
        );
        assert_eq!(
            AttachStrategy::select(&caps(false, false)),
            AttachStrategy::DirectSrc
        );
    }

    #[test]
    fn generations_supersede_each_other() {
        let mut binder = SourceBinder::new(&caps(false, true));
        assert!(!binder.accepts(0));

        binder.begin("https://a/master.m3u8");
        assert!(binder.accepts(1));

        binder.begin("https://b/master.m3u8");
        assert!(!binder.accepts(1));
        assert!(binder.accepts(2));
    }

    #[test]
    fn teardown_only_when_adaptive_handle_is_live() {
        let mut binder = SourceBinder::new(&caps(false, true));
        assert!(binder.teardown().is_none());

        binder.begin("https://a/master.m3u8");
        assert_eq!(binder.teardown(), Some(Directive::DestroyAdaptive));
        assert!(binder.teardown().is_none());
    }

    #[test]
    fn direct_strategy_never_tears_down() {
        let mut binder = SourceBinder::new(&caps(false, false));
        binder.begin("https://a/video.mp4");
        assert!(binder.teardown().is_none());
    }
}
