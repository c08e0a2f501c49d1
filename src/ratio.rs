// Aspect-ratio discovery and the clamp that keeps the reserved box at the
// media's ratio inside the wrapper. Ratio sources, best first: decoded video
// dimensions, the widest adaptive quality level, a master-playlist fetch
// parsed for declared resolutions.

use crate::types::{ContainerBox, QualityLevel, UpdateSizeMode};

pub const DEFAULT_RATIO: f64 = 16.0 / 9.0;

/// Next step of the ratio discovery chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Dimensions are known; apply them.
    Apply { width: u32, height: u32 },
    /// Fetch the master playlist and parse it for resolutions.
    Fetch { url: String },
    /// Nothing to do (wrong mode, or all sources exhausted).
    Settled,
}

/// Max-width/max-height percentages for the calc box. `None` clears the
/// constraint (cover mode).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampFit {
    pub max_width_percent: Option<f64>,
    pub max_height_percent: Option<f64>,
}

#[derive(Debug)]
pub struct RatioTracker {
    mode: UpdateSizeMode,
    video_dims: Option<(u32, u32)>,
    level_dims: Option<(u32, u32)>,
    /// Ratio implied by the last applied padding; survives re-attach so the
    /// box doesn't collapse while new metadata loads.
    padding_ratio: Option<f64>,
    container: Option<ContainerBox>,
    fetch_issued: bool,
}

impl RatioTracker {
    pub fn new(mode: UpdateSizeMode) -> Self {
        RatioTracker {
            mode,
            video_dims: None,
            level_dims: None,
            padding_ratio: None,
            container: None,
            fetch_issued: false,
        }
    }

    /// A new source is being bound; per-source knowledge resets, at most one
    /// manifest fetch per attach.
    pub fn reset_for_attach(&mut self) {
        self.video_dims = None;
        self.level_dims = None;
        self.fetch_issued = false;
    }

    pub fn set_container(&mut self, container: ContainerBox) {
        self.container = Some(container);
    }

    /// Decoded dimensions from `loadedmetadata`. Returns true if this is new
    /// information worth re-applying.
    pub fn note_video_dims(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let dims = Some((width, height));
        if self.video_dims == dims {
            return false;
        }
        self.video_dims = dims;
        true
    }

    /// Quality variants from the adaptive library; the widest one wins.
    pub fn note_levels(&mut self, levels: &[QualityLevel]) {
        if let Some(best) = best_level(levels) {
            if best.width > 0 && best.height > 0 {
                self.level_dims = Some((best.width, best.height));
            }
        }
    }

    /// Walk the discovery chain for the attached source. Only intrinsic
    /// sizing discovers anything; manifest fetches go out once per attach and
    /// only for plain http(s) sources.
    pub fn discover(&mut self, src: &str) -> Discovery {
        if self.mode != UpdateSizeMode::Intrinsic {
            return Discovery::Settled;
        }
        if let Some((width, height)) = self.video_dims {
            return Discovery::Apply { width, height };
        }
        if let Some((width, height)) = self.level_dims {
            return Discovery::Apply { width, height };
        }
        if !self.fetch_issued && is_fetchable(src) {
            self.fetch_issued = true;
            return Discovery::Fetch {
                url: src.to_string(),
            };
        }
        Discovery::Settled
    }

    /// Record applied dimensions and return the padding-top percentage for
    /// the ratio box, or `None` when sizing is not intrinsic.
    pub fn apply_dims(&mut self, width: u32, height: u32) -> Option<f64> {
        if self.mode != UpdateSizeMode::Intrinsic || width == 0 || height == 0 {
            return None;
        }
        self.padding_ratio = Some(width as f64 / height as f64);
        Some(height as f64 / width as f64 * 100.0)
    }

    /// Fit the ratio box into the wrapper's padded content area. `None` means
    /// no directive (geometry unknown); cover mode clears both constraints.
    pub fn clamp(&self) -> Option<ClampFit> {
        if self.mode == UpdateSizeMode::Cover {
            return Some(ClampFit {
                max_width_percent: None,
                max_height_percent: None,
            });
        }
        let container = self.container?;
        let cw = container.content_width();
        let ch = container.content_height();
        if cw <= 0.0 || ch <= 0.0 {
            return None;
        }
        let ratio = self.effective_ratio(cw, ch);
        let height_if_full_width = cw / ratio;
        if height_if_full_width <= ch {
            Some(ClampFit {
                max_width_percent: Some(100.0),
                max_height_percent: Some(height_if_full_width / ch * 100.0),
            })
        } else {
            Some(ClampFit {
                max_width_percent: Some(ch * ratio / cw * 100.0),
                max_height_percent: Some(100.0),
            })
        }
    }

    fn effective_ratio(&self, cw: f64, ch: f64) -> f64 {
        if self.mode == UpdateSizeMode::Intrinsic {
            if let Some((w, h)) = self.video_dims {
                return w as f64 / h as f64;
            }
        }
        if let Some(ratio) = self.padding_ratio {
            return ratio;
        }
        if ch > 0.0 && cw > 0.0 {
            return cw / ch;
        }
        DEFAULT_RATIO
    }
}

/// Highest-width quality level, mirroring the adaptive library's level list.
pub fn best_level(levels: &[QualityLevel]) -> Option<QualityLevel> {
    levels
        .iter()
        .copied()
        .reduce(|a, b| if b.width > a.width { b } else { a })
}

fn is_fetchable(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Scan an HLS master playlist for the widest declared `RESOLUTION`. Variant
/// URIs follow their `#EXT-X-STREAM-INF` line; anything malformed is skipped.
pub fn parse_master_resolution(body: &str) -> Option<(u32, u32)> {
    let mut pending: Option<&str> = None;
    let mut best: Option<(u32, u32)> = None;
    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with("#EXT-X-STREAM-INF:") {
            pending = Some(line);
        } else if let Some(info) = pending {
            if !line.is_empty() && !line.starts_with('#') {
                if let Some((w, h)) = parse_resolution_attr(info) {
                    if best.map_or(true, |(bw, _)| w > bw) {
                        best = Some((w, h));
                    }
                }
                pending = None;
            }
        }
    }
    best
}

fn parse_resolution_attr(attrs: &str) -> Option<(u32, u32)> {
    let rest = &attrs[attrs.find("RESOLUTION=")? + "RESOLUTION=".len()..];
    let (w_str, rest) = rest.split_once('x')?;
    let h_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let width: u32 = w_str.parse().ok()?;
    let height: u32 = rest[..h_end].parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
