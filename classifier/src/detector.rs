use serde::{Deserialize, Serialize};

/// Debounces class scores into trigger decisions.
///
/// # Algorithm
///
/// The detector keeps a circular buffer of the last N scores of the target
/// class. On each [`Detector::feed`] call it counts how many of them reach
/// the threshold:
///
/// - at least `min_hits` hits -> a [`Trigger`], and the window is cleared
/// - otherwise -> `None`
///
/// Clearing after a trigger means one event is reported once even when the
/// model keeps scoring it high for several inferences.
pub struct Detector {
    window: Vec<f32>,
    pos: usize,
    filled: usize,
    target_class: usize,
    threshold: f32,
    min_hits: usize,
}

/// Configuration for [`Detector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Index of the class to watch (default: 0).
    pub target_class: usize,
    /// Minimum score counted as a hit (default: 0.6).
    pub threshold: f32,
    /// Sliding window size (default: 3).
    pub window_size: usize,
    /// Hits within the window needed to trigger (default: 2).
    pub min_hits: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            target_class: 0,
            threshold: 0.6,
            window_size: 3,
            min_hits: 2,
        }
    }
}

/// A detected event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    /// The watched class index.
    pub class: usize,
    /// Mean score of the hits in the window.
    pub score: f32,
    /// Number of hits in the window.
    pub hits: usize,
}

impl Detector {
    /// Creates a Detector with default configuration.
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Creates a Detector with the given configuration.
    pub fn with_config(cfg: DetectorConfig) -> Self {
        let window_size = if cfg.window_size > 0 {
            cfg.window_size
        } else {
            3
        };
        let min_hits = cfg.min_hits.clamp(1, window_size);
        let threshold = if cfg.threshold.is_finite() {
            cfg.threshold
        } else {
            0.6
        };
        Self {
            window: vec![0.0; window_size],
            pos: 0,
            filled: 0,
            target_class: cfg.target_class,
            threshold,
            min_hits,
        }
    }

    /// Adds the target score from `predictions` and returns a trigger once
    /// enough recent scores reach the threshold.
    ///
    /// Predictions without the target class are ignored.
    pub fn feed(&mut self, predictions: &[f32]) -> Option<Trigger> {
        let score = *predictions.get(self.target_class)?;

        self.window[self.pos] = score;
        self.pos = (self.pos + 1) % self.window.len();
        if self.filled < self.window.len() {
            self.filled += 1;
        }

        let (hits, sum) = self
            .recent()
            .filter(|&s| s >= self.threshold)
            .fold((0usize, 0.0f32), |(n, sum), s| (n + 1, sum + s));

        if hits < self.min_hits {
            return None;
        }

        let trigger = Trigger {
            class: self.target_class,
            score: sum / hits as f32,
            hits,
        };
        self.reset();
        Some(trigger)
    }

    /// Clears the window state.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
        self.window.fill(0.0);
    }

    fn recent(&self) -> impl Iterator<Item = f32> + '_ {
        let len = self.window.len();
        (0..self.filled).map(move |i| self.window[(self.pos + len - self.filled + i) % len])
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_needs_min_hits() {
        let mut det = Detector::new();
        assert!(det.feed(&[0.9, 0.1]).is_none(), "one hit is not enough");
        let t = det.feed(&[0.7, 0.3]).unwrap();
        assert_eq!(t.class, 0);
        assert_eq!(t.hits, 2);
        assert!((t.score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn detector_clears_after_trigger() {
        let mut det = Detector::new();
        det.feed(&[0.9]);
        assert!(det.feed(&[0.9]).is_some());
        assert!(det.feed(&[0.9]).is_none(), "window restarts after a trigger");
        assert!(det.feed(&[0.9]).is_some());
    }

    #[test]
    fn detector_forgets_old_hits() {
        let mut det = Detector::with_config(DetectorConfig {
            window_size: 3,
            min_hits: 2,
            ..DetectorConfig::default()
        });
        det.feed(&[0.9]);
        det.feed(&[0.1]);
        det.feed(&[0.1]);
        // The first hit has left the window.
        assert!(det.feed(&[0.9]).is_none());
        assert!(det.feed(&[0.9]).is_some());
    }

    #[test]
    fn detector_watches_target_class() {
        let mut det = Detector::with_config(DetectorConfig {
            target_class: 2,
            min_hits: 1,
            ..DetectorConfig::default()
        });
        assert!(det.feed(&[1.0, 1.0, 0.2]).is_none());
        let t = det.feed(&[0.0, 0.0, 0.95]).unwrap();
        assert_eq!(t.class, 2);
        // Missing class is ignored.
        assert!(det.feed(&[1.0]).is_none());
    }

    #[test]
    fn detector_ignores_nan() {
        let mut det = Detector::with_config(DetectorConfig {
            min_hits: 1,
            ..DetectorConfig::default()
        });
        assert!(det.feed(&[f32::NAN]).is_none());
    }

    #[test]
    fn detector_sanitizes_config() {
        let det = Detector::with_config(DetectorConfig {
            window_size: 0,
            min_hits: 10,
            threshold: f32::NAN,
            target_class: 1,
        });
        assert_eq!(det.window.len(), 3);
        assert_eq!(det.min_hits, 3);
        assert_eq!(det.threshold, 0.6);
    }

    #[test]
    fn detector_reset() {
        let mut det = Detector::new();
        det.feed(&[0.9]);
        det.reset();
        assert!(det.feed(&[0.9]).is_none());
    }

    #[test]
    fn config_serde_defaults() {
        let cfg: DetectorConfig = serde_json::from_str(r#"{"threshold": 0.8}"#).unwrap();
        assert_eq!(cfg.threshold, 0.8);
        assert_eq!(cfg.window_size, 3);
    }
}
