//! Segmented readout of scroll progress.
//!
//! The multi-bar indicator lights `floor(fraction * N)` segments fully and
//! the next one partially. This is a pure projection of the fraction; it
//! can be recomputed on every repaint.

use serde::{Deserialize, Serialize};

use super::tracker::ProgressState;

/// Per-segment fill levels, each within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReadout {
    pub segments: Vec<f64>,
}

impl SegmentReadout {
    pub fn from_fraction(fraction: f64, segment_count: usize) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = fraction * segment_count as f64;
        let full = filled.floor() as usize;
        let partial = filled - full as f64;

        let segments = (0..segment_count)
            .map(|i| {
                if i < full {
                    1.0
                } else if i == full {
                    partial
                } else {
                    0.0
                }
            })
            .collect();
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total fill. Equals `fraction * len()` up to rounding.
    pub fn sum(&self) -> f64 {
        self.segments.iter().sum()
    }

    /// Number of fully lit segments.
    pub fn lit_count(&self) -> usize {
        self.segments.iter().filter(|&&v| v >= 1.0).count()
    }
}

/// Project a progress state onto `segment_count` segments.
pub fn project(progress: &ProgressState, segment_count: usize) -> SegmentReadout {
    SegmentReadout::from_fraction(progress.fraction, segment_count)
}
