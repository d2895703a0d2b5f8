//! Scroll progress tracking.
//!
//! Turns raw viewport geometry into a clamped `[0, 1]` fraction and the
//! index of the page currently filling the viewport. The tracker keeps no
//! smoothing state; the only thing it remembers is the previous result,
//! so it can tell the scheduler when the active item changes.

use serde::{Deserialize, Serialize};

/// Layout rounding can land a hair below a page boundary.
const PAGE_EPSILON: f64 = 1e-9;

/// One geometry reading from the feed surface. Not retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    /// Distance scrolled past the top of the content, in layout units.
    pub offset: f64,
    /// Visible length along the scroll axis. Also the page extent.
    pub viewport_extent: f64,
    /// Total scrollable length.
    pub content_extent: f64,
}

impl ScrollSample {
    pub fn new(offset: f64, viewport_extent: f64, content_extent: f64) -> Self {
        Self {
            offset,
            viewport_extent,
            content_extent,
        }
    }

    /// Sample for a feed of `item_count` full-screen pages resting on
    /// `index`.
    pub fn at_page(index: usize, page_extent: f64, item_count: usize) -> Self {
        Self {
            offset: index as f64 * page_extent,
            viewport_extent: page_extent,
            content_extent: item_count as f64 * page_extent,
        }
    }
}

/// Derived scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Always within `[0, 1]`.
    pub fraction: f64,
    pub active_item_index: usize,
}

impl ProgressState {
    /// Compute the state for `sample` in a feed of `item_count` pages.
    ///
    /// Zero-size or inverted geometry is normal while the view mounts and
    /// maps to `fraction = 0`. Non-finite input does the same.
    pub fn from_sample(sample: &ScrollSample, item_count: usize) -> Self {
        Self {
            fraction: fraction_for(sample),
            active_item_index: index_for(sample, item_count),
        }
    }
}

fn fraction_for(sample: &ScrollSample) -> f64 {
    let scrollable = sample.content_extent - sample.viewport_extent;
    if !(scrollable > 0.0) {
        return 0.0;
    }
    let fraction = sample.offset / scrollable;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

fn index_for(sample: &ScrollSample, item_count: usize) -> usize {
    let page = sample.viewport_extent;
    if !(page > 0.0) || item_count == 0 {
        return 0;
    }
    let raw = (sample.offset / page + PAGE_EPSILON).floor();
    // NaN fails this too; +inf saturates below.
    if !(raw > 0.0) {
        return 0;
    }
    (raw as usize).min(item_count - 1)
}

/// Result of one [`ProgressTracker::update`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub progress: ProgressState,
    pub previous: Option<ProgressState>,
}

impl ProgressUpdate {
    /// `Some((from, to))` when the active item differs from the previous
    /// call. The first update always reports a change, from `None`.
    pub fn index_change(&self) -> Option<(Option<usize>, usize)> {
        let to = self.progress.active_item_index;
        match self.previous {
            Some(prev) if prev.active_item_index == to => None,
            Some(prev) => Some((Some(prev.active_item_index), to)),
            None => Some((None, to)),
        }
    }

    pub fn fraction_changed(&self) -> bool {
        self.previous
            .map_or(true, |prev| prev.fraction != self.progress.fraction)
    }

    pub fn is_unchanged(&self) -> bool {
        self.previous == Some(self.progress)
    }
}

/// Stateful wrapper around [`ProgressState::from_sample`] that detects
/// active-item changes.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    item_count: usize,
    last: Option<ProgressState>,
}

impl ProgressTracker {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            last: None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Latest state, `None` before the first sample.
    pub fn current(&self) -> Option<ProgressState> {
        self.last
    }

    pub fn update(&mut self, sample: ScrollSample) -> ProgressUpdate {
        let progress = ProgressState::from_sample(&sample, self.item_count);
        let previous = self.last.replace(progress);
        ProgressUpdate { progress, previous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: f64 = 800.0;

    #[test]
    fn fraction_follows_offset() {
        let sample = ScrollSample::new(1_100.0, PAGE, 3_000.0);
        let state = ProgressState::from_sample(&sample, 4);
        assert!((state.fraction - 0.5).abs() < 1e-12);
        assert_eq!(state.active_item_index, 1);
    }

    #[test]
    fn fraction_is_clamped() {
        let over = ScrollSample::new(10_000.0, PAGE, 3_200.0);
        assert_eq!(ProgressState::from_sample(&over, 4).fraction, 1.0);

        let under = ScrollSample::new(-250.0, PAGE, 3_200.0);
        let state = ProgressState::from_sample(&under, 4);
        assert_eq!(state.fraction, 0.0);
        assert_eq!(state.active_item_index, 0);
    }

    #[test]
    fn degenerate_geometry_is_zero() {
        let equal = ScrollSample::new(100.0, PAGE, PAGE);
        assert_eq!(ProgressState::from_sample(&equal, 1).fraction, 0.0);

        let empty = ScrollSample::new(0.0, 0.0, 0.0);
        let state = ProgressState::from_sample(&empty, 5);
        assert_eq!(state.fraction, 0.0);
        assert_eq!(state.active_item_index, 0);

        let nan = ScrollSample::new(f64::NAN, PAGE, 4_000.0);
        assert_eq!(ProgressState::from_sample(&nan, 5).fraction, 0.0);
    }

    #[test]
    fn infinite_offsets_clamp_to_the_ends() {
        let past_end = ScrollSample::new(f64::INFINITY, PAGE, 5.0 * PAGE);
        let state = ProgressState::from_sample(&past_end, 5);
        assert_eq!(state.fraction, 1.0);
        assert_eq!(state.active_item_index, 4);

        let before_start = ScrollSample::new(f64::NEG_INFINITY, PAGE, 5.0 * PAGE);
        let state = ProgressState::from_sample(&before_start, 5);
        assert_eq!(state.fraction, 0.0);
        assert_eq!(state.active_item_index, 0);

        let nan = ScrollSample::new(f64::NAN, PAGE, 5.0 * PAGE);
        assert_eq!(ProgressState::from_sample(&nan, 5).active_item_index, 0);
    }

    #[test]
    fn index_is_clamped_to_last_item() {
        let sample = ScrollSample::new(99.0 * PAGE, PAGE, 5.0 * PAGE);
        assert_eq!(ProgressState::from_sample(&sample, 5).active_item_index, 4);
    }

    #[test]
    fn page_aligned_sample_lands_on_its_page() {
        for index in 0..12 {
            let sample = ScrollSample::at_page(index, 844.0, 12);
            assert_eq!(
                ProgressState::from_sample(&sample, 12).active_item_index,
                index
            );
        }
    }

    #[test]
    fn first_update_reports_index_change() {
        let mut tracker = ProgressTracker::new(12);
        let update = tracker.update(ScrollSample::at_page(0, PAGE, 12));
        assert_eq!(update.index_change(), Some((None, 0)));
        assert!(update.fraction_changed());
    }

    #[test]
    fn fractional_moves_do_not_report_index_change() {
        let mut tracker = ProgressTracker::new(12);
        tracker.update(ScrollSample::new(0.0, PAGE, 12.0 * PAGE));

        let update = tracker.update(ScrollSample::new(300.0, PAGE, 12.0 * PAGE));
        assert!(update.fraction_changed());
        assert_eq!(update.index_change(), None);

        let update = tracker.update(ScrollSample::new(PAGE, PAGE, 12.0 * PAGE));
        assert_eq!(update.index_change(), Some((Some(0), 1)));
    }

    #[test]
    fn skipped_pages_report_only_the_latest() {
        let mut tracker = ProgressTracker::new(12);
        tracker.update(ScrollSample::at_page(1, PAGE, 12));
        let update = tracker.update(ScrollSample::at_page(6, PAGE, 12));
        assert_eq!(update.index_change(), Some((Some(1), 6)));
        assert_eq!(tracker.current().unwrap().active_item_index, 6);
    }

    #[test]
    fn repeated_sample_is_unchanged() {
        let mut tracker = ProgressTracker::new(3);
        let sample = ScrollSample::new(120.0, PAGE, 3.0 * PAGE);
        tracker.update(sample);
        let update = tracker.update(sample);
        assert!(update.is_unchanged());
        assert!(!update.fraction_changed());
    }
}
