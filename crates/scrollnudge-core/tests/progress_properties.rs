//! Property tests for the progress math.

use proptest::prelude::*;
use scrollnudge_core::{project, ProgressState, ProgressTracker, ScrollSample, SegmentReadout};

proptest! {
    #[test]
    fn fraction_stays_in_unit_interval(
        offset in -1.0e7f64..1.0e7,
        viewport in 0.0f64..5_000.0,
        content in 0.0f64..1.0e6,
        item_count in 1usize..200,
    ) {
        let state = ProgressState::from_sample(&ScrollSample::new(offset, viewport, content), item_count);
        prop_assert!((0.0..=1.0).contains(&state.fraction));
        prop_assert!(state.active_item_index < item_count);
    }

    #[test]
    fn fraction_survives_any_float(
        offset in any::<f64>(),
        viewport in any::<f64>(),
        content in any::<f64>(),
    ) {
        let state = ProgressState::from_sample(&ScrollSample::new(offset, viewport, content), 10);
        prop_assert!((0.0..=1.0).contains(&state.fraction));
        prop_assert!(state.active_item_index < 10);
    }

    #[test]
    fn segment_sum_matches_fraction(
        fraction in 0.0f64..=1.0,
        segment_count in 1usize..=50,
    ) {
        let readout = SegmentReadout::from_fraction(fraction, segment_count);
        prop_assert_eq!(readout.len(), segment_count);
        prop_assert!((readout.sum() - fraction * segment_count as f64).abs() < 1e-9);
        prop_assert!(readout.segments.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn segments_are_lit_front_to_back(
        fraction in 0.0f64..=1.0,
        segment_count in 1usize..=50,
    ) {
        let readout = project(&ProgressState { fraction, active_item_index: 0 }, segment_count);
        prop_assert!(readout.segments.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn index_change_reported_only_when_index_moves(
        offsets in prop::collection::vec(0.0f64..12_000.0, 1..60),
    ) {
        let mut tracker = ProgressTracker::new(12);
        let mut last_index: Option<usize> = None;
        for offset in offsets {
            let update = tracker.update(ScrollSample::new(offset, 1_000.0, 12_000.0));
            let index = update.progress.active_item_index;
            match update.index_change() {
                Some((from, to)) => {
                    prop_assert_eq!(from, last_index);
                    prop_assert_eq!(to, index);
                    prop_assert_ne!(Some(index), last_index);
                }
                None => prop_assert_eq!(Some(index), last_index),
            }
            last_index = Some(index);
        }
    }
}
