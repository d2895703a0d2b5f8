mod segments;
mod tracker;

pub use segments::{project, SegmentReadout};
pub use tracker::{ProgressState, ProgressTracker, ProgressUpdate, ScrollSample};
