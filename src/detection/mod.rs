//! Detection types, the detection source seam, and frame preprocessing.

mod nms;
mod preprocess;
mod replay;
mod source;
mod types;

pub use nms::suppress_overlaps;
pub use preprocess::{CropRatio, FramePreprocessor};
pub use replay::{ReplayTracker, TrackedFrame};
pub use source::DetectionSource;
pub use types::{BoundingBox, Detection};
