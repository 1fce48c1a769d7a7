//! Frame input and annotated frame output.
//!
//! Video decoding and encoding stay outside this crate: a video is a
//! directory of decoded frame images, and annotated output is written back
//! as a directory of PNG frames.

mod annotate;
mod sequence;

pub use annotate::{AnnotatedFrameWriter, draw_detections};
pub use sequence::{FrameSequence, is_frame_file};
