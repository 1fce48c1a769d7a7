//! Detection type definitions.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
///
/// Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl BoundingBox {
    /// Create a box from its corner coordinates.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal extent. Negative for degenerate boxes.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent. Negative for degenerate boxes.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Signed area (`width * height`).
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Same box moved down by `dy` pixels.
    #[must_use]
    pub fn shifted_y(&self, dy: f64) -> Self {
        Self {
            y1: self.y1 + dy,
            y2: self.y2 + dy,
            ..*self
        }
    }

    /// Intersection over union with another box, 0.0 when either is empty.
    pub fn iou(&self, other: &Self) -> f64 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let intersection = w * h;
        let union = self.area().max(0.0) + other.area().max(0.0) - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One tracked bird in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Identity token assigned by the tracker.
    pub track_id: i64,
    /// Box in original-frame coordinates once remapped.
    pub bbox: BoundingBox,
    /// Detector confidence (0.0 - 1.0), if the tracker reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Weight estimate attached after detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_weight_kg: Option<f64>,
}

impl Detection {
    /// Create a detection without a weight estimate.
    pub const fn new(track_id: i64, bbox: BoundingBox, confidence: Option<f32>) -> Self {
        Self {
            track_id,
            bbox,
            confidence,
            estimated_weight_kg: None,
        }
    }
}
