//! Greedy non-maximum suppression.

use crate::detection::Detection;
use std::cmp::Ordering;

/// Drop detections that overlap a higher-confidence detection by more than
/// `iou_threshold`.
///
/// Class-agnostic. Detections without a confidence rank below any scored
/// detection. Survivors are returned in descending confidence order.
pub fn suppress_overlaps(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let threshold = f64::from(iou_threshold);
    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for det in detections {
        if kept.iter().all(|k| k.bbox.iou(&det.bbox) <= threshold) {
            kept.push(det);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    fn det(id: i64, x1: f64, conf: Option<f32>) -> Detection {
        Detection::new(id, BoundingBox::new(x1, 0.0, x1 + 10.0, 10.0), conf)
    }

    #[test]
    fn test_overlapping_lower_confidence_is_dropped() {
        let kept = suppress_overlaps(vec![det(1, 0.0, Some(0.6)), det(2, 1.0, Some(0.9))], 0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].track_id, 2);
    }

    #[test]
    fn test_disjoint_boxes_survive() {
        let kept = suppress_overlaps(vec![det(1, 0.0, Some(0.6)), det(2, 50.0, Some(0.9))], 0.5);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_unscored_detection_ranks_last() {
        let kept = suppress_overlaps(vec![det(1, 0.0, None), det(2, 1.0, Some(0.1))], 0.5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].track_id, 2);
    }
}
