use log::warn;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;

/// Detector class identifier, an index into the model's class vocabulary.
pub type ClassId = u32;

/// One detector output for one frame. Ephemeral: consumed by association
/// and discarded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub bbox: BBox,
    #[serde(rename = "c")]
    pub class: ClassId,
    #[serde(rename = "p")]
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BBox, class: ClassId, confidence: f32) -> Self {
        Self {
            bbox,
            class,
            confidence,
        }
    }
}

/// Restricts a detection set to the allow-listed classes, preserving input
/// order. An empty allow-list yields an empty result.
pub fn filter_classes(dets: &[Detection], allow: &[ClassId]) -> Vec<Detection> {
    dets.iter()
        .filter(|d| allow.contains(&d.class))
        .copied()
        .collect()
}

/// Drops boxes with zero or negative area before they reach matching.
/// A recovered input anomaly, not an error.
pub(crate) fn drop_degenerate(dets: Vec<Detection>, frame: u64) -> Vec<Detection> {
    dets.into_iter()
        .filter(|d| {
            if d.bbox.is_degenerate() {
                warn!(
                    "frame {}: dropping degenerate detection box {:?} (class {})",
                    frame, d.bbox, d.class
                );
                false
            } else {
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class: ClassId) -> Detection {
        Detection::new(BBox::ltrb(0.0, 0.0, 10.0, 10.0), class, 0.9)
    }

    #[test]
    fn filter_preserves_order() {
        let dets = vec![det(0), det(2), det(1), det(2), det(3)];
        let kept = filter_classes(&dets, &[2, 3]);

        assert_eq!(
            kept.iter().map(|d| d.class).collect::<Vec<_>>(),
            vec![2, 2, 3]
        );
    }

    #[test]
    fn empty_allow_list_yields_empty_result() {
        let dets = vec![det(0), det(1)];
        assert!(filter_classes(&dets, &[]).is_empty());
    }

    #[test]
    fn degenerate_boxes_are_dropped() {
        let good = det(0);
        let bad = Detection::new(BBox::ltrb(5.0, 5.0, 5.0, 15.0), 0, 0.9);
        let kept = drop_degenerate(vec![good, bad], 1);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox, good.bbox);
    }
}
