//! Bipartite matching between predicted track boxes and detections.
//!
//! Pure function of its inputs: greedy by descending IoU, deterministic
//! tie-breaks by higher detection confidence, then lower track id, then
//! detection input order.

use crate::bbox::BBox;
use crate::detection::Detection;
use crate::track::TrackId;

#[derive(Debug, Default, PartialEq)]
pub struct Assignment {
    /// Matched `(track index, detection index)` pairs into the input slices.
    pub matches: Vec<(usize, usize)>,
    /// Track indexes left unmatched, in input order.
    pub unmatched_tracks: Vec<usize>,
    /// Detection indexes left unmatched, in input order.
    pub unmatched_dets: Vec<usize>,
}

/// Matches predicted track boxes against a detection set. Only pairs whose
/// IoU exceeds `min_iou` are eligible.
pub fn assign(tracks: &[(TrackId, BBox)], dets: &[Detection], min_iou: f32) -> Assignment {
    let mut pairs: Vec<(f32, usize, usize)> = Vec::new();

    for (ti, (_, tbox)) in tracks.iter().enumerate() {
        for (di, det) in dets.iter().enumerate() {
            let iou = tbox.iou(&det.bbox);
            if iou > min_iou {
                pairs.push((iou, ti, di));
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| dets[b.2].confidence.total_cmp(&dets[a.2].confidence))
            .then_with(|| tracks[a.1].0.cmp(&tracks[b.1].0))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut track_taken = vec![false; tracks.len()];
    let mut det_taken = vec![false; dets.len()];
    let mut matches = Vec::new();

    for (_, ti, di) in pairs {
        if track_taken[ti] || det_taken[di] {
            continue;
        }

        track_taken[ti] = true;
        det_taken[di] = true;
        matches.push((ti, di));
    }

    Assignment {
        matches,
        unmatched_tracks: (0..tracks.len()).filter(|&i| !track_taken[i]).collect(),
        unmatched_dets: (0..dets.len()).filter(|&i| !det_taken[i]).collect(),
    }
}
