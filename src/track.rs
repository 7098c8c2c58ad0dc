use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::circular_queue::CircularQueue;
use crate::detection::{ClassId, Detection};
use crate::line::Side;
use crate::motion::Motion;

pub type TrackId = u64;

/// Recent detections kept per track.
const HISTORY_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Newly spawned, not yet observed for enough consecutive frames.
    Tentative,
    /// Observed for at least the configured number of consecutive frames.
    Confirmed,
    /// Missed beyond the lost-track buffer; removed from the table.
    Lost,
}

/// Public per-frame snapshot of a confirmed track, handed to the rendering
/// collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub class: ClassId,
    pub confidence: f32,
    pub bbox: BBox,
}

/// Internal track entity, owned by the track table.
#[derive(Debug, Clone)]
pub(crate) struct TrackEntity {
    pub id: TrackId,
    pub class: ClassId,
    pub state: TrackState,
    pub motion: Motion,
    /// Consecutive matched frames; reset on a miss.
    pub hits: u32,
    /// Consecutive missed frames; reset on a match.
    pub misses: u32,
    /// Half-plane the track currently occupies relative to the reference
    /// line, `Unknown` before the first evaluation.
    pub side: Side,
    history: CircularQueue<(u64, Detection)>,
}

impl TrackEntity {
    pub fn new(id: TrackId, det: &Detection, frame: u64) -> Self {
        let mut history = CircularQueue::with_capacity(HISTORY_LEN);
        history.push((frame, *det));

        debug!(
            "frame {}: spawned tentative track {} (class {})",
            frame, id, det.class
        );

        Self {
            id,
            class: det.class,
            state: TrackState::Tentative,
            motion: Motion::new(&det.bbox),
            hits: 1,
            misses: 0,
            side: Side::Unknown,
            history,
        }
    }

    /// Advances the motion state one frame.
    pub fn predict(&mut self) {
        self.motion.predict();
    }

    pub fn predicted_bbox(&self) -> BBox {
        self.motion.predicted_bbox()
    }

    /// Last observed detection box.
    pub fn bbox(&self) -> BBox {
        self.history
            .latest()
            .map(|(_, d)| d.bbox)
            .unwrap_or_else(|| self.motion.predicted_bbox())
    }

    /// Applies a matched detection: corrects motion, refreshes class and
    /// confidence, and promotes the track once it has been observed for
    /// `min_consecutive_frames` in a row.
    pub fn apply_match(&mut self, det: &Detection, frame: u64, min_consecutive_frames: u32) {
        self.motion.correct(&det.bbox, self.misses + 1);
        self.hits += 1;
        self.misses = 0;
        self.class = det.class;
        self.history.push((frame, *det));

        if self.state == TrackState::Tentative && self.hits >= min_consecutive_frames {
            self.state = TrackState::Confirmed;
            debug!("frame {}: track {} confirmed", frame, self.id);
        }
    }

    /// Ages the track one unmatched frame. Returns true once the miss count
    /// exceeds the lost-track buffer and the track must be removed.
    pub fn apply_miss(&mut self, lost_buffer_frames: u32) -> bool {
        self.hits = 0;
        self.misses += 1;

        if self.misses > lost_buffer_frames {
            self.state = TrackState::Lost;
            debug!("track {} lost after {} missed frames", self.id, self.misses);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    /// Reported confidence is the mean over the recent detection history,
    /// which smooths out single-frame dips.
    pub fn snapshot(&self) -> Track {
        let n = self.history.len().max(1) as f32;
        let confidence = self.history.iter().map(|(_, d)| d.confidence).sum::<f32>() / n;

        Track {
            id: self.id,
            class: self.class,
            confidence,
            bbox: self.bbox(),
        }
    }
}
