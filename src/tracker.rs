use crate::bbox::BBox;
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::error::Error;
use crate::matching::assign;
use crate::table::TrackTable;
use crate::track::TrackId;

/// Association engine: maintains the correspondence between per-frame
/// detections and live tracks. Sole writer of the track table; the
/// crossing counter reads it after each `update` completes.
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    lost_buffer_frames: u32,
    table: TrackTable,
}

impl Tracker {
    pub fn new(config: TrackerConfig, frame_rate: f32) -> Result<Self, Error> {
        config.validate()?;

        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(Error::Config(format!(
                "frame rate {} must be positive",
                frame_rate
            )));
        }

        let lost_buffer_frames = config.lost_buffer_frames(frame_rate);

        Ok(Self {
            config,
            lost_buffer_frames,
            table: TrackTable::new(),
        })
    }

    /// Runs one association pass. An empty detection set simply ages every
    /// track.
    ///
    /// Matching runs in two stages: detections at or above the activation
    /// threshold are matched against all tracks first, then the tracks left
    /// unmatched get a second chance against the low-confidence remainder.
    /// Low-confidence detections can sustain an existing track through a
    /// weak frame but never spawn a new one.
    pub fn update(&mut self, dets: &[Detection], frame: u64) {
        for entity in self.table.iter_mut() {
            entity.predict();
        }

        let (strong, weak): (Vec<Detection>, Vec<Detection>) = dets
            .iter()
            .copied()
            .partition(|d| d.confidence >= self.config.activation_threshold);

        let track_boxes: Vec<(TrackId, BBox)> = self
            .table
            .iter()
            .map(|t| (t.id, t.predicted_bbox()))
            .collect();

        let first = assign(&track_boxes, &strong, self.config.min_matching_iou);
        for &(ti, di) in &first.matches {
            self.apply_match(track_boxes[ti].0, &strong[di], frame);
        }

        let leftover_tracks: Vec<(TrackId, BBox)> = first
            .unmatched_tracks
            .iter()
            .map(|&i| track_boxes[i])
            .collect();

        let second = assign(&leftover_tracks, &weak, self.config.min_matching_iou);
        for &(ti, di) in &second.matches {
            self.apply_match(leftover_tracks[ti].0, &weak[di], frame);
        }

        for &di in &first.unmatched_dets {
            self.table.spawn(&strong[di], frame);
        }

        let missed: Vec<TrackId> = second
            .unmatched_tracks
            .iter()
            .map(|&i| leftover_tracks[i].0)
            .collect();

        for id in missed {
            let expired = self
                .table
                .get_mut(id)
                .map(|t| t.apply_miss(self.lost_buffer_frames))
                .unwrap_or(false);

            if expired {
                self.table.remove(id);
            }
        }
    }

    fn apply_match(&mut self, id: TrackId, det: &Detection, frame: u64) {
        if let Some(entity) = self.table.get_mut(id) {
            entity.apply_match(det, frame, self.config.min_consecutive_frames);
        }
    }

    #[inline]
    pub fn table(&self) -> &TrackTable {
        &self.table
    }

    #[inline]
    pub(crate) fn table_mut(&mut self) -> &mut TrackTable {
        &mut self.table
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrackerConfig {
        TrackerConfig {
            activation_threshold: 0.5,
            lost_buffer_secs: 0.5,
            min_matching_iou: 0.3,
            min_consecutive_frames: 3,
        }
    }

    // lost buffer is 5 frames
    fn tracker() -> Tracker {
        Tracker::new(config(), 10.0).unwrap()
    }

    fn det_at(x: f32, confidence: f32) -> Detection {
        Detection::new(BBox::from_center(x, 100.0, 60.0, 60.0), 1, confidence)
    }

    fn only_id(t: &Tracker) -> TrackId {
        let ids: Vec<_> = t.table().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 1);
        ids[0]
    }

    #[test]
    fn identity_is_stable_under_smooth_motion() {
        let mut t = tracker();

        t.update(&[det_at(0.0, 0.9)], 1);
        let id = only_id(&t);

        for frame in 2..=20 {
            t.update(&[det_at(frame as f32 * 4.0, 0.9)], frame);
            assert_eq!(only_id(&t), id);
        }

        assert!(t.table().get(id).unwrap().is_confirmed());
    }

    #[test]
    fn occlusion_shorter_than_the_buffer_recovers_the_same_id() {
        let mut t = tracker();

        for frame in 1..=6 {
            t.update(&[det_at(frame as f32 * 4.0, 0.9)], frame);
        }
        let id = only_id(&t);

        // four missed frames, within the 5-frame buffer
        for frame in 7..=10 {
            t.update(&[], frame);
        }
        assert!(t.table().contains(id));

        // reappears where constant velocity predicts it
        t.update(&[det_at(11.0 * 4.0, 0.9)], 11);
        assert_eq!(only_id(&t), id);
    }

    #[test]
    fn track_expires_past_the_buffer_and_never_returns() {
        let mut t = tracker();

        for frame in 1..=4 {
            t.update(&[det_at(100.0, 0.9)], frame);
        }
        let id = only_id(&t);

        for frame in 5..=10 {
            t.update(&[], frame);
        }
        assert!(t.table().is_empty());

        // same location again: a fresh identity
        t.update(&[det_at(100.0, 0.9)], 11);
        let new_id = only_id(&t);
        assert_ne!(new_id, id);
        assert!(new_id > id);
    }

    #[test]
    fn low_confidence_detections_do_not_spawn_tracks() {
        let mut t = tracker();

        t.update(&[det_at(0.0, 0.3)], 1);
        assert!(t.table().is_empty());
    }

    #[test]
    fn low_confidence_frames_sustain_an_existing_track() {
        let mut t = tracker();

        for frame in 1..=4 {
            t.update(&[det_at(frame as f32 * 4.0, 0.9)], frame);
        }
        let id = only_id(&t);

        // brief low-confidence stretch: second-stage matching keeps the
        // track fed instead of letting it age
        for frame in 5..=7 {
            t.update(&[det_at(frame as f32 * 4.0, 0.3)], frame);
            let entity = t.table().get(id).unwrap();
            assert_eq!(entity.misses, 0);
        }

        t.update(&[det_at(32.0, 0.9)], 8);
        assert_eq!(only_id(&t), id);
    }

    #[test]
    fn empty_frames_age_all_tracks() {
        let mut t = tracker();
        t.update(&[det_at(0.0, 0.9)], 1);
        let id = only_id(&t);

        t.update(&[], 2);
        assert_eq!(t.table().get(id).unwrap().misses, 1);
    }

    #[test]
    fn two_objects_keep_distinct_identities() {
        let mut t = tracker();

        t.update(&[det_at(0.0, 0.9), det_at(300.0, 0.8)], 1);
        let mut ids: Vec<_> = t.table().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids.len(), 2);

        for frame in 2..=10 {
            let dx = frame as f32 * 4.0;
            t.update(&[det_at(dx, 0.9), det_at(300.0 - dx, 0.8)], frame);

            let mut now: Vec<_> = t.table().iter().map(|e| e.id).collect();
            now.sort_unstable();
            assert_eq!(now, ids);
        }
    }

    #[test]
    fn invalid_frame_rate_is_fatal() {
        assert!(Tracker::new(config(), 0.0).is_err());
        assert!(Tracker::new(config(), f32::NAN).is_err());
    }
}
