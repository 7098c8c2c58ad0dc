use crate::config::TrackerConfig;
use crate::detection::{drop_degenerate, filter_classes, ClassId, Detection};
use crate::error::Error;
use crate::line::{CrossingEvent, LineCounter, ReferenceLine};
use crate::track::Track;
use crate::tracker::Tracker;

/// Seam for the external object detector. Any implementation producing a
/// detection set for a raw frame is substitutable; the core never looks
/// inside `F`.
pub trait Detect<F> {
    type Error;

    fn detect(&mut self, frame: &F) -> Result<Vec<Detection>, Self::Error>;
}

/// What the core hands to the rendering/export collaborator each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    /// All confirmed tracks, ascending id.
    pub tracks: Vec<Track>,
    /// Crossing events emitted this frame.
    pub events: Vec<CrossingEvent>,
}

/// Drives one frame at a time through the fixed step order: detect, filter
/// classes, drop degenerate boxes, associate, evaluate crossings. Owns all
/// mutable state; independent pipelines share nothing.
pub struct Pipeline<D> {
    detector: D,
    tracker: Tracker,
    counter: LineCounter,
    allowed_classes: Vec<ClassId>,
    frame_index: u64,
}

impl<D> Pipeline<D> {
    pub fn new(
        detector: D,
        config: TrackerConfig,
        frame_rate: f32,
        line: ReferenceLine,
        allowed_classes: Vec<ClassId>,
    ) -> Result<Self, Error> {
        Ok(Self {
            detector,
            tracker: Tracker::new(config, frame_rate)?,
            counter: LineCounter::new(line),
            allowed_classes,
            frame_index: 0,
        })
    }

    /// Runs one frame through the detector and the core. Detector errors
    /// belong to the collaborator and are passed through untouched.
    pub fn process_frame<F>(&mut self, frame: &F) -> Result<FrameOutput, D::Error>
    where
        D: Detect<F>,
    {
        let dets = self.detector.detect(frame)?;
        Ok(self.process_detections(dets))
    }

    /// Core entry point for detections that were produced elsewhere
    /// (pre-recorded detection dumps, tests).
    pub fn process_detections(&mut self, dets: Vec<Detection>) -> FrameOutput {
        self.frame_index += 1;
        let frame = self.frame_index;

        let dets = filter_classes(&dets, &self.allowed_classes);
        let dets = drop_degenerate(dets, frame);

        self.tracker.update(&dets, frame);
        let events = self.counter.update(self.tracker.table_mut(), frame);

        FrameOutput {
            frame,
            tracks: self.tracker.table().snapshot(),
            events,
        }
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn in_count(&self) -> u64 {
        self.counter.in_count()
    }

    #[inline]
    pub fn out_count(&self) -> u64 {
        self.counter.out_count()
    }

    #[inline]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    #[inline]
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}
