use serde_derive::{Deserialize, Serialize};

use crate::detection::ClassId;
use crate::error::Error;

/// Association engine parameters, fixed at startup.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackerConfig {
    /// Detections below this confidence never spawn tracks and only take
    /// part in the second, recovery matching pass.
    pub activation_threshold: f32,
    /// How long a missed track is kept alive before removal, in seconds.
    /// Converted once to a frame count using the source frame rate.
    pub lost_buffer_secs: f32,
    /// Minimum IoU between a predicted track box and a detection box for the
    /// pair to be an eligible match.
    pub min_matching_iou: f32,
    /// Consecutive matched frames before a tentative track is confirmed.
    pub min_consecutive_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 0.25,
            lost_buffer_secs: 1.0,
            min_matching_iou: 0.8,
            min_consecutive_frames: 3,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.activation_threshold) {
            return Err(Error::Config(format!(
                "activation_threshold {} outside [0, 1]",
                self.activation_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.min_matching_iou) {
            return Err(Error::Config(format!(
                "min_matching_iou {} outside [0, 1]",
                self.min_matching_iou
            )));
        }

        if self.lost_buffer_secs <= 0.0 || !self.lost_buffer_secs.is_finite() {
            return Err(Error::Config(format!(
                "lost_buffer_secs {} must be positive",
                self.lost_buffer_secs
            )));
        }

        if self.min_consecutive_frames == 0 {
            return Err(Error::Config(
                "min_consecutive_frames must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Lost-track buffer expressed as a frame count, at least one frame.
    pub(crate) fn lost_buffer_frames(&self, frame_rate: f32) -> u32 {
        (self.lost_buffer_secs * frame_rate).round().max(1.0) as u32
    }
}

/// The detector's class vocabulary, indexed by class id. Used once at
/// startup to resolve configured class names into ids.
#[derive(Debug, Clone)]
pub struct ClassVocabulary {
    names: Vec<String>,
}

impl ClassVocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.names
            .iter()
            .position(|n| n.as_str() == name)
            .map(|i| i as ClassId)
    }

    pub fn name_of(&self, id: ClassId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Maps an allow-list of class names to ids. A name missing from the
    /// vocabulary is a fatal configuration error.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ClassId>, Error> {
        names
            .iter()
            .map(|n| {
                self.id_of(n.as_ref())
                    .ok_or_else(|| Error::UnknownClass(n.as_ref().to_string()))
            })
            .collect()
    }
}
