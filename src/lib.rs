//! Tracking-by-detection core for road surface defects.
//!
//! Consumes per-frame detection sets from an external detector, maintains
//! persistent track identities across frames and counts, exactly once per
//! traversal, tracks crossing a fixed reference line. Detection, video I/O
//! and rendering are external collaborators behind the [`Detect`] seam.

pub mod bbox;
pub mod config;
pub mod detection;
pub mod error;
pub mod line;
pub mod matching;
pub mod pipeline;
pub mod table;
pub mod track;
pub mod tracker;

mod circular_queue;
mod motion;

pub use bbox::BBox;
pub use config::{ClassVocabulary, TrackerConfig};
pub use detection::{filter_classes, ClassId, Detection};
pub use error::Error;
pub use line::{CrossingEvent, Direction, LineCounter, ReferenceLine, Side};
pub use pipeline::{Detect, FrameOutput, Pipeline};
pub use table::TrackTable;
pub use track::{Track, TrackId, TrackState};
pub use tracker::Tracker;
