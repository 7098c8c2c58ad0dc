//! Reference line and crossing counter.
//!
//! Direction convention: the line is directed from `start` to `end`. With
//! image coordinates (y down), a track whose anchor moves from the negative
//! half-plane to the positive one crosses `In`, the reverse crosses `Out`.
//! For the canonical horizontal line (50, 1500) -> (3790, 1500) this counts
//! a defect passing downward through the line as `In`.

use log::debug;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::table::TrackTable;
use crate::track::TrackId;

/// Half-plane occupied by a track relative to the reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Not evaluated yet, or the anchor sat exactly on the line.
    Unknown,
    Positive,
    Negative,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// Emitted at most once per side transition of a confirmed track.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    pub track_id: TrackId,
    pub direction: Direction,
    pub frame: u64,
}

/// Directed line segment partitioning the frame into two half-planes.
#[derive(Debug, Clone)]
pub struct ReferenceLine {
    start: na::Point2<f32>,
    dir: na::Vector2<f32>,
}

impl ReferenceLine {
    pub fn new(start: (f32, f32), end: (f32, f32)) -> Result<Self, Error> {
        let start = na::Point2::new(start.0, start.1);
        let end = na::Point2::new(end.0, end.1);
        let dir = end - start;

        if dir.norm_squared() <= f32::EPSILON {
            return Err(Error::DegenerateLine);
        }

        Ok(Self { start, dir })
    }

    /// Sign of the cross product between the line direction and the vector
    /// from the line start to `p`. An anchor exactly on the line maps to
    /// `Unknown`, which leaves the caller's stored side untouched.
    pub fn side_of(&self, p: na::Point2<f32>) -> Side {
        let to_p = p - self.start;
        let cross = self.dir.x * to_p.y - self.dir.y * to_p.x;

        if cross > 0.0 {
            Side::Positive
        } else if cross < 0.0 {
            Side::Negative
        } else {
            Side::Unknown
        }
    }
}

/// Evaluates confirmed tracks against the reference line and emits each
/// side transition exactly once, keeping running in/out totals.
#[derive(Debug)]
pub struct LineCounter {
    line: ReferenceLine,
    in_count: u64,
    out_count: u64,
}

impl LineCounter {
    pub fn new(line: ReferenceLine) -> Self {
        Self {
            line,
            in_count: 0,
            out_count: 0,
        }
    }

    /// Runs once per frame, strictly after the association pass. Side state
    /// is refreshed for every live track, tentative ones included, so the
    /// first confirmed evaluation already has a seeded previous side; events
    /// are only emitted for confirmed tracks with a known previous side.
    pub fn update(&mut self, table: &mut TrackTable, frame: u64) -> Vec<CrossingEvent> {
        let mut events = Vec::new();

        for entity in table.iter_mut() {
            let side = self.line.side_of(entity.bbox().bottom_center());
            if side == Side::Unknown {
                // anchor exactly on the line, keep the previous side
                continue;
            }

            let prev = entity.side;
            entity.side = side;

            if !entity.is_confirmed() || prev == Side::Unknown || prev == side {
                continue;
            }

            let direction = match (prev, side) {
                (Side::Negative, Side::Positive) => Direction::In,
                (Side::Positive, Side::Negative) => Direction::Out,
                _ => unreachable!("prev and side are known and unequal"),
            };

            match direction {
                Direction::In => self.in_count += 1,
                Direction::Out => self.out_count += 1,
            }

            debug!(
                "frame {}: track {} crossed {:?} (in={}, out={})",
                frame, entity.id, direction, self.in_count, self.out_count
            );

            events.push(CrossingEvent {
                track_id: entity.id,
                direction,
                frame,
            });
        }

        events
    }

    #[inline]
    pub fn in_count(&self) -> u64 {
        self.in_count
    }

    #[inline]
    pub fn out_count(&self) -> u64 {
        self.out_count
    }

    #[inline]
    pub fn line(&self) -> &ReferenceLine {
        &self.line
    }
}
