use thiserror::Error;

/// Fatal configuration errors, surfaced at startup. Per-frame anomalies
/// (empty detection sets, degenerate boxes) are recovered locally and never
/// reach this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("class name {0:?} is not in the detector vocabulary")]
    UnknownClass(String),

    #[error("reference line has a zero-length direction vector")]
    DegenerateLine,

    #[error("invalid configuration: {0}")]
    Config(String),
}
