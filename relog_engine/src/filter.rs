//! Lines removed before any rewriting happens.

use std::fmt;

const FAILED_CAST: &str = " fails casting ";

/// Why a line was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    UnwantedMarker(String),
    FailedCast,
    CastNoise,
    /// A rewrite rule erased the whole line.
    Erased,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnwantedMarker(marker) => write!(f, "unwanted event type {marker}"),
            DropReason::FailedCast => f.write_str("failed cast"),
            DropReason::CastNoise => f.write_str("cast start, channel or off-list spell id"),
            DropReason::Erased => f.write_str("erased by rewrite rule"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    markers: Vec<String>,
    drop_all_failed_casts: bool,
}

impl LineFilter {
    pub fn new(markers: &[String], drop_all_failed_casts: bool) -> Self {
        Self {
            markers: markers.to_vec(),
            drop_all_failed_casts,
        }
    }

    pub fn check(&self, line: &str) -> Option<DropReason> {
        if let Some(marker) = self.markers.iter().find(|m| line.contains(m.as_str())) {
            return Some(DropReason::UnwantedMarker(marker.clone()));
        }
        if self.drop_all_failed_casts && line.contains(FAILED_CAST) {
            return Some(DropReason::FailedCast);
        }
        None
    }
}
