//! Tournament phases and formats.
//!
//! A format is a closed set of variants, each supplying its own phase
//! transition table. There is exactly one format today; adding another
//! means adding a variant and the compiler will point at every match that
//! needs a decision.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use draftleague_core::DomainError;

/// Tournament lifecycle phase, in strict forward order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Initialization,
    Registration,
    Draft,
    Rounds,
    Ended,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initialization => "initialization",
            Phase::Registration => "registration",
            Phase::Draft => "draft",
            Phase::Rounds => "rounds",
            Phase::Ended => "ended",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tournament format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Cube draft: initialization → registration → draft → rounds → ended.
    Cube,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Cube => "cube",
        }
    }

    /// The phase "end phase" advances to from `current`, or `None` when the
    /// current phase is terminal.
    pub fn next_phase(self, current: Phase) -> Option<Phase> {
        match self {
            Format::Cube => match current {
                Phase::Initialization => Some(Phase::Registration),
                Phase::Registration => Some(Phase::Draft),
                Phase::Draft => Some(Phase::Rounds),
                Phase::Rounds => Some(Phase::Ended),
                Phase::Ended => None,
            },
        }
    }
}

impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(Format::Cube),
            other => Err(DomainError::invalid_argument(format!(
                "format not recognized: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_walks_phases_in_strict_forward_order() {
        let f = Format::Cube;
        assert_eq!(f.next_phase(Phase::Initialization), Some(Phase::Registration));
        assert_eq!(f.next_phase(Phase::Registration), Some(Phase::Draft));
        assert_eq!(f.next_phase(Phase::Draft), Some(Phase::Rounds));
        assert_eq!(f.next_phase(Phase::Rounds), Some(Phase::Ended));
        assert_eq!(f.next_phase(Phase::Ended), None);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "sealed".parse::<Format>().unwrap_err();
        assert_eq!(err.kind(), "invalid-argument");
    }
}
