// ── Position domain types ──
//
// Positions are percentages. The hub and the host may disagree about which
// end of the scale means "open"; `Orientation` converts between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A covering position in percent, always within `0..=100`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Returns `None` when `value` exceeds 100.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Clamp an arbitrary integer (e.g. a raw hub reading) into range.
    pub fn clamped(raw: i64) -> Self {
        let bounded = raw.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u8::try_from(bounded).unwrap_or(Self::MAX.0))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Mirror the position on the 0–100 scale: `100 - p`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self(Self::MIN.0 + Self::MAX.0 - self.0)
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("position {value} is outside 0..=100"))
    }
}

impl From<Position> for u8 {
    fn from(p: Position) -> Self {
        p.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Orientation ─────────────────────────────────────────────────────

/// How host-facing positions relate to the hub's raw scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Normal,
    /// Host sees `100 - raw` for every value.
    Inverted,
}

impl Orientation {
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted { Self::Inverted } else { Self::Normal }
    }

    pub fn is_inverted(self) -> bool {
        matches!(self, Self::Inverted)
    }

    /// Host orientation -> raw hub value.
    pub fn to_hub(self, position: Position) -> Position {
        match self {
            Self::Normal => position,
            Self::Inverted => position.reversed(),
        }
    }

    /// Raw hub value -> host orientation.
    pub fn from_hub(self, raw: Position) -> Position {
        // The transform is its own inverse.
        self.to_hub(raw)
    }
}

// ── PositionState ───────────────────────────────────────────────────

/// Inferred direction of travel. Never reported by the hub.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PositionState {
    Decreasing,
    Increasing,
    #[default]
    Stopped,
}

impl PositionState {
    /// Direction of a move from `last` toward `target`. Equal positions
    /// count as increasing.
    pub fn toward(target: Position, last: Position) -> Self {
        if target >= last {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }

    /// Numeric value used by HomeKit-style hosts.
    pub fn hap_value(self) -> u8 {
        match self {
            Self::Decreasing => 0,
            Self::Increasing => 1,
            Self::Stopped => 2,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for raw in 0..=100u8 {
            let p = Position::new(raw).unwrap();
            assert_eq!(p.reversed().reversed(), p);
            assert_eq!(p.reversed().value(), 100 - raw);
        }
    }

    #[test]
    fn reverse_fixed_points() {
        assert_eq!(Position::MIN.reversed(), Position::MAX);
        assert_eq!(Position::MAX.reversed(), Position::MIN);
        assert_eq!(Position::new(50).unwrap().reversed().value(), 50);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Position::new(101).is_none());
        assert!(Position::try_from(200).is_err());
    }

    #[test]
    fn clamped_bounds_raw_values() {
        assert_eq!(Position::clamped(-5), Position::MIN);
        assert_eq!(Position::clamped(150), Position::MAX);
        assert_eq!(Position::clamped(42).value(), 42);
    }

    #[test]
    fn orientation_round_trip() {
        let p = Position::new(30).unwrap();
        assert_eq!(Orientation::Inverted.to_hub(p).value(), 70);
        assert_eq!(Orientation::Inverted.from_hub(Position::new(70).unwrap()), p);
        assert_eq!(Orientation::Normal.to_hub(p), p);
    }

    #[test]
    fn direction_inference() {
        let thirty = Position::new(30).unwrap();
        let seventy = Position::new(70).unwrap();
        assert_eq!(PositionState::toward(seventy, thirty), PositionState::Increasing);
        assert_eq!(PositionState::toward(thirty, seventy), PositionState::Decreasing);
        assert_eq!(PositionState::toward(thirty, thirty), PositionState::Increasing);
    }

    #[test]
    fn position_state_parses_from_str() {
        let s: PositionState = "stopped".parse().unwrap();
        assert_eq!(s, PositionState::Stopped);
        assert_eq!(PositionState::Increasing.to_string(), "increasing");
        assert_eq!(PositionState::Stopped.hap_value(), 2);
    }

    #[test]
    fn position_deserializes_with_range_check() {
        let p: Position = serde_json::from_str("40").unwrap();
        assert_eq!(p.value(), 40);
        assert!(serde_json::from_str::<Position>("101").is_err());
    }
}
