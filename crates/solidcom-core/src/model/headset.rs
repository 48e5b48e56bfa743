use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::CHANNEL_SLOTS;
use crate::error::CoreError;

// ── Talk mode ────────────────────────────────────────────────────────

/// How a headset's talk key behaves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TalkMode {
    /// Push-to-talk, listen always on.
    #[strum(to_string = "ptt-force-listen", serialize = "ptt")]
    PttForceListen,
    /// Latching talk, listen toggleable.
    TalkListen,
    /// Latching talk, listen always on.
    TalkForceListen,
}

impl TalkMode {
    /// The device's `talkMode` code.
    pub fn code(self) -> u8 {
        match self {
            Self::PttForceListen => 1,
            Self::TalkListen => 2,
            Self::TalkForceListen => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::PttForceListen),
            2 => Some(Self::TalkListen),
            3 => Some(Self::TalkForceListen),
            _ => None,
        }
    }

    /// Label shown to operators.
    pub fn label(self) -> &'static str {
        match self {
            Self::PttForceListen => "PTT & Force Listen",
            Self::TalkListen => "Talk & Listen",
            Self::TalkForceListen => "Talk & Force Listen",
        }
    }
}

// ── Bus label ────────────────────────────────────────────────────────

/// An intercom bus ("COM") a channel slot can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BusLabel {
    A,
    B,
}

impl BusLabel {
    /// The label as written into a headset's `channel` slots.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// ── Channel target ───────────────────────────────────────────────────

/// Where a bus should end up on a headset: a 1-based slot, or nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelTarget {
    Slot(u8),
    None,
}

impl ChannelTarget {
    /// Build from the numeric form, where `0` means "none".
    pub fn from_position(position: u8) -> Result<Self, CoreError> {
        match position {
            0 => Ok(Self::None),
            p if usize::from(p) <= CHANNEL_SLOTS => Ok(Self::Slot(p)),
            p => Err(CoreError::ValidationFailed {
                message: format!("channel position {p} is outside 0-{CHANNEL_SLOTS}"),
            }),
        }
    }

    /// Reject slots outside 1-6. `Slot(0)` is not an alias for `None`.
    pub fn validate(self) -> Result<Self, CoreError> {
        match self {
            Self::Slot(p) if p == 0 || usize::from(p) > CHANNEL_SLOTS => {
                Err(CoreError::ValidationFailed {
                    message: format!("channel slot {p} is outside 1-{CHANNEL_SLOTS}"),
                })
            }
            target => Ok(target),
        }
    }

    /// The numeric form, `0` for none.
    pub fn position(self) -> u8 {
        match self {
            Self::Slot(p) => p,
            Self::None => 0,
        }
    }

    /// Zero-based index into the `channel` array.
    pub(crate) fn index(self) -> Option<usize> {
        match self {
            Self::Slot(p) => usize::from(p).checked_sub(1),
            Self::None => None,
        }
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot(p) => write!(f, "CH {p}"),
            Self::None => f.write_str("None"),
        }
    }
}

impl FromStr for ChannelTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        let digits = s
            .strip_prefix("CH")
            .or_else(|| s.strip_prefix("ch"))
            .unwrap_or(s)
            .trim();
        let position: u8 = digits.parse().map_err(|_| CoreError::ValidationFailed {
            message: format!("invalid channel position: {s:?}"),
        })?;
        Self::from_position(position)
    }
}

// ── Headset selector ─────────────────────────────────────────────────

/// How a mutation names its headset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadsetSelector {
    Id(u32),
    Name(String),
}

impl HeadsetSelector {
    pub fn matches(&self, headset: &super::Headset) -> bool {
        match self {
            Self::Id(id) => headset.id == *id,
            Self::Name(name) => headset.name == *name,
        }
    }
}

impl fmt::Display for HeadsetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

impl From<u32> for HeadsetSelector {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for HeadsetSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for HeadsetSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn talk_mode_codes_round_trip() {
        for mode in TalkMode::iter() {
            assert_eq!(TalkMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(TalkMode::from_code(0), None);
        assert_eq!("ptt".parse::<TalkMode>().unwrap(), TalkMode::PttForceListen);
        assert_eq!(
            "Talk-Force-Listen".parse::<TalkMode>().unwrap(),
            TalkMode::TalkForceListen
        );
    }

    #[test]
    fn channel_target_zero_is_none() {
        assert_eq!(ChannelTarget::from_position(0).unwrap(), ChannelTarget::None);
        assert_eq!(ChannelTarget::from_position(6).unwrap(), ChannelTarget::Slot(6));
        assert!(ChannelTarget::from_position(7).is_err());
        assert_eq!(ChannelTarget::Slot(3).index(), Some(2));
        assert_eq!(ChannelTarget::None.index(), None);
    }

    #[test]
    fn channel_target_validation_rejects_out_of_range_slots() {
        assert_eq!(ChannelTarget::Slot(6).validate().unwrap(), ChannelTarget::Slot(6));
        assert_eq!(ChannelTarget::None.validate().unwrap(), ChannelTarget::None);
        assert!(ChannelTarget::Slot(0).validate().is_err());
        assert!(ChannelTarget::Slot(9).validate().is_err());
    }

    #[test]
    fn channel_target_parses_labels() {
        assert_eq!("none".parse::<ChannelTarget>().unwrap(), ChannelTarget::None);
        assert_eq!("CH 2".parse::<ChannelTarget>().unwrap(), ChannelTarget::Slot(2));
        assert_eq!("4".parse::<ChannelTarget>().unwrap(), ChannelTarget::Slot(4));
        assert!("x".parse::<ChannelTarget>().is_err());
    }

    #[test]
    fn bus_label_parses_case_insensitively() {
        assert_eq!("b".parse::<BusLabel>().unwrap(), BusLabel::B);
        assert_eq!(BusLabel::A.as_str(), "A");
    }
}
