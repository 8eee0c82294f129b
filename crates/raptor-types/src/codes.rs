//! Typed views over the coded bytes carried by race-control messages.
//!
//! The wire keeps `flags` and `ct_state` as raw `u8`; translation never looks
//! at them.  The dispatcher converts them through these types so that every
//! value, including ones nobody has assigned a meaning to, has an explicit
//! representation.

use serde::{Deserialize, Serialize};

/// Bit set carried in [`CommandRecord::flags`][crate::CommandRecord::flags].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandFlags(u8);

impl CommandFlags {
    /// Bit 0: purple flag, the race-control emergency stop.
    pub const PURPLE: CommandFlags = CommandFlags(0x01);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: CommandFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_purple(self) -> bool {
        self.contains(Self::PURPLE)
    }
}

/// Enumerated `ct_state` code reported in a vehicle status message.
///
/// Only three codes carry an actuator meaning; every other byte lands in
/// [`CtState::Unmapped`] and is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::FromPrimitive)]
#[repr(u8)]
pub enum CtState {
    StartEngine = 5,
    StopEngine = 11,
    EmergencyStop = 12,
    #[num_enum(catch_all)]
    Unmapped(u8),
}

impl CtState {
    /// The raw byte this state was decoded from.
    pub fn code(self) -> u8 {
        match self {
            CtState::StartEngine => 5,
            CtState::StopEngine => 11,
            CtState::EmergencyStop => 12,
            CtState::Unmapped(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purple_bit_detected_among_other_bits() {
        assert!(CommandFlags::from_bits(0x01).is_purple());
        assert!(CommandFlags::from_bits(0xFF).is_purple());
        assert!(CommandFlags::from_bits(0b1000_0011).is_purple());
        assert!(!CommandFlags::from_bits(0x00).is_purple());
        assert!(!CommandFlags::from_bits(0xFE).is_purple());
    }

    #[test]
    fn empty_flag_set_is_never_contained() {
        assert!(!CommandFlags::from_bits(0xFF).contains(CommandFlags::default()));
    }

    #[test]
    fn ct_state_known_codes() {
        assert_eq!(CtState::from(5), CtState::StartEngine);
        assert_eq!(CtState::from(11), CtState::StopEngine);
        assert_eq!(CtState::from(12), CtState::EmergencyStop);
    }

    #[test]
    fn ct_state_every_other_code_is_unmapped() {
        for code in 0..=u8::MAX {
            let state = CtState::from(code);
            assert_eq!(state.code(), code);
            if ![5, 11, 12].contains(&code) {
                assert_eq!(state, CtState::Unmapped(code));
            }
        }
    }
}
