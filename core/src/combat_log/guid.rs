//! 64-bit unit identifiers
//!
//! Canonical text form is `0x` followed by 16 uppercase hex digits. The high
//! 16 bits carry the unit type in their second nibble, creatures carry their
//! entry id in bits 24..48.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseError;

pub const GUID_STR_LEN: usize = 18;

const TYPE_PLAYER: u64 = 0x0;
const TYPE_CREATURE: u64 = 0x3;
const TYPE_PET: u64 = 0x4;
const TYPE_VEHICLE: u64 = 0x5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid(pub u64);

impl Guid {
    pub const ZERO: Guid = Guid(0);

    /// Parse the canonical `0x`-prefixed 18 character form.
    pub fn parse(s: &str) -> Result<Guid, ParseError> {
        let b = s.as_bytes();
        if b.len() != GUID_STR_LEN || &b[..2] != b"0x" || !b[2..].iter().all(u8::is_ascii_hexdigit) {
            return Err(ParseError::InvalidGuid {
                value: s.to_string(),
            });
        }

        u64::from_str_radix(&s[2..], 16)
            .map(Guid)
            .map_err(|_| ParseError::InvalidGuid {
                value: s.to_string(),
            })
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// High 16 bits, `0xF130` for `0xF13000092F003EE0`.
    pub fn high(self) -> u16 {
        (self.0 >> 48) as u16
    }

    fn type_tag(self) -> u64 {
        (self.0 >> 52) & 0xF
    }

    pub fn is_player(self) -> bool {
        self.type_tag() == TYPE_PLAYER
    }

    pub fn is_creature(self) -> bool {
        self.type_tag() == TYPE_CREATURE
    }

    pub fn is_pet(self) -> bool {
        self.type_tag() == TYPE_PET
    }

    pub fn is_vehicle(self) -> bool {
        self.type_tag() == TYPE_VEHICLE
    }

    pub fn is_any_creature(self) -> bool {
        self.is_creature() || self.is_pet() || self.is_vehicle()
    }

    pub fn is_unit(self) -> bool {
        self.is_any_creature() || self.is_player()
    }

    /// Creature template id, only present for creatures, pets and vehicles.
    pub fn entry(self) -> Option<u32> {
        if !self.is_any_creature() {
            return None;
        }
        Some(((self.0 >> 24) & 0x00FF_FFFF) as u32)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl FromStr for Guid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Guid::parse(s)
    }
}

impl From<u64> for Guid {
    fn from(value: u64) -> Self {
        Guid(value)
    }
}
