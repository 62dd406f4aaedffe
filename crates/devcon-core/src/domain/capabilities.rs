//! Command capability set.
//!
//! Visibility and executability are two independent flags. Every one of the
//! four combinations is meaningful:
//!
//! | DISPLAY | EXECUTE | Behaviour                                         |
//! |---------|---------|---------------------------------------------------|
//! | yes     | yes     | listed, completed and callable                    |
//! | yes     | no      | listed (greyed out), dispatch is refused          |
//! | no      | yes     | hidden from listings, callable by exact name      |
//! | no      | no      | hidden and refused                                |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// What the console may do with a command right now.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct Capabilities: u8 {
        /// Command appears in listings and autocomplete.
        const DISPLAY = 0b0000_0001;

        /// Command may be invoked through dispatch.
        const EXECUTE = 0b0000_0010;
    }
}

impl Default for Capabilities {
    /// Plain commands are visible and callable.
    fn default() -> Self {
        Self::all()
    }
}

impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

impl Capabilities {
    /// Build a capability set from the two independent checks.
    pub fn from_checks(can_display: bool, can_execute: bool) -> Self {
        let mut caps = Self::empty();
        caps.set(Self::DISPLAY, can_display);
        caps.set(Self::EXECUTE, can_execute);
        caps
    }

    /// Check if the command may be shown in listings and completions.
    pub const fn is_visible(self) -> bool {
        self.contains(Self::DISPLAY)
    }

    /// Check if the command is excluded from listings and completions.
    pub const fn is_hidden(self) -> bool {
        !self.is_visible()
    }

    /// Check if dispatch may invoke the command.
    pub const fn is_executable(self) -> bool {
        self.contains(Self::EXECUTE)
    }
}
