//! Format version of the persisted state file.

use crate::SCHEMA_VERSION;

/// Minor revision of the current state layout. Bumped when fields are added
/// with defaults, so older files still load.
const STATE_MINOR: u32 = 0;

/// Version stamp written at the top of every state file.
///
/// A monitor refuses a file whose major number differs from its own instead
/// of guessing at the layout; minor differences are read as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Layout written by this build.
    pub const fn current() -> Self {
        Self::new(SCHEMA_VERSION, STATE_MINOR)
    }

    /// Whether a file stamped with this version can be loaded.
    pub fn is_compatible(&self) -> bool {
        self.major == Self::current().major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl core::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
