//! Protection levels for shared slots

use std::fmt;

/// How strongly a slot is guarded against change.
///
/// Levels are ordered `Mutable < Protected < Constant < Single`, and a slot's
/// level never decreases over its lifetime.
///
/// - `Mutable`: ordinary `var` storage
/// - `Protected`: read-only binding; the payload may still be reached through
///   copy-on-write access, but raw operations are refused
/// - `Constant`: compile-time constant; no mutable access at all
/// - `Single`: a singleton; additionally cannot be cloned or detached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtectionLevel {
    /// Freely mutable
    #[default]
    Mutable = 0,
    /// Read-only binding
    Protected = 1,
    /// Compile-time constant
    Constant = 2,
    /// Single identity, never duplicated
    Single = 3,
}

impl ProtectionLevel {
    /// All levels, lowest first.
    pub const ALL: [ProtectionLevel; 4] = [
        ProtectionLevel::Mutable,
        ProtectionLevel::Protected,
        ProtectionLevel::Constant,
        ProtectionLevel::Single,
    ];

    /// Lower-case name of the level
    pub fn name(self) -> &'static str {
        match self {
            ProtectionLevel::Mutable => "mutable",
            ProtectionLevel::Protected => "protected",
            ProtectionLevel::Constant => "constant",
            ProtectionLevel::Single => "single",
        }
    }

    /// Whether a mutable borrow of the payload may be handed out.
    pub fn allows_access(self) -> bool {
        self <= ProtectionLevel::Protected
    }

    /// Whether raw (in-place, sibling-visible) operations are allowed.
    pub fn allows_raw(self) -> bool {
        self == ProtectionLevel::Mutable
    }

    /// Whether the payload may be cloned or detached.
    pub fn allows_duplicate(self) -> bool {
        self != ProtectionLevel::Single
    }
}

impl fmt::Display for ProtectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
