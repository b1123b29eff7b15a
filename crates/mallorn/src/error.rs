//! Error types for value operations

use thiserror::Error;

use crate::protection::ProtectionLevel;

/// Main error type for [`Value`](crate::Value) operations.
///
/// Every check runs before any mutation, so an operation that returns one of
/// these leaves its operands exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Typed read or access on an empty handle
    #[error("Value error: access to an empty value")]
    EmptyValue,

    /// Typed read or access with the wrong payload type
    #[error("Type error: expected {expected}, got {found}")]
    TypeMismatch {
        /// Requested payload type
        expected: &'static str,
        /// Stored payload type
        found: &'static str,
    },

    /// Mutable access to a constant or single value
    #[error("Protection error: cannot mutate a {level} value")]
    MutationForbidden {
        /// Protection level of the slot
        level: ProtectionLevel,
    },

    /// Raw swap/assign where either side is not mutable
    #[error("Protection error: raw operation on a protected value")]
    ProtectedMutation,

    /// Attempt to lower a slot's protection level
    #[error("Protection error: cannot change a {current} value to {requested}")]
    ProtectionViolation {
        /// Level the slot is at
        current: ProtectionLevel,
        /// Level that was asked for
        requested: ProtectionLevel,
    },

    /// Clone or detach of a single value
    #[error("Protection error: cannot duplicate a single value")]
    CannotDuplicate,

    /// Extension lookup on an empty handle
    #[error("Extension error: target type does not support extensions")]
    ExtensionUnsupported,

    /// No extension with the requested name is registered for the type
    #[error("Extension error: {type_name} has no extension named `{name}`")]
    UnknownExtension {
        /// Receiver's type name
        type_name: &'static str,
        /// Extension name that was looked up
        name: String,
    },

    /// An extension function reported a failure
    #[error("Extension error: {0}")]
    Extension(String),

    /// The slot's payload is already borrowed in a conflicting way
    #[error("Borrow error: value is already borrowed")]
    AlreadyBorrowed,
}

/// Stable classification of a [`ValueError`], independent of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ValueError::EmptyValue`]
    EmptyValue,
    /// See [`ValueError::TypeMismatch`]
    TypeMismatch,
    /// See [`ValueError::MutationForbidden`]
    MutationForbidden,
    /// See [`ValueError::ProtectedMutation`]
    ProtectedMutation,
    /// See [`ValueError::ProtectionViolation`]
    ProtectionViolation,
    /// See [`ValueError::CannotDuplicate`]
    CannotDuplicate,
    /// See [`ValueError::ExtensionUnsupported`]
    ExtensionUnsupported,
    /// See [`ValueError::UnknownExtension`]
    UnknownExtension,
    /// See [`ValueError::Extension`]
    Extension,
    /// See [`ValueError::AlreadyBorrowed`]
    AlreadyBorrowed,
}

impl ValueError {
    /// The stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValueError::EmptyValue => ErrorKind::EmptyValue,
            ValueError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValueError::MutationForbidden { .. } => ErrorKind::MutationForbidden,
            ValueError::ProtectedMutation => ErrorKind::ProtectedMutation,
            ValueError::ProtectionViolation { .. } => ErrorKind::ProtectionViolation,
            ValueError::CannotDuplicate => ErrorKind::CannotDuplicate,
            ValueError::ExtensionUnsupported => ErrorKind::ExtensionUnsupported,
            ValueError::UnknownExtension { .. } => ErrorKind::UnknownExtension,
            ValueError::Extension(_) => ErrorKind::Extension,
            ValueError::AlreadyBorrowed => ErrorKind::AlreadyBorrowed,
        }
    }
}

impl From<std::cell::BorrowError> for ValueError {
    fn from(_: std::cell::BorrowError) -> Self {
        ValueError::AlreadyBorrowed
    }
}

impl From<std::cell::BorrowMutError> for ValueError {
    fn from(_: std::cell::BorrowMutError) -> Self {
        ValueError::AlreadyBorrowed
    }
}

/// Result type alias for value operations
pub type Result<T> = std::result::Result<T, ValueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = ValueError::TypeMismatch {
            expected: "i64",
            found: "String",
        };
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(ValueError::EmptyValue.kind(), ErrorKind::EmptyValue);
    }

    #[test]
    fn test_messages() {
        let err = ValueError::ProtectionViolation {
            current: ProtectionLevel::Single,
            requested: ProtectionLevel::Constant,
        };
        assert_eq!(
            err.to_string(),
            "Protection error: cannot change a single value to constant"
        );
        let err = ValueError::MutationForbidden {
            level: ProtectionLevel::Constant,
        };
        assert_eq!(err.to_string(), "Protection error: cannot mutate a constant value");
    }
}
