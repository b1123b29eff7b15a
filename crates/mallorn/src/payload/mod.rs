//! Per-type behavior for values stored in a [`Value`](crate::Value)

mod containers;
mod scalars;

use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::extension::{ExtensionRegistry, ExtensionTable};

/// Behavior a type must supply to be stored in a [`Value`](crate::Value).
///
/// Every method has a generic fallback so that opaque host objects can be
/// stored with a bare `impl Payload for MyType {}`. Types the language
/// compares or prints should override the relevant methods.
///
/// Implementations must keep `equals` and `hash_code` consistent: if
/// `a.equals(&b)` then `a.hash_code() == b.hash_code()`.
///
/// # Example
///
/// ```
/// use mallorn::{Payload, Value};
///
/// #[derive(Clone)]
/// struct Point(i64, i64);
///
/// impl Payload for Point {
///     fn equals(&self, other: &Self) -> bool {
///         self.0 == other.0 && self.1 == other.1
///     }
///
///     fn render(&self) -> String {
///         format!("({}, {})", self.0, self.1)
///     }
///
///     fn type_name() -> &'static str {
///         "Point"
///     }
/// }
///
/// let p = Value::new(Point(1, 2));
/// assert_eq!(p.to_string(), "(1, 2)");
/// assert_eq!(p.type_name(), "Point");
/// ```
pub trait Payload: Clone + 'static {
    /// Copy the payload for a fresh holder.
    fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Equality between two payloads of this type.
    ///
    /// Only called for payloads in different slots; handles sharing a slot
    /// compare equal without asking. Defaults to `false`, so separate copies
    /// of a type without an equality never match.
    fn equals(&self, _other: &Self) -> bool {
        false
    }

    /// Integer conversion used by the language's numeric contexts.
    fn to_integer(&self) -> i64 {
        0
    }

    /// Textual form of the payload.
    fn render(&self) -> String {
        format!("[{}]", Self::type_name())
    }

    /// Hash consistent with [`equals`](Payload::equals).
    ///
    /// Defaults to a per-type constant, which is trivially consistent.
    fn hash_code(&self) -> u64 {
        hash_of(&TypeId::of::<Self>())
    }

    /// Sever aliasing between this payload and any values it contains.
    fn detach(&mut self) -> Result<()> {
        Ok(())
    }

    /// Extension methods registered for this type.
    fn extensions() -> Arc<ExtensionTable> {
        ExtensionRegistry::global().table::<Self>()
    }

    /// Name of the type as the language shows it.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Hash any `Hash` value with the standard hasher.
pub fn hash_of<H: Hash + ?Sized>(value: &H) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
