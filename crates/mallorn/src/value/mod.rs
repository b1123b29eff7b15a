//! The dynamic value handle
//!
//! A [`Value`] is a nullable, reference-counted handle to a shared slot that
//! holds one payload of any [`Payload`] type together with a
//! [`ProtectionLevel`]. Cloning a `Value` shares the slot; the copy-on-write
//! operations ([`clone_slot`](Value::clone_slot), [`access`](Value::access),
//! [`assign`](Value::assign)) give a handle its own slot.

mod access;
mod assign;
mod display;
mod impls;

use std::any::TypeId;
use std::rc::Rc;
use std::sync::Arc;

use log::trace;

use crate::error::{Result, ValueError};
use crate::extension::ExtensionTable;
use crate::holder::TypedHolder;
use crate::payload::Payload;
use crate::protection::ProtectionLevel;
use crate::slot::Slot;

/// Hash reported by an empty value.
pub const EMPTY_HASH: u64 = 0;

/// Name reported by an empty value.
pub const NULL_TYPE_NAME: &str = "null";

/// Text an empty value renders as.
pub const NULL_TEXT: &str = "Null";

/// The "no type" marker: the type identity of an empty value.
///
/// It has no values, so it can never be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Null {}

/// A runtime value of any payload type.
///
/// # Example
///
/// ```
/// use mallorn::Value;
///
/// let a = Value::new(42i64);
/// let mut b = a.clone(); // shares the slot
/// assert!(b.is_same(&a));
///
/// *b.access::<i64>().unwrap() = 100; // copy-on-write
/// assert_eq!(*a.read::<i64>().unwrap(), 42);
/// assert_eq!(*b.read::<i64>().unwrap(), 100);
/// ```
#[derive(Clone, Default)]
pub struct Value {
    slot: Option<Rc<Slot>>,
}

impl Value {
    // ═══════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════

    /// Create an empty value
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mutable value holding `value`
    pub fn new<T: Payload>(value: T) -> Self {
        Self::with_protection(value, ProtectionLevel::Mutable)
    }

    /// Create a value whose slot starts at `level`
    pub fn with_protection<T: Payload>(value: T, level: ProtectionLevel) -> Self {
        Self {
            slot: Some(Slot::shared(level, TypedHolder::boxed(value))),
        }
    }

    /// Create a read-only binding
    pub fn make_protected<T: Payload>(value: T) -> Self {
        Self::with_protection(value, ProtectionLevel::Protected)
    }

    /// Create a constant
    pub fn make_constant<T: Payload>(value: T) -> Self {
        Self::with_protection(value, ProtectionLevel::Constant)
    }

    /// Create a singleton
    pub fn make_single<T: Payload>(value: T) -> Self {
        Self::with_protection(value, ProtectionLevel::Single)
    }

    /// Move the slot out, leaving this value empty
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Sharing & Identity
    // ═══════════════════════════════════════════════════════════════════

    /// Whether the value holds nothing
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Whether both values reference the same slot (or are both empty)
    pub fn is_same(&self, other: &Value) -> bool {
        match (&self.slot, &other.slot) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Number of values sharing this slot (0 when empty)
    pub fn use_count(&self) -> usize {
        self.slot.as_ref().map_or(0, Rc::strong_count)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Protection
    // ═══════════════════════════════════════════════════════════════════

    /// Protection level of the slot, `None` when empty
    pub fn protection(&self) -> Option<ProtectionLevel> {
        self.slot.as_ref().map(|slot| slot.protection())
    }

    /// Level is at least `Protected`
    pub fn is_protected(&self) -> bool {
        self.protection() >= Some(ProtectionLevel::Protected)
    }

    /// Level is at least `Constant`
    pub fn is_constant(&self) -> bool {
        self.protection() >= Some(ProtectionLevel::Constant)
    }

    /// Level is `Single`
    pub fn is_single(&self) -> bool {
        self.protection() == Some(ProtectionLevel::Single)
    }

    /// Raise the slot to `Protected`.
    ///
    /// Fails with [`ValueError::ProtectionViolation`] if the slot is already
    /// `Constant` or `Single`. Does nothing on an empty value.
    pub fn protect(&mut self) -> Result<()> {
        self.raise_to(ProtectionLevel::Protected)
    }

    /// Raise the slot to `Constant`.
    ///
    /// Fails with [`ValueError::ProtectionViolation`] if the slot is already
    /// `Single`. Does nothing on an empty value.
    pub fn constant(&mut self) -> Result<()> {
        self.raise_to(ProtectionLevel::Constant)
    }

    /// Raise the slot to `Single`. Never fails.
    pub fn single(&mut self) {
        if let Some(slot) = &self.slot {
            trace!("{} -> single", slot.protection());
            slot.raise(ProtectionLevel::Single);
        }
    }

    fn raise_to(&mut self, target: ProtectionLevel) -> Result<()> {
        let Some(slot) = &self.slot else {
            return Ok(());
        };
        let current = slot.protection();
        if current > target {
            return Err(ValueError::ProtectionViolation {
                current,
                requested: target,
            });
        }
        trace!("{} -> {}", current, target);
        slot.raise(target);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Introspection
    // ═══════════════════════════════════════════════════════════════════
    //
    // These never fail. The payload type is readable even while a handle
    // holds a mutable guard on the slot; payload-derived results fall back
    // to the empty-value answers until the guard is dropped.

    /// Type identity of the payload; `TypeId::of::<Null>()` when empty
    pub fn type_identity(&self) -> TypeId {
        self.slot
            .as_ref()
            .map_or(TypeId::of::<Null>(), |slot| slot.type_identity())
    }

    /// Whether the payload is a `T` (`is::<Null>()` tests for empty)
    pub fn is<T: 'static>(&self) -> bool {
        self.type_identity() == TypeId::of::<T>()
    }

    /// Name of the payload type; `"null"` when empty
    pub fn type_name(&self) -> &'static str {
        self.slot
            .as_ref()
            .map_or(NULL_TYPE_NAME, |slot| slot.type_name())
    }

    /// Integer conversion of the payload; `0` when empty or mutably borrowed
    pub fn to_integer(&self) -> i64 {
        self.slot
            .as_ref()
            .and_then(|slot| slot.try_peek())
            .map_or(0, |holder| holder.to_integer())
    }

    /// Hash of the payload; [`EMPTY_HASH`] when empty or mutably borrowed
    pub fn hash_value(&self) -> u64 {
        self.slot
            .as_ref()
            .and_then(|slot| slot.try_peek())
            .map_or(EMPTY_HASH, |holder| holder.hash_code())
    }

    /// Extension table of the payload type.
    ///
    /// Fails with [`ValueError::ExtensionUnsupported`] on an empty value.
    pub fn extensions(&self) -> Result<Arc<ExtensionTable>> {
        let slot = self.slot.as_ref().ok_or(ValueError::ExtensionUnsupported)?;
        let table = slot.holder()?.extensions();
        Ok(table)
    }

    /// Call the extension `name` with this value as receiver.
    ///
    /// The receiver is shared (not copied) into the first argument, so an
    /// extension that uses raw access mutates it in place.
    pub fn invoke(&self, name: &str, args: impl IntoIterator<Item = Value>) -> Result<Value> {
        let table = self.extensions()?;
        let func = table
            .get(name)
            .cloned()
            .ok_or_else(|| ValueError::UnknownExtension {
                type_name: self.type_name(),
                name: name.to_string(),
            })?;
        let mut argv: Vec<Value> = std::iter::once(self.clone()).chain(args).collect();
        func(&mut argv)
    }
}
