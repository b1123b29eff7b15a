//! Cooked and raw swap/assign
//!
//! Cooked operations rebind handles and never touch what siblings see. Raw
//! operations change the contents of shared slots in place, so every handle
//! sharing either slot observes them; they require both slots to be
//! `Mutable`.

use std::mem;
use std::rc::Rc;

use log::trace;

use super::Value;
use crate::error::{Result, ValueError};
use crate::holder::TypedHolder;
use crate::payload::Payload;
use crate::protection::ProtectionLevel;
use crate::slot::Slot;

impl Value {
    /// Exchange which slots the two handles reference.
    pub fn swap(&mut self, other: &mut Value) {
        mem::swap(&mut self.slot, &mut other.slot);
    }

    /// Exchange the payloads of the two slots in place.
    ///
    /// Fails with [`ValueError::ProtectedMutation`] unless both slots are
    /// `Mutable`. Falls back to [`swap`](Value::swap) when either value is
    /// empty.
    pub fn swap_raw(&mut self, other: &mut Value) -> Result<()> {
        if let (Some(mine), Some(theirs)) = (&self.slot, &other.slot) {
            if !mine.protection().allows_raw() || !theirs.protection().allows_raw() {
                return Err(ValueError::ProtectedMutation);
            }
            if Rc::ptr_eq(mine, theirs) {
                return Ok(());
            }
            trace!(
                "raw swap of {} and {}",
                mine.type_name(),
                theirs.type_name()
            );
            return mine.swap_holders(theirs);
        }
        self.swap(other);
        Ok(())
    }

    /// Replace this handle's value with an independent copy of `other`.
    ///
    /// The copy lives in a new `Mutable` slot; the previous slot and its
    /// siblings are untouched. Does nothing when both handles already share
    /// a slot.
    pub fn assign(&mut self, other: &Value) -> Result<()> {
        if self.is_same(other) {
            return Ok(());
        }
        let fresh = match &other.slot {
            Some(slot) => Some(slot.duplicate()?),
            None => None,
        };
        self.slot = fresh;
        Ok(())
    }

    /// Overwrite this slot's payload with a copy of `other`'s, in place.
    ///
    /// Fails with [`ValueError::ProtectedMutation`] unless both slots are
    /// `Mutable`. Falls back to [`assign`](Value::assign) when either value
    /// is empty.
    pub fn assign_raw(&mut self, other: &Value) -> Result<()> {
        if self.is_same(other) {
            return Ok(());
        }
        if let (Some(mine), Some(theirs)) = (&self.slot, &other.slot) {
            if !mine.protection().allows_raw() || !theirs.protection().allows_raw() {
                return Err(ValueError::ProtectedMutation);
            }
            let copy = theirs.holder()?.duplicate();
            trace!("raw assign of {}", copy.type_name());
            return mine.replace_holder(copy);
        }
        self.assign(other)
    }

    /// Replace this handle's value with `value` in a new `Mutable` slot.
    pub fn assign_value<T: Payload>(&mut self, value: T) {
        self.slot = Some(Slot::shared(
            ProtectionLevel::Mutable,
            TypedHolder::boxed(value),
        ));
    }

    /// Overwrite this slot's payload with `value`, in place.
    ///
    /// Fails with [`ValueError::ProtectedMutation`] unless the slot is
    /// `Mutable`. Falls back to [`assign_value`](Value::assign_value) when
    /// this value is empty.
    pub fn assign_value_raw<T: Payload>(&mut self, value: T) -> Result<()> {
        if let Some(slot) = &self.slot {
            if !slot.protection().allows_raw() {
                return Err(ValueError::ProtectedMutation);
            }
            trace!("raw assign of {}", T::type_name());
            return slot.replace_holder(TypedHolder::boxed(value));
        }
        self.assign_value(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_swap_same_slot_is_noop() {
        let mut a = Value::new(1i64);
        let mut b = a.clone();
        a.swap_raw(&mut b).unwrap();
        assert!(a.is_same(&b));
        assert_eq!(a.to_integer(), 1);
    }

    #[test]
    fn test_raw_swap_with_empty_rebinds() {
        let mut a = Value::new(1i64);
        let mut b = Value::empty();
        a.swap_raw(&mut b).unwrap();
        assert!(a.is_empty());
        assert_eq!(b.to_integer(), 1);
    }

    #[test]
    fn test_assign_from_empty_empties() {
        let mut a = Value::new(1i64);
        a.assign_raw(&Value::empty()).unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_assign_value_raw_requires_mutable() {
        let mut a = Value::make_protected(1i64);
        assert_eq!(
            a.assign_value_raw(2i64).unwrap_err(),
            ValueError::ProtectedMutation
        );
        assert_eq!(a.to_integer(), 1);
        a.assign_value(2i64);
        assert_eq!(a.to_integer(), 2);
        assert_eq!(a.protection(), Some(ProtectionLevel::Mutable));
    }
}
